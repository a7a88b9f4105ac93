use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::config::Settings;
use crate::metrics::DASHBOARD_INSIGHT_LATENCY_SECONDS;
use crate::types::Category;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

const DISCLAIMER: &str = "Note: this is a pipeline preview; no language model is connected yet.";

/// Answers free-text questions about a category's comments.
#[async_trait]
pub trait InsightResponder: Send + Sync {
    /// `query` is already normalised and never blank.
    async fn respond(&self, category: Category, query: &str) -> String;
}

/// Canned per-category analysis that echoes the question back.
pub struct MockInsightResponder {
    latency: Duration,
}

impl MockInsightResponder {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl InsightResponder for MockInsightResponder {
    async fn respond(&self, category: Category, query: &str) -> String {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        canned_answer(category, query)
    }
}

pub struct RemoteInsightResponder {
    provider: String,
    fallback: MockInsightResponder,
}

#[async_trait]
impl InsightResponder for RemoteInsightResponder {
    async fn respond(&self, category: Category, query: &str) -> String {
        warn!(provider = %self.provider, category = %category, "Remote insight provider not implemented; using canned answer");
        self.fallback.respond(category, query).await
    }
}

pub struct InstrumentedInsightResponder {
    delegate: Arc<dyn InsightResponder>,
    provider: String,
    session_id: String,
}

impl InstrumentedInsightResponder {
    pub fn new(delegate: Arc<dyn InsightResponder>, provider: String, session_id: String) -> Self {
        Self {
            delegate,
            provider,
            session_id,
        }
    }

    /// Returns `None` for a blank query without calling the delegate.
    pub async fn ask(&self, category: Category, query: &str) -> Option<String> {
        let query = normalise_query(query)?;
        let start = Instant::now();
        let answer = self.delegate.respond(category, &query).await;
        let duration = start.elapsed();
        DASHBOARD_INSIGHT_LATENCY_SECONDS
            .with_label_values(&[category.as_str(), &self.provider])
            .observe(duration.as_secs_f64());
        info!(
            session_id = %self.session_id,
            category = %category,
            provider = %self.provider,
            latency_ms = duration.as_secs_f64() * 1000.0,
            "Insight generated"
        );
        Some(answer)
    }
}

pub fn build_insight_responder(settings: &Settings) -> InstrumentedInsightResponder {
    let fallback = MockInsightResponder::new(settings.insight_latency);
    let delegate: Arc<dyn InsightResponder> = match settings.insight_provider.as_str() {
        "mock" => Arc::new(fallback),
        other => Arc::new(RemoteInsightResponder {
            provider: other.to_string(),
            fallback,
        }),
    };

    InstrumentedInsightResponder::new(delegate, settings.insight_provider.clone(), settings.session_id.clone())
}

/// Trims and collapses whitespace; `None` when nothing is left.
pub fn normalise_query(query: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(query.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

pub fn example_queries(category: Category) -> [&'static str; 2] {
    match category {
        Category::Phone => [
            "Summarise the overheating complaints about the iPhone 16 Pro.",
            "Which has the better reputation, Xiaomi 15 or Galaxy S24?",
        ],
        Category::Car => [
            "Summarise how owners describe the Model 3's real-world range.",
            "Which has the better reputation, Xiaomi SU7 or Tesla Model 3?",
        ],
        Category::Device => [
            "Between Roborock and Ecovacs, which gets more negative feedback?",
            "How well does the Dreame X40 avoid obstacles?",
        ],
    }
}

fn canned_answer(category: Category, query: &str) -> String {
    let points: [&str; 4] = match category {
        Category::Phone => [
            "Overall: positive feedback on performance and build quality dominates, with a steady stream of complaints about heat and battery life.",
            "Main positives: sustained performance, display quality, camera results.",
            "Main negatives: heat under heavy load, gaming battery drain, minor bugs after system updates.",
            "Competitors: similarly priced rivals handle heat slightly better but trail on imaging and software polish.",
        ],
        Category::Car => [
            "Overall: driving feel and the smart cockpit draw a high share of positive feedback.",
            "Main positives: throttle response, driver assistance, cabin quietness.",
            "Main negatives: range falls short of the rated figure, occasional infotainment lag or black screens.",
            "Competitors: ahead on the smart cockpit, behind on charging experience and service coverage.",
        ],
        Category::Device => [
            "Overall: users rate cleaning power and path planning highly.",
            "Main positives: suction and mopping, self-emptying and self-cleaning docks, app control.",
            "Main negatives: edge and corner cleaning, noise, consumable costs.",
            "Competitors: top tier on core cleaning, with mixed opinions on after-sales service and durability.",
        ],
    };

    let mut answer = format!("Based on the current comment sample, a brief analysis of \"{query}\":\n\n");
    for (idx, point) in points.iter().enumerate() {
        answer.push_str(&format!("{}. {point}\n", idx + 1));
    }
    answer.push('\n');
    answer.push_str(DISCLAIMER);
    answer
}

#[cfg(test)]
#[path = "insight_test.rs"]
mod tests;
