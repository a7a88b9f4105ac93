use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{Dataset, DashboardError};
use crate::metrics::{DASHBOARD_FETCH_FAILED_TOTAL, DASHBOARD_FETCH_SECONDS};
use crate::types::{Category, Comment, DashboardSummary};

/// Fixed delay applied to every fetch to emulate file or network latency.
pub const FETCH_LATENCY: Duration = Duration::from_millis(100);

/// A fetched document plus the SHA-256 digest of the bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub revision: String,
}

#[async_trait]
pub trait DatasetProvider: Send + Sync {
    async fn fetch_summary(&self, category: Category) -> Result<Loaded<DashboardSummary>, DashboardError>;
    async fn fetch_comments(&self, category: Category) -> Result<Loaded<Vec<Comment>>, DashboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
    Embedded,
    Directory(PathBuf),
}

/// Serves the per-category JSON fixtures, validating them on every load.
pub struct FixtureProvider {
    source: FixtureSource,
}

impl FixtureProvider {
    pub fn new(source: FixtureSource) -> Self {
        Self { source }
    }

    pub fn embedded() -> Self {
        Self::new(FixtureSource::Embedded)
    }

    pub fn file_name(category: Category, dataset: Dataset) -> String {
        match dataset {
            Dataset::Summary => format!("{}_summary.json", category.fixture_stem()),
            Dataset::Comments => format!("{}_comments_sample.json", category.fixture_stem()),
        }
    }

    async fn read(&self, category: Category, dataset: Dataset) -> Result<String, DashboardError> {
        match &self.source {
            FixtureSource::Embedded => Ok(embedded_fixture(category, dataset).to_string()),
            FixtureSource::Directory(dir) => {
                let path = dir.join(Self::file_name(category, dataset));
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|err| DashboardError::load(category, dataset, format!("{}: {err}", path.display())))
            }
        }
    }

    async fn load<T: DeserializeOwned>(&self, category: Category, dataset: Dataset) -> Result<Loaded<T>, DashboardError> {
        tokio::time::sleep(FETCH_LATENCY).await;
        let raw = self.read(category, dataset).await?;
        let data = serde_json::from_str(&raw).map_err(|err| DashboardError::load(category, dataset, err.to_string()))?;
        let revision = fingerprint(raw.as_bytes());
        debug!(category = %category, dataset = %dataset, revision = %revision, "Fixture parsed");
        Ok(Loaded { data, revision })
    }
}

#[async_trait]
impl DatasetProvider for FixtureProvider {
    async fn fetch_summary(&self, category: Category) -> Result<Loaded<DashboardSummary>, DashboardError> {
        let loaded: Loaded<DashboardSummary> = self.load(category, Dataset::Summary).await?;
        validate_summary(category, &loaded.data).map_err(|reason| DashboardError::load(category, Dataset::Summary, reason))?;
        Ok(loaded)
    }

    async fn fetch_comments(&self, category: Category) -> Result<Loaded<Vec<Comment>>, DashboardError> {
        let loaded: Loaded<Vec<Comment>> = self.load(category, Dataset::Comments).await?;
        validate_comments(category, &loaded.data)
            .map_err(|reason| DashboardError::load(category, Dataset::Comments, reason))?;
        Ok(loaded)
    }
}

fn embedded_fixture(category: Category, dataset: Dataset) -> &'static str {
    match (category, dataset) {
        (Category::Phone, Dataset::Summary) => include_str!("../data/phones_summary.json"),
        (Category::Phone, Dataset::Comments) => include_str!("../data/phones_comments_sample.json"),
        (Category::Car, Dataset::Summary) => include_str!("../data/cars_summary.json"),
        (Category::Car, Dataset::Comments) => include_str!("../data/cars_comments_sample.json"),
        (Category::Device, Dataset::Summary) => include_str!("../data/devices_summary.json"),
        (Category::Device, Dataset::Comments) => include_str!("../data/devices_comments_sample.json"),
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

pub fn validate_summary(category: Category, summary: &DashboardSummary) -> Result<(), String> {
    if summary.category != category {
        return Err(format!("summary is for {}, expected {category}", summary.category));
    }
    for row in &summary.brands {
        let rate = row.stats.positive_rate;
        if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
            return Err(format!("brand {} has positive_rate {rate} outside [0, 1]", row.brand_cn));
        }
    }
    Ok(())
}

pub fn validate_comments(category: Category, comments: &[Comment]) -> Result<(), String> {
    let mut ids = HashSet::with_capacity(comments.len());
    for comment in comments {
        if comment.category != category {
            return Err(format!(
                "comment {} is for {}, expected {category}",
                comment.id, comment.category
            ));
        }
        if !comment.period_matches_timestamp() {
            return Err(format!(
                "comment {} has year/month {}-{} that disagree with {}",
                comment.id, comment.year, comment.month, comment.datetime
            ));
        }
        if !ids.insert(comment.id.as_str()) {
            return Err(format!("duplicate comment id {}", comment.id));
        }
    }
    Ok(())
}

/// Wraps a provider with latency metrics and structured logs.
#[derive(Clone)]
pub struct InstrumentedProvider {
    delegate: Arc<dyn DatasetProvider>,
    session_id: String,
}

impl InstrumentedProvider {
    pub fn new(delegate: Arc<dyn DatasetProvider>, session_id: String) -> Self {
        Self { delegate, session_id }
    }

    pub async fn fetch_summary(&self, category: Category) -> Result<Loaded<DashboardSummary>, DashboardError> {
        self.observe(category, Dataset::Summary, || self.delegate.fetch_summary(category))
            .await
    }

    pub async fn fetch_comments(&self, category: Category) -> Result<Loaded<Vec<Comment>>, DashboardError> {
        self.observe(category, Dataset::Comments, || self.delegate.fetch_comments(category))
            .await
    }

    /// Fetches both documents for `category` concurrently.
    pub async fn fetch_category(
        &self,
        category: Category,
    ) -> Result<(Loaded<DashboardSummary>, Loaded<Vec<Comment>>), DashboardError> {
        futures::try_join!(self.fetch_summary(category), self.fetch_comments(category))
    }

    async fn observe<T, Fut>(
        &self,
        category: Category,
        dataset: Dataset,
        fut: impl FnOnce() -> Fut,
    ) -> Result<T, DashboardError>
    where
        Fut: std::future::Future<Output = Result<T, DashboardError>>,
    {
        let start = Instant::now();
        let result = fut().await;
        let duration = start.elapsed();
        DASHBOARD_FETCH_SECONDS
            .with_label_values(&[category.as_str(), dataset.label()])
            .observe(duration.as_secs_f64());

        match &result {
            Ok(_) => info!(
                session_id = %self.session_id,
                category = %category,
                dataset = %dataset,
                latency_ms = duration.as_secs_f64() * 1000.0,
                "Dataset fetched"
            ),
            Err(err) => {
                DASHBOARD_FETCH_FAILED_TOTAL
                    .with_label_values(&[category.as_str(), dataset.label()])
                    .inc();
                warn!(
                    session_id = %self.session_id,
                    category = %category,
                    dataset = %dataset,
                    error = %err,
                    "Dataset fetch failed"
                );
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
