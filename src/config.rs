use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::DashboardError;
use crate::filter::{parse_month_selector, parse_sentiment_selector, parse_year_selector, FilterCriteria};
use crate::provider::FixtureSource;
use crate::table::SortState;
use crate::types::{Category, Platform};

/// Environment variables as envy sees them: names are lowercased before matching.
#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    #[serde(rename = "log_level", default = "default_log_level")]
    log_level: String,
    #[serde(rename = "session_id")]
    session_id: Option<String>,
    #[serde(rename = "dashboard_category", default = "default_category")]
    category: String,
    #[serde(rename = "dashboard_fixture_dir")]
    fixture_dir: Option<String>,
    #[serde(rename = "dashboard_brand")]
    drill_down: Option<String>,
    #[serde(rename = "dashboard_brands", default)]
    brands: Vec<String>,
    #[serde(rename = "dashboard_models", default)]
    models: Vec<String>,
    #[serde(rename = "dashboard_platforms", default)]
    platforms: Vec<String>,
    #[serde(rename = "dashboard_sentiment", default = "default_selector")]
    sentiment: String,
    #[serde(rename = "dashboard_year", default = "default_selector")]
    year: String,
    #[serde(rename = "dashboard_month", default = "default_selector")]
    month: String,
    #[serde(rename = "dashboard_page", default = "default_page")]
    page: usize,
    #[serde(rename = "dashboard_sort_field")]
    sort_field: Option<String>,
    #[serde(rename = "dashboard_sort_direction", default = "default_sort_direction")]
    sort_direction: String,
    #[serde(rename = "insight_provider", default = "default_insight_provider")]
    insight_provider: String,
    #[serde(rename = "insight_latency_ms", default = "default_insight_latency_ms")]
    insight_latency_ms: u64,
    #[serde(rename = "insight_query")]
    insight_query: Option<String>,
    #[serde(rename = "print_metrics", default)]
    print_metrics: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: String,
    pub session_id: String,
    pub category: Category,
    pub fixture_source: FixtureSource,
    pub drill_down: Option<String>,
    pub criteria: FilterCriteria,
    pub page: usize,
    pub sort: SortState,
    pub insight_provider: String,
    pub insight_latency: Duration,
    pub insight_query: Option<String>,
    pub print_metrics: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, DashboardError> {
        let raw: RawSettings = envy::from_env()?;
        Self::from_raw(raw)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, DashboardError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: RawSettings = envy::from_iter(vars)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, DashboardError> {
        let session_id = non_blank(raw.session_id)
            .unwrap_or_else(|| format!("session-{}", Uuid::new_v4()))
            .to_lowercase();

        let criteria = FilterCriteria {
            brands: clean_list(raw.brands).collect(),
            models: clean_list(raw.models).collect(),
            platforms: clean_list(raw.platforms).map(Platform::from).collect(),
            sentiment: parse_sentiment_selector(&raw.sentiment)?,
            year: parse_year_selector(&raw.year)?,
            month: parse_month_selector(&raw.month)?,
        };

        let sort = match non_blank(raw.sort_field) {
            Some(field) => SortState::new(field.parse()?, raw.sort_direction.parse()?),
            None => SortState::default(),
        };

        Ok(Self {
            log_level: raw.log_level.to_ascii_lowercase(),
            session_id,
            category: raw.category.parse()?,
            fixture_source: non_blank(raw.fixture_dir)
                .map(|dir| FixtureSource::Directory(PathBuf::from(dir)))
                .unwrap_or(FixtureSource::Embedded),
            drill_down: non_blank(raw.drill_down),
            criteria,
            page: raw.page.max(1),
            sort,
            insight_provider: raw.insight_provider.trim().to_ascii_lowercase(),
            insight_latency: Duration::from_millis(raw.insight_latency_ms),
            insight_query: non_blank(raw.insight_query),
            print_metrics: raw.print_metrics,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn clean_list(values: Vec<String>) -> impl Iterator<Item = String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_category() -> String {
    "phone".to_string()
}

fn default_selector() -> String {
    "all".to_string()
}

fn default_page() -> usize {
    1
}

fn default_sort_direction() -> String {
    "desc".to_string()
}

fn default_insight_provider() -> String {
    "mock".to_string()
}

fn default_insight_latency_ms() -> u64 {
    1600
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
