use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Phone,
    Car,
    Device,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Phone, Category::Car, Category::Device];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Car => "car",
            Self::Device => "device",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Phone => "Smartphones",
            Self::Car => "Electric Vehicles",
            Self::Device => "Smart Appliances",
        }
    }

    /// File stem shared by the category's summary and comment fixtures.
    pub fn fixture_stem(self) -> &'static str {
        match self {
            Self::Phone => "phones",
            Self::Car => "cars",
            Self::Device => "devices",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "phone" => Ok(Self::Phone),
            "car" => Ok(Self::Car),
            "device" => Ok(Self::Device),
            _ => Err(DashboardError::UnknownCategory(value.to_string())),
        }
    }
}

/// Source platform of a comment. Unknown names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Bilibili,
    Reddit,
    GsmArena,
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bilibili => "Bilibili",
            Self::Reddit => "Reddit",
            Self::GsmArena => "GSM Arena",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Bilibili" => Self::Bilibili,
            "Reddit" => Self::Reddit,
            "GSM Arena" => Self::GsmArena,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        match value {
            Platform::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "pos")]
    Positive,
    #[serde(rename = "neg")]
    Negative,
    #[serde(rename = "neutral")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "pos",
            Self::Negative => "neg",
            Self::Neutral => "neutral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Sentiment {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pos" | "positive" => Ok(Self::Positive),
            "neg" | "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            _ => Err(DashboardError::filter("sentiment", value)),
        }
    }
}

/// Offset applied to timestamps written without one (UTC+8, where most sources post).
pub const NAIVE_TIMESTAMP_OFFSET_SECS: i32 = 8 * 3600;

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses an RFC 3339 timestamp, or a naive one in [`NAIVE_TIMESTAMP_OFFSET_SECS`].
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    let offset = FixedOffset::east_opt(NAIVE_TIMESTAMP_OFFSET_SECS)?;
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| naive.and_local_timezone(offset).single())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp {raw:?}")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub platform: Platform,
    pub category: Category,
    pub brand_cn: String,
    pub brand_en: String,
    pub model_cn: String,
    pub model_en: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub datetime: DateTime<FixedOffset>,
    pub year: i32,
    pub month: u32,
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<u64>,
}

impl Comment {
    /// Whether the stored year/month agree with the timestamp, read in its own offset.
    pub fn period_matches_timestamp(&self) -> bool {
        self.datetime.year() == self.year && self.datetime.month() == self.month
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandStats {
    pub total_reviews: u64,
    pub pos: u64,
    pub neg: u64,
    pub neutral: u64,
    pub positive_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRow {
    pub brand_cn: String,
    pub brand_en: String,
    #[serde(default)]
    pub hot_models: Vec<String>,
    #[serde(default)]
    pub sources: Vec<Platform>,
    pub stats: BrandStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub category: Category,
    pub platforms: Vec<Platform>,
    pub brand_count: u64,
    pub model_count: u64,
    pub raw_comment_count: u64,
    pub user_sentence_count: u64,
    pub brands: Vec<BrandRow>,
}

impl DashboardSummary {
    /// Hot models across all brands, deduplicated in first-seen order.
    pub fn hot_models(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.brands
            .iter()
            .flat_map(|brand| brand.hot_models.iter())
            .filter(|model| seen.insert(model.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn brand_names(&self) -> Vec<&str> {
        self.brands.iter().map(|brand| brand.brand_cn.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
