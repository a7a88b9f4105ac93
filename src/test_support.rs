use chrono::{DateTime, Datelike, FixedOffset};

use crate::types::{BrandRow, BrandStats, Category, Comment, Platform, Sentiment};

pub(crate) fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("valid timestamp")
}

pub(crate) fn comment(id: &str, brand: &str, model: &str, platform: &str, sentiment: Sentiment, when: &str) -> Comment {
    let datetime = at(when);
    Comment {
        id: id.to_string(),
        platform: Platform::from(platform),
        category: Category::Phone,
        brand_cn: brand.to_string(),
        brand_en: brand.to_ascii_lowercase(),
        model_cn: model.to_string(),
        model_en: model.to_ascii_lowercase(),
        datetime,
        year: datetime.year(),
        month: datetime.month(),
        sentiment,
        sentiment_score: None,
        title: None,
        content: format!("comment {id}"),
        like_count: None,
        reply_count: None,
    }
}

pub(crate) fn brand_row(name: &str, total_reviews: u64, positive_rate: f64) -> BrandRow {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let pos = (total_reviews as f64 * positive_rate).round() as u64;
    BrandRow {
        brand_cn: name.to_string(),
        brand_en: name.to_ascii_lowercase(),
        hot_models: vec![format!("{name} One")],
        sources: vec![Platform::Reddit],
        stats: BrandStats {
            total_reviews,
            pos,
            neg: total_reviews - pos,
            neutral: 0,
            positive_rate,
        },
    }
}

/// A small mixed dataset spanning three brands, three platforms and two years.
pub(crate) fn sample_comments() -> Vec<Comment> {
    vec![
        comment("c1", "Apple", "iPhone 16 Pro", "Reddit", Sentiment::Negative, "2024-06-03T08:00:00Z"),
        comment("c2", "Apple", "iPhone 16", "Bilibili", Sentiment::Positive, "2024-01-15T12:30:00Z"),
        comment("c3", "Xiaomi", "Xiaomi 15", "Bilibili", Sentiment::Negative, "2023-12-24T20:00:00Z"),
        comment("c4", "Samsung", "Galaxy S24", "GSM Arena", Sentiment::Neutral, "2024-06-20T09:45:00Z"),
        comment("c5", "Xiaomi", "Xiaomi 14", "Reddit", Sentiment::Positive, "2024-03-02T16:10:00Z"),
        comment("c6", "Apple", "iPhone 16 Pro", "GSM Arena", Sentiment::Negative, "2023-11-30T07:05:00Z"),
        comment("c7", "Samsung", "Galaxy S24", "Reddit", Sentiment::Negative, "2024-06-20T09:45:00Z"),
    ]
}
