use std::sync::Arc;
use std::time::Duration;

use sentiment_dashboard::insight::{InstrumentedInsightResponder, MockInsightResponder};
use sentiment_dashboard::pagination::{EmptyState, PageMarker};
use sentiment_dashboard::provider::{FixtureProvider, InstrumentedProvider};
use sentiment_dashboard::table::SortField;
use sentiment_dashboard::{Category, DashboardSession, Platform, Sentiment};

fn fixture_session() -> DashboardSession {
    let provider = InstrumentedProvider::new(Arc::new(FixtureProvider::embedded()), "it".to_string());
    let insight = InstrumentedInsightResponder::new(
        Arc::new(MockInsightResponder::new(Duration::ZERO)),
        "mock".to_string(),
        "it".to_string(),
    );
    DashboardSession::new("it".to_string(), provider, insight)
}

fn visible_ids(session: &DashboardSession) -> Vec<&str> {
    session
        .visible_comments()
        .iter()
        .map(|comment| comment.id.as_str())
        .collect()
}

#[tokio::test]
async fn every_category_loads_its_own_data() {
    let mut session = fixture_session();
    for category in Category::ALL {
        session.load(category).await.expect("load");
        let summary = session.summary().expect("summary");
        assert_eq!(summary.category, category);
        assert!(session.comments().iter().all(|comment| comment.category == category));
        assert_eq!(session.visible_comments().len(), session.comments().len());
    }
}

#[tokio::test]
async fn phone_comments_span_three_pages() {
    let mut session = fixture_session();
    session.load(Category::Phone).await.expect("load");

    let page = session.current_page();
    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.window(), vec![PageMarker::Number(1), PageMarker::Number(2), PageMarker::Number(3)]);

    session.go_to_page(3);
    assert_eq!(session.current_page().items.len(), 5);

    let newest = &session.visible_comments()[0];
    assert_eq!(newest.id, "ph-0015");
}

#[tokio::test]
async fn apple_drill_down_with_negative_sentiment() {
    let mut session = fixture_session();
    session.load(Category::Phone).await.expect("load");

    session.drill_down("苹果");
    session
        .update_criteria(|criteria| criteria.sentiment = Some(Sentiment::Negative))
        .expect("valid");
    assert_eq!(visible_ids(&session), ["ph-0001", "ph-0003"]);

    session.clear_drill_down();
    assert_eq!(
        visible_ids(&session),
        ["ph-0015", "ph-0012", "ph-0001", "ph-0010", "ph-0019", "ph-0006", "ph-0003"]
    );
}

#[tokio::test]
async fn phone_facets_follow_brand_selection() {
    let mut session = fixture_session();
    session.load(Category::Phone).await.expect("load");

    let facets = session.facets();
    assert_eq!(facets.platforms, vec![Platform::Reddit, Platform::Bilibili, Platform::GsmArena]);
    assert_eq!(facets.years, vec![2024, 2023]);
    let all_models = facets.models.clone();

    session.drill_down("华为");
    assert_eq!(session.facets().models, ["Mate 60 Pro", "Pura 70 Ultra"]);
    assert!(session
        .facets()
        .models
        .iter()
        .all(|model| all_models.contains(model)));
}

#[tokio::test]
async fn brand_table_sorts_by_review_count() {
    let mut session = fixture_session();
    session.load(Category::Phone).await.expect("load");

    session.click_sort(SortField::TotalReviews);
    let descending: Vec<u64> = session
        .sorted_brands()
        .iter()
        .map(|row| row.stats.total_reviews)
        .collect();
    assert_eq!(descending, [6752, 4820, 3950, 3120]);

    session.click_sort(SortField::TotalReviews);
    let ascending: Vec<u64> = session
        .sorted_brands()
        .iter()
        .map(|row| row.stats.total_reviews)
        .collect();
    assert_eq!(ascending, [3120, 3950, 4820, 6752]);
}

#[tokio::test]
async fn fixture_brand_counts_are_consistent() {
    let mut session = fixture_session();
    for category in Category::ALL {
        session.load(category).await.expect("load");
        let summary = session.summary().expect("summary");
        for row in &summary.brands {
            let stats = &row.stats;
            assert_eq!(stats.pos + stats.neg + stats.neutral, stats.total_reviews, "{}", row.brand_en);
            #[allow(clippy::cast_precision_loss)]
            let derived = stats.pos as f64 / stats.total_reviews as f64;
            assert!((derived - stats.positive_rate).abs() < 1e-3, "{}", row.brand_en);
        }
    }
}

#[tokio::test]
async fn unmatched_drill_down_reports_no_matches() {
    let mut session = fixture_session();
    session.load(Category::Device).await.expect("load");
    session.drill_down("戴森");
    assert!(session.visible_comments().is_empty());
    assert_eq!(session.empty_state(), Some(EmptyState::NoMatches));
}

#[tokio::test]
async fn insight_echoes_question_for_active_category() {
    let mut session = fixture_session();
    session.load(Category::Car).await.expect("load");
    let answer = session.ask("  SU7   range? ").await.expect("answer");
    assert!(answer.contains("\"SU7 range?\""));
    assert!(session.ask("   ").await.is_none());
}
