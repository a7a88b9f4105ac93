use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::*;
use crate::insight::MockInsightResponder;
use crate::provider::DatasetProvider;
use crate::test_support::{brand_row, comment, sample_comments};
use crate::types::{Platform, Sentiment};

struct StaticProvider {
    comments: Vec<Comment>,
    fail_for: Option<Category>,
}

impl StaticProvider {
    fn summary(category: Category) -> DashboardSummary {
        DashboardSummary {
            category,
            platforms: vec![Platform::Reddit, Platform::Bilibili, Platform::GsmArena],
            brand_count: 3,
            model_count: 5,
            raw_comment_count: 7,
            user_sentence_count: 21,
            brands: vec![
                brand_row("Apple", 100, 0.4),
                brand_row("Xiaomi", 50, 0.6),
                brand_row("Samsung", 200, 0.5),
            ],
        }
    }
}

#[async_trait]
impl DatasetProvider for StaticProvider {
    async fn fetch_summary(&self, category: Category) -> Result<Loaded<DashboardSummary>, DashboardError> {
        if self.fail_for == Some(category) {
            return Err(DashboardError::load(category, crate::error::Dataset::Summary, "boom"));
        }
        Ok(Loaded {
            data: Self::summary(category),
            revision: format!("summary-{category}"),
        })
    }

    async fn fetch_comments(&self, category: Category) -> Result<Loaded<Vec<Comment>>, DashboardError> {
        Ok(Loaded {
            data: self.comments.clone(),
            revision: format!("comments-{category}"),
        })
    }
}

fn session_with(comments: Vec<Comment>, fail_for: Option<Category>) -> DashboardSession {
    let provider = InstrumentedProvider::new(Arc::new(StaticProvider { comments, fail_for }), "test".to_string());
    let insight = InstrumentedInsightResponder::new(
        Arc::new(MockInsightResponder::new(Duration::ZERO)),
        "mock".to_string(),
        "test".to_string(),
    );
    DashboardSession::new("test".to_string(), provider, insight)
}

fn visible_ids(session: &DashboardSession) -> Vec<String> {
    session
        .visible_comments()
        .iter()
        .map(|comment| comment.id.clone())
        .collect()
}

#[tokio::test]
async fn load_populates_views() {
    let mut session = session_with(sample_comments(), None);
    assert_eq!(session.category(), None);
    assert!(session.comments().is_empty());

    session.load(Category::Phone).await.expect("load");
    assert_eq!(session.category(), Some(Category::Phone));
    assert_eq!(session.visible_comments().len(), 7);
    assert_eq!(session.facets().years, vec![2024, 2023]);
    assert_eq!(session.empty_state(), None);
}

#[tokio::test]
async fn drill_down_then_clear_keeps_other_filters() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Phone).await.expect("load");

    session.drill_down("Apple");
    assert_eq!(session.criteria(), &FilterCriteria::for_brand("Apple"));
    session
        .update_criteria(|criteria| criteria.sentiment = Some(Sentiment::Negative))
        .expect("valid");
    assert_eq!(visible_ids(&session), ["c1", "c6"]);
    assert_eq!(session.facets().models, ["iPhone 16", "iPhone 16 Pro"]);

    session.clear_drill_down();
    assert_eq!(session.drill_down_brand(), None);
    assert!(session.criteria().brands.is_empty());
    assert_eq!(visible_ids(&session), ["c7", "c1", "c3", "c6"]);
}

#[tokio::test]
async fn drill_down_resets_previous_filters() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Phone).await.expect("load");
    session
        .update_criteria(|criteria| criteria.year = Some(2023))
        .expect("valid");

    session.drill_down("Samsung");
    assert_eq!(session.criteria().year, None);
    assert_eq!(visible_ids(&session), ["c4", "c7"]);
}

#[tokio::test]
async fn invalid_criteria_leave_state_untouched() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Phone).await.expect("load");
    let err = session
        .update_criteria(|criteria| criteria.month = Some(13))
        .unwrap_err();
    assert!(matches!(err, DashboardError::InvalidFilter { .. }));
    assert_eq!(session.criteria().month, None);
    assert_eq!(session.visible_comments().len(), 7);
}

#[tokio::test]
async fn empty_results_report_why() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Phone).await.expect("load");

    session
        .update_criteria(|criteria| criteria.month = Some(9))
        .expect("valid");
    assert_eq!(session.empty_state(), Some(EmptyState::NoBrandSelected));

    session.drill_down("Nokia");
    assert_eq!(session.empty_state(), Some(EmptyState::NoMatches));
    assert!(session.current_page().items.is_empty());
}

#[tokio::test]
async fn paging_is_clamped_and_reset_by_filters() {
    let comments: Vec<Comment> = (0..25)
        .map(|idx| {
            comment(
                &format!("p{idx:02}"),
                if idx % 2 == 0 { "Apple" } else { "Xiaomi" },
                "Model",
                "Reddit",
                Sentiment::Neutral,
                &format!("2024-05-{:02}T10:00:00Z", idx + 1),
            )
        })
        .collect();
    let mut session = session_with(comments, None);
    session.load(Category::Phone).await.expect("load");

    assert_eq!(session.current_page().total_pages, 3);
    session.go_to_page(3);
    assert_eq!(session.current_page().items.len(), 5);
    session.next_page();
    assert_eq!(session.current_page().number, 3);

    session.previous_page();
    assert_eq!(session.current_page().number, 2);

    session.drill_down("Apple");
    assert_eq!(session.current_page().number, 1);
    assert_eq!(session.current_page().total_pages, 2);
    assert_eq!(session.current_page().items[0].id, "p24");
}

#[tokio::test]
async fn sort_clicks_reorder_brand_rows() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Car).await.expect("load");
    let names = |session: &DashboardSession| -> Vec<String> {
        session
            .sorted_brands()
            .iter()
            .map(|row| row.brand_cn.clone())
            .collect()
    };

    assert_eq!(names(&session), ["Apple", "Xiaomi", "Samsung"]);
    session.click_sort(SortField::TotalReviews);
    assert_eq!(names(&session), ["Samsung", "Apple", "Xiaomi"]);
    session.click_sort(SortField::TotalReviews);
    assert_eq!(names(&session), ["Xiaomi", "Apple", "Samsung"]);
    session.click_sort(SortField::PositiveRate);
    assert_eq!(names(&session), ["Xiaomi", "Samsung", "Apple"]);
}

#[tokio::test]
async fn stale_load_is_discarded() {
    let mut session = session_with(sample_comments(), None);
    let provider = session.provider.clone();

    let stale = session.begin_load(Category::Phone);
    let current = session.begin_load(Category::Car);
    assert!(!session.is_current(&stale));

    let stale_result = provider.fetch_category(Category::Phone).await;
    assert!(!session.complete_load(stale, stale_result).expect("discarded"));
    assert_eq!(session.category(), None);

    let current_result = provider.fetch_category(Category::Car).await;
    assert!(session.complete_load(current, current_result).expect("applied"));
    assert_eq!(session.category(), Some(Category::Car));
}

#[tokio::test]
async fn failed_load_clears_previous_category() {
    let mut session = session_with(sample_comments(), Some(Category::Device));
    session.load(Category::Phone).await.expect("load");
    session.drill_down("Apple");

    let err = session.load(Category::Device).await.unwrap_err();
    assert!(matches!(err, DashboardError::DataLoad { .. }));
    assert_eq!(session.category(), None);
    assert_eq!(session.drill_down_brand(), None);
    assert!(session.visible_comments().is_empty());
    assert!(session.sorted_brands().is_empty());
}

#[tokio::test]
async fn category_switch_resets_selections() {
    let mut session = session_with(sample_comments(), None);
    session.load(Category::Phone).await.expect("load");
    session.drill_down("Apple");
    session.click_sort(SortField::PositiveRate);

    session.load(Category::Car).await.expect("load");
    assert_eq!(session.drill_down_brand(), None);
    assert!(session.criteria().is_unrestricted());
    assert_eq!(session.sort_state(), SortState::default());
}

#[tokio::test]
async fn ask_requires_a_loaded_category() {
    let mut session = session_with(sample_comments(), None);
    assert_eq!(session.ask("anything").await, None);

    session.load(Category::Device).await.expect("load");
    let answer = session.ask("noise?").await.expect("answer");
    assert!(answer.contains("\"noise?\""));
}
