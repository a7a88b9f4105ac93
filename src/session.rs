use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::error::DashboardError;
use crate::facets::{derive_facets, FacetOptions};
use crate::filter::{filter_comments, FilterCriteria};
use crate::insight::InstrumentedInsightResponder;
use crate::metrics::{DASHBOARD_VIEW_RECOMPUTE_TOTAL, DASHBOARD_VISIBLE_COMMENTS};
use crate::pagination::{clamp_page, paginate, total_pages, EmptyState, Page, PAGE_SIZE};
use crate::provider::{InstrumentedProvider, Loaded};
use crate::table::{sort_brands, SortField, SortState};
use crate::types::{BrandRow, Category, Comment, DashboardSummary};

/// Identifies one category load. Results for an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub category: Category,
    generation: u64,
}

struct LoadedCategory {
    category: Category,
    summary: DashboardSummary,
    comments: Vec<Comment>,
    revision: String,
}

#[derive(PartialEq)]
struct FacetKey {
    revision: String,
    brands: BTreeSet<String>,
}

#[derive(PartialEq)]
struct VisibleKey {
    revision: String,
    drill_down: Option<String>,
    criteria: FilterCriteria,
}

/// Holds the active category's data and the user's filter, sort and page
/// selections, memoising the derived facets and visible comments.
pub struct DashboardSession {
    session_id: String,
    provider: InstrumentedProvider,
    insight: InstrumentedInsightResponder,
    generation: u64,
    loaded: Option<LoadedCategory>,
    drill_down: Option<String>,
    criteria: FilterCriteria,
    sort: SortState,
    page: usize,
    facets: FacetOptions,
    facet_key: Option<FacetKey>,
    visible: Vec<Comment>,
    visible_key: Option<VisibleKey>,
}

impl DashboardSession {
    pub fn new(session_id: String, provider: InstrumentedProvider, insight: InstrumentedInsightResponder) -> Self {
        Self {
            session_id,
            provider,
            insight,
            generation: 0,
            loaded: None,
            drill_down: None,
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
            page: 1,
            facets: FacetOptions::default(),
            facet_key: None,
            visible: Vec::new(),
            visible_key: None,
        }
    }

    /// Fetches `category` and makes it the active dataset.
    pub async fn load(&mut self, category: Category) -> Result<(), DashboardError> {
        let ticket = self.begin_load(category);
        let result = self.provider.fetch_category(category).await;
        self.complete_load(ticket, result).map(|_| ())
    }

    /// Starts a load, superseding any ticket handed out earlier.
    pub fn begin_load(&mut self, category: Category) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            category,
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies a finished fetch. Returns `Ok(false)` when the ticket was
    /// superseded and the result discarded.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<(Loaded<DashboardSummary>, Loaded<Vec<Comment>>), DashboardError>,
    ) -> Result<bool, DashboardError> {
        if !self.is_current(&ticket) {
            debug!(
                session_id = %self.session_id,
                category = %ticket.category,
                "Discarding stale category load"
            );
            return Ok(false);
        }

        let (summary, comments) = match result {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(session_id = %self.session_id, category = %ticket.category, error = %err, "Category load failed");
                self.loaded = None;
                self.reset_selections();
                return Err(err);
            }
        };

        info!(
            session_id = %self.session_id,
            category = %ticket.category,
            brands = summary.data.brands.len(),
            comments = comments.data.len(),
            "Category loaded"
        );

        self.loaded = Some(LoadedCategory {
            category: ticket.category,
            summary: summary.data,
            comments: comments.data,
            revision: format!("{}:{}", summary.revision, comments.revision),
        });
        self.reset_selections();
        Ok(true)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn category(&self) -> Option<Category> {
        self.loaded.as_ref().map(|loaded| loaded.category)
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.loaded.as_ref().map(|loaded| &loaded.summary)
    }

    pub fn comments(&self) -> &[Comment] {
        self.loaded
            .as_ref()
            .map(|loaded| loaded.comments.as_slice())
            .unwrap_or_default()
    }

    pub fn drill_down_brand(&self) -> Option<&str> {
        self.drill_down.as_deref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn facets(&self) -> &FacetOptions {
        &self.facets
    }

    /// Filtered comments, most recent first.
    pub fn visible_comments(&self) -> &[Comment] {
        &self.visible
    }

    pub fn current_page(&self) -> Page<'_, Comment> {
        paginate(&self.visible, self.page, PAGE_SIZE)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        self.visible
            .is_empty()
            .then(|| EmptyState::for_drill_down(self.drill_down.as_deref()))
    }

    pub fn sorted_brands(&self) -> Vec<&BrandRow> {
        self.summary()
            .map(|summary| sort_brands(&summary.brands, &self.sort))
            .unwrap_or_default()
    }

    /// Row click: narrows to `brand` and resets every other filter.
    pub fn drill_down(&mut self, brand: impl Into<String>) {
        let brand = brand.into();
        self.criteria = FilterCriteria::for_brand(brand.clone());
        self.drill_down = Some(brand);
        self.page = 1;
        self.refresh();
    }

    /// Drops the drill-down brand, including from the brand filter, and keeps
    /// the remaining filters.
    pub fn clear_drill_down(&mut self) {
        if let Some(brand) = self.drill_down.take() {
            self.criteria.brands.remove(&brand);
        }
        self.page = 1;
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> Result<(), DashboardError> {
        criteria.validate()?;
        self.criteria = criteria;
        self.page = 1;
        self.refresh();
        Ok(())
    }

    /// Edits a copy of the criteria and applies it only if it validates.
    pub fn update_criteria(&mut self, edit: impl FnOnce(&mut FilterCriteria)) -> Result<(), DashboardError> {
        let mut criteria = self.criteria.clone();
        edit(&mut criteria);
        self.set_criteria(criteria)
    }

    pub fn click_sort(&mut self, field: SortField) {
        self.sort.click(field);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = clamp_page(page, total_pages(self.visible.len(), PAGE_SIZE));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    /// Asks the insight responder about the active category. `None` when no
    /// category is loaded or the query is blank.
    pub async fn ask(&self, query: &str) -> Option<String> {
        let category = self.category()?;
        self.insight.ask(category, query).await
    }

    fn reset_selections(&mut self) {
        self.drill_down = None;
        self.criteria = FilterCriteria::default();
        self.sort = SortState::default();
        self.page = 1;
        self.refresh();
    }

    fn refresh(&mut self) {
        let (revision, comments, category) = match &self.loaded {
            Some(loaded) => (loaded.revision.clone(), loaded.comments.as_slice(), loaded.category.as_str()),
            None => (String::new(), &[][..], "none"),
        };

        let facet_key = FacetKey {
            revision: revision.clone(),
            brands: self.criteria.brands.clone(),
        };
        if self.facet_key.as_ref() != Some(&facet_key) {
            self.facets = derive_facets(comments, &facet_key.brands);
            self.facet_key = Some(facet_key);
        }

        let visible_key = VisibleKey {
            revision,
            drill_down: self.drill_down.clone(),
            criteria: self.criteria.clone(),
        };
        if self.visible_key.as_ref() != Some(&visible_key) {
            self.visible = filter_comments(comments, self.drill_down.as_deref(), &self.criteria)
                .into_iter()
                .cloned()
                .collect();
            self.visible_key = Some(visible_key);

            DASHBOARD_VIEW_RECOMPUTE_TOTAL.with_label_values(&[category]).inc();
            DASHBOARD_VISIBLE_COMMENTS
                .with_label_values(&[category])
                .set(i64::try_from(self.visible.len()).unwrap_or(i64::MAX));
            debug!(
                session_id = %self.session_id,
                category,
                visible = self.visible.len(),
                "Comment view recomputed"
            );
        }

        self.page = clamp_page(self.page, total_pages(self.visible.len(), PAGE_SIZE));
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
