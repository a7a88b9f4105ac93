use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::DashboardError;
use crate::types::BrandRow;

/// Hot models shown per brand row before collapsing into a `+N` marker.
pub const HOT_MODEL_PREVIEW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    TotalReviews,
    PositiveRate,
}

impl SortField {
    fn compare(self, a: &BrandRow, b: &BrandRow) -> Ordering {
        match self {
            Self::TotalReviews => a.stats.total_reviews.cmp(&b.stats.total_reviews),
            Self::PositiveRate => a.stats.positive_rate.total_cmp(&b.stats.positive_rate),
        }
    }
}

impl FromStr for SortField {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "total_reviews" => Ok(Self::TotalReviews),
            "positive_rate" => Ok(Self::PositiveRate),
            _ => Err(DashboardError::filter("sort field", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(DashboardError::filter("sort direction", value)),
        }
    }
}

/// Column sort selection for the brand table. No field means input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Header click: the active field flips direction, any other field starts descending.
    pub fn click(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Desc;
        }
    }
}

pub fn sort_brands<'a>(rows: &'a [BrandRow], state: &SortState) -> Vec<&'a BrandRow> {
    let mut sorted: Vec<&BrandRow> = rows.iter().collect();
    if let Some(field) = state.field {
        sorted.sort_by(|a, b| match state.direction {
            SortDirection::Asc => field.compare(a, b),
            SortDirection::Desc => field.compare(b, a),
        });
    }
    sorted
}

/// Up to [`HOT_MODEL_PREVIEW`] hot models and how many were left out.
pub fn hot_model_preview(row: &BrandRow) -> (&[String], usize) {
    let shown = row.hot_models.len().min(HOT_MODEL_PREVIEW);
    (&row.hot_models[..shown], row.hot_models.len() - shown)
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
