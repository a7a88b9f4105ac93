use thiserror::Error;

use crate::types::Category;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("failed to load {dataset} for {category}: {reason}")]
    DataLoad {
        category: Category,
        dataset: Dataset,
        reason: String,
    },

    #[error("invalid {field} filter: {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),
}

impl DashboardError {
    pub(crate) fn load(category: Category, dataset: Dataset, reason: impl Into<String>) -> Self {
        Self::DataLoad {
            category,
            dataset,
            reason: reason.into(),
        }
    }

    pub(crate) fn filter(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidFilter {
            field,
            value: value.into(),
        }
    }
}

/// Which of the two per-category fixture documents an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Summary,
    Comments,
}

impl Dataset {
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Comments => "comments",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
