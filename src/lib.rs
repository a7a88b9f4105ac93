pub mod app;
pub mod config;
pub mod error;
pub mod facets;
pub mod filter;
pub mod insight;
pub mod logging;
pub mod metrics;
pub mod pagination;
pub mod provider;
pub mod report;
pub mod session;
pub mod table;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::{Dataset, DashboardError};
pub use filter::FilterCriteria;
pub use session::DashboardSession;
pub use types::{BrandRow, BrandStats, Category, Comment, DashboardSummary, Platform, Sentiment};
