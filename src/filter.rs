use std::collections::BTreeSet;

use crate::error::DashboardError;
use crate::types::{Comment, Platform, Sentiment};

const ALL: &str = "all";

/// Comment filter selections. Empty sets and `None` selectors match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub brands: BTreeSet<String>,
    pub models: BTreeSet<String>,
    pub platforms: BTreeSet<Platform>,
    pub sentiment: Option<Sentiment>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl FilterCriteria {
    /// Defaults with the brand set narrowed to exactly `brand`.
    pub fn for_brand(brand: impl Into<String>) -> Self {
        Self {
            brands: BTreeSet::from([brand.into()]),
            ..Self::default()
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(DashboardError::filter("month", month.to_string()));
            }
        }
        if let Some(year) = self.year {
            if !(1..=9999).contains(&year) {
                return Err(DashboardError::filter("year", year.to_string()));
            }
        }
        Ok(())
    }
}

pub fn parse_sentiment_selector(value: &str) -> Result<Option<Sentiment>, DashboardError> {
    if is_all(value) {
        return Ok(None);
    }
    value.parse().map(Some)
}

pub fn parse_year_selector(value: &str) -> Result<Option<i32>, DashboardError> {
    if is_all(value) {
        return Ok(None);
    }
    let year: i32 = value
        .trim()
        .parse()
        .map_err(|_| DashboardError::filter("year", value))?;
    if !(1..=9999).contains(&year) {
        return Err(DashboardError::filter("year", value));
    }
    Ok(Some(year))
}

pub fn parse_month_selector(value: &str) -> Result<Option<u32>, DashboardError> {
    if is_all(value) {
        return Ok(None);
    }
    let month: u32 = value
        .trim()
        .parse()
        .map_err(|_| DashboardError::filter("month", value))?;
    if !(1..=12).contains(&month) {
        return Err(DashboardError::filter("month", value));
    }
    Ok(Some(month))
}

fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL)
}

/// One independent predicate of the comment filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint<'a> {
    DrillDown(&'a str),
    Brands(&'a BTreeSet<String>),
    Models(&'a BTreeSet<String>),
    Platforms(&'a BTreeSet<Platform>),
    Sentiment(Sentiment),
    Year(i32),
    Month(u32),
}

impl Constraint<'_> {
    pub fn matches(&self, comment: &Comment) -> bool {
        match self {
            Self::DrillDown(brand) => comment.brand_cn == *brand,
            Self::Brands(brands) => brands.contains(&comment.brand_cn),
            Self::Models(models) => models.contains(&comment.model_cn),
            Self::Platforms(platforms) => platforms.contains(&comment.platform),
            Self::Sentiment(sentiment) => comment.sentiment == *sentiment,
            Self::Year(year) => comment.year == *year,
            Self::Month(month) => comment.month == *month,
        }
    }
}

/// The active constraints for a drill-down brand and criteria, in evaluation
/// order. Unset criteria contribute nothing.
pub fn constraints<'a>(drill_down: Option<&'a str>, criteria: &'a FilterCriteria) -> Vec<Constraint<'a>> {
    let mut active = Vec::with_capacity(7);
    if let Some(brand) = drill_down {
        active.push(Constraint::DrillDown(brand));
    }
    if !criteria.brands.is_empty() {
        active.push(Constraint::Brands(&criteria.brands));
    }
    if !criteria.models.is_empty() {
        active.push(Constraint::Models(&criteria.models));
    }
    if !criteria.platforms.is_empty() {
        active.push(Constraint::Platforms(&criteria.platforms));
    }
    if let Some(sentiment) = criteria.sentiment {
        active.push(Constraint::Sentiment(sentiment));
    }
    if let Some(year) = criteria.year {
        active.push(Constraint::Year(year));
    }
    if let Some(month) = criteria.month {
        active.push(Constraint::Month(month));
    }
    active
}

/// Positions of matching comments, most recent first. Equal timestamps keep
/// their input order.
pub fn matching_indices(comments: &[Comment], drill_down: Option<&str>, criteria: &FilterCriteria) -> Vec<usize> {
    let active = constraints(drill_down, criteria);
    let mut indices: Vec<usize> = comments
        .iter()
        .enumerate()
        .filter(|(_, comment)| active.iter().all(|constraint| constraint.matches(comment)))
        .map(|(idx, _)| idx)
        .collect();
    indices.sort_by(|&a, &b| comments[b].datetime.cmp(&comments[a].datetime));
    indices
}

pub fn filter_comments<'a>(
    comments: &'a [Comment],
    drill_down: Option<&str>,
    criteria: &FilterCriteria,
) -> Vec<&'a Comment> {
    matching_indices(comments, drill_down, criteria)
        .into_iter()
        .map(|idx| &comments[idx])
        .collect()
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
