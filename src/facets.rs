//! Selectable filter values derived from a category's comments.

use std::collections::{BTreeSet, HashSet};

use crate::types::{Comment, Platform};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetOptions {
    pub models: Vec<String>,
    pub platforms: Vec<Platform>,
    pub years: Vec<i32>,
}

pub fn derive_facets(comments: &[Comment], selected_brands: &BTreeSet<String>) -> FacetOptions {
    FacetOptions {
        models: model_options(comments, selected_brands),
        platforms: platform_options(comments),
        years: year_options(comments),
    }
}

/// Distinct models in ascending order, limited to the selected brands when any are selected.
pub fn model_options(comments: &[Comment], selected_brands: &BTreeSet<String>) -> Vec<String> {
    comments
        .iter()
        .filter(|comment| selected_brands.is_empty() || selected_brands.contains(&comment.brand_cn))
        .map(|comment| comment.model_cn.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct platforms in the order they first appear.
pub fn platform_options(comments: &[Comment]) -> Vec<Platform> {
    let mut seen = HashSet::new();
    comments
        .iter()
        .filter(|comment| seen.insert(&comment.platform))
        .map(|comment| comment.platform.clone())
        .collect()
}

/// Distinct years, most recent first.
pub fn year_options(comments: &[Comment]) -> Vec<i32> {
    comments
        .iter()
        .map(|comment| comment.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

#[cfg(test)]
#[path = "facets_test.rs"]
mod tests;
