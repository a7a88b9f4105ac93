//! Plain-text rendering of a dashboard session for the terminal.

use std::fmt::Write;

use crate::facets::FacetOptions;
use crate::pagination::{EmptyState, Page, PageMarker};
use crate::table::{hot_model_preview, SortDirection, SortField, SortState};
use crate::types::{BrandRow, Comment, DashboardSummary};

pub fn render_summary(summary: &DashboardSummary) -> String {
    let platforms: Vec<&str> = summary.platforms.iter().map(|platform| platform.as_str()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", summary.category.label());
    let _ = writeln!(out, "Platforms:      {:>8}  ({})", platforms.len(), platforms.join(", "));
    let _ = writeln!(out, "Brands:         {:>8}  ({})", summary.brand_count, summary.brand_names().join(", "));
    let _ = writeln!(out, "Models:         {:>8}  ({})", summary.model_count, summary.hot_models().join(", "));
    let _ = writeln!(out, "Raw comments:   {:>8}", summary.raw_comment_count);
    let _ = writeln!(out, "User sentences: {:>8}", summary.user_sentence_count);
    out
}

fn sort_marker(sort: SortState, field: SortField) -> &'static str {
    match (sort.field, sort.direction) {
        (Some(active), SortDirection::Asc) if active == field => " ^",
        (Some(active), SortDirection::Desc) if active == field => " v",
        _ => "",
    }
}

pub fn render_brand_table(rows: &[&BrandRow], sort: SortState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<40} {:<28} {:>9} {:>7} {:>7} {:>7} {:>8}",
        "Brand",
        "Hot models",
        "Sources",
        format!("Reviews{}", sort_marker(sort, SortField::TotalReviews)),
        "Pos",
        "Neg",
        "Neutral",
        format!("Rate{}", sort_marker(sort, SortField::PositiveRate)),
    );
    for row in rows {
        let (shown, hidden) = hot_model_preview(row);
        let mut models = shown.join(", ");
        if hidden > 0 {
            let _ = write!(models, " +{hidden}");
        }
        let sources: Vec<&str> = row.sources.iter().map(|source| source.as_str()).collect();
        let _ = writeln!(
            out,
            "{:<24} {:<40} {:<28} {:>9} {:>7} {:>7} {:>7} {:>7.1}%",
            format!("{} ({})", row.brand_cn, row.brand_en),
            models,
            sources.join(" / "),
            row.stats.total_reviews,
            row.stats.pos,
            row.stats.neg,
            row.stats.neutral,
            row.stats.positive_rate * 100.0,
        );
    }
    out
}

pub fn render_facets(facets: &FacetOptions) -> String {
    let platforms: Vec<&str> = facets.platforms.iter().map(|platform| platform.as_str()).collect();
    let years: Vec<String> = facets.years.iter().map(ToString::to_string).collect();
    format!(
        "Models: {}\nPlatforms: {}\nYears: {}\n",
        facets.models.join(", "),
        platforms.join(", "),
        years.join(", ")
    )
}

fn render_comment(out: &mut String, comment: &Comment) {
    let likes = comment
        .like_count
        .map_or_else(|| "-".to_string(), |count| count.to_string());
    let _ = writeln!(
        out,
        "{}  {:<10} {:<12} {:<20} {:<8} {:>6}",
        comment.datetime.format("%Y-%m-%d %H:%M"),
        comment.platform.as_str(),
        comment.brand_cn,
        comment.model_cn,
        comment.sentiment.label(),
        likes,
    );
    if let Some(title) = &comment.title {
        let _ = writeln!(out, "    {title}");
    }
    let _ = writeln!(out, "    {}", comment.content);
}

pub fn render_page_window(page: &Page<'_, Comment>) -> String {
    page.window()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Number(number) if number == page.number => format!("[{number}]"),
            PageMarker::Number(number) => number.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_comment_page(page: &Page<'_, Comment>, empty: Option<EmptyState>) -> String {
    if let Some(empty) = empty {
        return format!("{}\n", empty.message());
    }

    let mut out = String::new();
    for comment in page.items {
        render_comment(&mut out, comment);
    }
    if let Some((first, last)) = page.item_range() {
        let _ = writeln!(out, "Showing {first}-{last} of {}", page.total_items);
    }
    if page.total_pages > 1 {
        let _ = writeln!(out, "Pages: {}", render_page_window(page));
    }
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
