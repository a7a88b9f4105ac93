/// Comments shown per page.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// Clamped 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<'_, T> {
    /// 1-based inclusive range of the items on this page, `None` when empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.number - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn window(&self) -> Vec<PageMarker> {
        page_window(self.number, self.total_pages)
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps `requested` into `[1, total_pages]`. An empty collection has page 1.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

pub fn paginate<T>(items: &[T], requested: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let number = clamp_page(requested, total_pages);
    let start = ((number - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        number,
        total_pages,
        total_items: items.len(),
        page_size,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis,
}

/// Page links to show: first, last and the neighbours of `current`, with each
/// gap collapsed into one ellipsis.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    let mut previous: Option<usize> = None;
    for page in 1..=total_pages {
        let visible = page == 1 || page == total_pages || current.abs_diff(page) <= 1;
        if !visible {
            continue;
        }
        if let Some(prev) = previous {
            if page != prev + 1 {
                markers.push(PageMarker::Ellipsis);
            }
        }
        markers.push(PageMarker::Number(page));
        previous = Some(page);
    }
    markers
}

/// Why a comment list rendered nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoBrandSelected,
    NoMatches,
}

impl EmptyState {
    pub fn for_drill_down(drill_down: Option<&str>) -> Self {
        match drill_down {
            Some(_) => Self::NoMatches,
            None => Self::NoBrandSelected,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NoBrandSelected => "Select a brand in the table above to inspect its comments.",
            Self::NoMatches => "No comments match the current filters.",
        }
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
