use crate::core::{DEFAULT_PAGE_SIZE, Page, Pagination};

/// A page request with defaults already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self::from_parts(Some(page), Some(limit))
    }

    /// Zero and missing values fall back to the defaults.
    pub fn from_parts(page: Option<usize>, limit: Option<usize>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(defaults.page),
            limit: limit.filter(|l| *l >= 1).unwrap_or(defaults.limit),
        }
    }

    /// Lenient parsing of raw query values. Anything that is not a positive
    /// integer is treated as absent.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::from_parts(page.and_then(parse_positive), limit.and_then(parse_positive))
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

fn parse_positive(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|v| *v >= 1)
}

/// Slice `items` in insertion order. Pages past the end come back empty.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total = items.len();
    let data = items
        .iter()
        .skip(request.offset())
        .take(request.limit)
        .cloned()
        .collect();

    Page {
        data,
        pagination: Pagination {
            current_page: request.page,
            total_pages: total.div_ceil(request.limit),
            total_items: total,
            items_per_page: request.limit,
        },
    }
}
