use std::ops::RangeInclusive;

use serde::Serialize;

/// What a pagination bar needs to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationSummary {
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub can_prev: bool,
    pub can_next: bool,
    /// Whether the bar is shown at all
    pub visible: bool,
}

impl PaginationSummary {
    pub fn new(enabled: bool, page: usize, total_pages: usize, total_rows: usize) -> Self {
        Self {
            page,
            total_pages,
            total_rows,
            can_prev: page > 1,
            can_next: page < total_pages,
            visible: enabled && total_pages > 1,
        }
    }

    /// Page buttons, 1-based
    pub fn pages(&self) -> RangeInclusive<usize> {
        1..=self.total_pages
    }

    /// "Page 2 of 5 (Total: 48)"
    pub fn label(&self) -> String {
        format!(
            "Page {} of {} (Total: {})",
            self.page, self.total_pages, self.total_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_page() {
        let first = PaginationSummary::new(true, 1, 3, 25);
        assert!(!first.can_prev && first.can_next && first.visible);
        assert_eq!(first.pages().collect::<Vec<_>>(), vec![1, 2, 3]);

        let last = PaginationSummary::new(true, 3, 3, 25);
        assert!(last.can_prev && !last.can_next);
        assert_eq!(last.label(), "Page 3 of 3 (Total: 25)");
    }

    #[test]
    fn test_hidden_when_single_page_or_disabled() {
        assert!(!PaginationSummary::new(true, 1, 1, 4).visible);
        assert!(!PaginationSummary::new(false, 1, 5, 50).visible);
    }
}
