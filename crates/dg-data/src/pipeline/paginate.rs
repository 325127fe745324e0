//! Page slicing

use serde::{Deserialize, Serialize};

use dg_core::PaginationState;

/// Requested page of a paginated collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
}

impl PageWindow {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }
}

/// Result of slicing one page out of a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    pub indices: Vec<usize>,
    pub state: PaginationState,
}

/// Slice `indices` to the requested page.
///
/// An out-of-range page is clamped into `[1, total_pages]` for reading; the
/// caller's own page value is left alone.
pub fn paginate(indices: Vec<usize>, window: PageWindow) -> PageSlice {
    let page_size = window.page_size.max(1);
    let total_rows = indices.len();
    let mut state = PaginationState::new(window.page, page_size, total_rows);
    state.page = state.clamped_page();

    let start = state.offset().min(total_rows);
    let end = start.saturating_add(page_size).min(total_rows);
    let indices = if start == 0 && end == total_rows {
        indices
    } else {
        indices[start..end].to_vec()
    };

    PageSlice { indices, state }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_pages() {
        let first = paginate(vec![10, 11, 12], PageWindow::new(1, 2));
        assert_eq!(first.indices, vec![10, 11]);
        assert_eq!(first.state.total_pages(), 2);
        assert_eq!(first.state.total_rows, 3);

        let second = paginate(vec![10, 11, 12], PageWindow::new(2, 2));
        assert_eq!(second.indices, vec![12]);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let slice = paginate(vec![1, 2, 3], PageWindow::new(9, 2));
        assert_eq!(slice.state.page, 2);
        assert_eq!(slice.indices, vec![3]);

        let slice = paginate(vec![1, 2, 3], PageWindow::new(0, 2));
        assert_eq!(slice.state.page, 1);
        assert_eq!(slice.indices, vec![1, 2]);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let slice = paginate(Vec::new(), PageWindow::new(1, 10));
        assert!(slice.indices.is_empty());
        assert_eq!(slice.state.total_pages(), 1);
    }
}
