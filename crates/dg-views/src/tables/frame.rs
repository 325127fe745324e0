use dg_core::Row;
use dg_data::VisibleWindow;

/// One materialized row and its index in the displayed collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRow<'a> {
    pub index: usize,
    pub row: &'a Row,
}

/// Rows to paint for the current scroll position
#[derive(Debug, Clone, PartialEq)]
pub struct RowFrame<'a> {
    pub rows: Vec<DisplayRow<'a>>,
    pub window: VisibleWindow,
    /// Length of the whole displayed collection
    pub total_displayed: usize,
    pub loading: bool,
}

impl RowFrame<'_> {
    /// Spacer height above the first painted row
    pub fn top_pad(&self) -> f64 {
        self.window.top_pad
    }

    /// Spacer height below the last painted row
    pub fn bottom_pad(&self) -> f64 {
        self.window.bottom_pad
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
