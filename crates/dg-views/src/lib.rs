//! Headless table views for the data grid

pub mod tables;

pub use tables::{
    header_cells, DebounceTimer, DisplayRow, FilterControl, FilterDebouncer, HeaderCell,
    PaginationSummary, RowFrame, SortIndicator, TableEngine,
};
