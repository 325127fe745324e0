//! Change-notification and interaction callbacks
//!
//! Callbacks are boxed `FnMut` closures so an owner can capture channels or
//! shared state. They must be `Send` so a table can move between tasks.

use crate::row::Row;
use crate::state::{FilterState, SortDirection};

/// Invoked with the requested sort key and direction
pub type SortChangeFn = dyn FnMut(&str, SortDirection) + Send;

/// Invoked with the full filter mapping
pub type FilterChangeFn = dyn FnMut(&FilterState) + Send;

/// Invoked with the requested 1-based page
pub type PageChangeFn = dyn FnMut(usize) + Send;

/// Invoked with a displayed row and its display index
pub type RowEventFn = dyn FnMut(&Row, usize) + Send;

/// Box a closure as a sort-change callback
pub fn sort_handler<F>(f: F) -> Box<SortChangeFn>
where
    F: FnMut(&str, SortDirection) + Send + 'static,
{
    Box::new(f)
}

/// Box a closure as a filter-change callback
pub fn filter_handler<F>(f: F) -> Box<FilterChangeFn>
where
    F: FnMut(&FilterState) + Send + 'static,
{
    Box::new(f)
}

/// Box a closure as a page-change callback
pub fn page_handler<F>(f: F) -> Box<PageChangeFn>
where
    F: FnMut(usize) + Send + 'static,
{
    Box::new(f)
}

/// Box a closure as a row click or double-click callback
pub fn row_handler<F>(f: F) -> Box<RowEventFn>
where
    F: FnMut(&Row, usize) + Send + 'static,
{
    Box::new(f)
}
