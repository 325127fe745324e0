//! Core types for the data grid engine
//!
//! This crate provides the table data model (columns, rows, cell values),
//! the per-concern state for sorting, filtering and pagination, and the
//! authority resolver that decides whether a concern is owned locally or by
//! an external owner.

pub mod authority;
pub mod column;
pub mod config;
pub mod error;
pub mod events;
pub mod row;
pub mod state;

// Re-export commonly used types
pub use authority::{Authority, AuthorityKind, Concern, ConcernSlot, Route};
pub use column::{Column, ColumnSet, FilterKind, SelectOption};
pub use config::{TableConfig, VirtualizationConfig};
pub use error::GridError;
pub use events::{FilterChangeFn, PageChangeFn, RowEventFn, SortChangeFn};
pub use row::{CellValue, Row};
pub use state::{FilterMap, FilterState, PaginationState, SortDirection, SortState};

/// Identifier of a table engine instance, used in log fields
pub type TableId = uuid::Uuid;
