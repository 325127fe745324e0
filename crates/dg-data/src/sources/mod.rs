//! Row sources: loaders and external page owners

pub mod csv_source;
pub mod memory_source;

pub use csv_source::CsvSource;
pub use memory_source::MemorySource;

use async_trait::async_trait;
use dg_core::{FilterState, Row, SortState};
use serde::{Deserialize, Serialize};

use crate::DataError;

/// Request for one page of sorted, filtered rows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub sort: SortState,
    pub filters: FilterState,
    /// 1-based page
    pub page: usize,
    pub page_size: usize,
}

/// One page of rows plus the size of the whole filtered collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub rows: Vec<Row>,
    pub total_count: usize,
    /// Page actually served after clamping
    pub page: usize,
}

/// An owner that sorts, filters and pages rows on the table's behalf.
///
/// The table engine never calls this; its owner does, in response to the
/// engine's change callbacks.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Serve one page
    async fn query(&self, query: &PageQuery) -> Result<PageResult, DataError>;

    /// Number of unfiltered rows
    async fn row_count(&self) -> Result<usize, DataError>;

    /// Get the source name
    fn source_name(&self) -> &str;
}
