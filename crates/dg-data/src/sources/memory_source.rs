use std::sync::Arc;

use async_trait::async_trait;
use dg_core::{ColumnSet, Row};
use parking_lot::RwLock;
use tracing::debug;

use crate::pipeline::{apply_pipeline, PageWindow, PipelineParams};
use crate::sources::{PageQuery, PageResult, RowSource};
use crate::DataError;

/// In-process row source that runs the pipeline on the owner's side
pub struct MemorySource {
    name: String,
    columns: ColumnSet,
    rows: RwLock<Arc<Vec<Row>>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: RwLock::new(Arc::new(rows)),
        }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Swap in a new row set; queries already running keep the old one
    pub fn replace_rows(&self, rows: Vec<Row>) {
        *self.rows.write() = Arc::new(rows);
    }
}

#[async_trait]
impl RowSource for MemorySource {
    async fn query(&self, query: &PageQuery) -> Result<PageResult, DataError> {
        if query.page_size == 0 {
            return Err(DataError::Other("page_size must be > 0".to_string()));
        }

        let rows = Arc::clone(&*self.rows.read());
        let output = apply_pipeline(
            &rows,
            &self.columns,
            &PipelineParams {
                filters: Some(&query.filters),
                sort: Some(&query.sort),
                page: Some(PageWindow::new(query.page, query.page_size)),
            },
        );
        debug!(
            source = %self.name,
            page = output.page,
            total = output.total_rows,
            "Served page"
        );

        Ok(PageResult {
            rows: output.rows(&rows).cloned().collect(),
            total_count: output.total_rows,
            page: output.page,
        })
    }

    async fn row_count(&self) -> Result<usize, DataError> {
        Ok(self.rows.read().len())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
