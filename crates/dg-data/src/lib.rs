//! Row pipeline, windowing and data sources for the data grid

pub mod cache;
pub mod config;
pub mod pipeline;
pub mod schema;
pub mod sources;
pub mod window;

use dg_core::GridError;
use thiserror::Error;
use tokio::task::JoinError;

// Re-exports
pub use cache::{key_fingerprint, PipelineCache, PipelineKey};
pub use config::NullConfig;
pub use pipeline::{apply_pipeline, PageWindow, PipelineOutput, PipelineParams};
pub use schema::{SchemaDetector, SchemaInfo};
pub use sources::{CsvSource, MemorySource, PageQuery, PageResult, RowSource};
pub use window::{clamp_scroll_offset, compute_window, max_scroll_offset, VisibleWindow, WindowParams};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Schema detection error: {0}")]
    SchemaDetection(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => {
                DataError::Io(std::io::Error::new(io_err.kind(), error.to_string()))
            }
            _ => DataError::Csv(error.to_string()),
        }
    }
}
