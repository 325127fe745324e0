use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use dg_core::{ColumnSet, Row};
use tracing::info;

use crate::schema::{parse_cell, SchemaDetector, SchemaInfo};
use crate::sources::MemorySource;
use crate::DataError;

/// Rows and inferred columns loaded from a CSV file
pub struct CsvSource {
    name: String,
    columns: ColumnSet,
    rows: Vec<Row>,
    schema: SchemaInfo,
}

impl CsvSource {
    /// Load a CSV file off the async runtime's worker threads
    pub async fn load(path: PathBuf) -> Result<Self, DataError> {
        tokio::task::spawn_blocking(move || Self::load_blocking(&path, &SchemaDetector::new()))
            .await?
    }

    /// Load a CSV file on the current thread
    pub fn load_blocking(path: &Path, detector: &SchemaDetector) -> Result<Self, DataError> {
        let file = File::open(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self::from_reader(BufReader::new(file), name, detector)
    }

    /// Parse CSV text with a header row from any reader
    pub fn from_reader<R: Read>(
        reader: R,
        name: impl Into<String>,
        detector: &SchemaDetector,
    ) -> Result<Self, DataError> {
        let name = name.into();
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(DataError::SchemaDetection(format!("{}: no header row", name)));
        }

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let schema = detector.detect_from_samples(&headers, &records);
        let columns = ColumnSet::new(schema.columns.clone())?;

        let null_config = detector.null_config();
        let rows: Vec<Row> = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .zip(&schema.kinds)
                    .enumerate()
                    .map(|(idx, (header, kind))| {
                        let raw = record.get(idx).map(String::as_str).unwrap_or("");
                        (header.clone(), parse_cell(raw, *kind, null_config))
                    })
                    .collect::<Row>()
            })
            .collect();

        info!(source = %name, rows = rows.len(), columns = columns.len(), "Loaded CSV");

        Ok(Self {
            name,
            columns,
            rows,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn schema(&self) -> &SchemaInfo {
        &self.schema
    }

    pub fn into_parts(self) -> (ColumnSet, Vec<Row>) {
        (self.columns, self.rows)
    }

    /// Serve the loaded rows as an external page source
    pub fn into_memory_source(self) -> MemorySource {
        MemorySource::new(self.name, self.columns, self.rows)
    }
}
