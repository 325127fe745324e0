use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use dg_core::{CellValue, Column, FilterKind, SelectOption};
use tracing::debug;

use crate::config::NullConfig;

/// Text columns with at most this many distinct values become select filters
pub const DEFAULT_MAX_SELECT_OPTIONS: usize = 12;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage type detected for a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Date,
    Text,
}

/// Schema detector for inferring column descriptors from sample data
pub struct SchemaDetector {
    sample_size: usize,
    max_select_options: usize,
    null_config: NullConfig,
}

/// Information about a detected schema
#[derive(Debug, Clone)]
pub struct SchemaInfo {
    pub columns: Vec<Column>,
    /// Cell storage type per column, same order as `columns`
    pub kinds: Vec<ValueKind>,
    pub column_stats: HashMap<String, ColumnStats>,
}

/// Statistics about a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnStats {
    pub null_count: usize,
    pub distinct_count: usize,
    pub is_unique: bool,
}

impl SchemaDetector {
    pub fn new() -> Self {
        Self {
            sample_size: 1000,
            max_select_options: DEFAULT_MAX_SELECT_OPTIONS,
            null_config: NullConfig::default(),
        }
    }

    /// Set the number of rows inspected per column
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.max(1);
        self
    }

    pub fn with_max_select_options(mut self, max: usize) -> Self {
        self.max_select_options = max;
        self
    }

    pub fn with_null_config(mut self, null_config: NullConfig) -> Self {
        self.null_config = null_config;
        self
    }

    pub fn null_config(&self) -> &NullConfig {
        &self.null_config
    }

    /// Detect column descriptors from headers and raw sample rows.
    /// All detected columns are sortable and filterable.
    pub fn detect_from_samples(&self, headers: &[String], samples: &[Vec<String>]) -> SchemaInfo {
        let samples = &samples[..samples.len().min(self.sample_size)];
        let mut columns = Vec::with_capacity(headers.len());
        let mut kinds = Vec::with_capacity(headers.len());
        let mut column_stats = HashMap::new();

        for (col_idx, header) in headers.iter().enumerate() {
            let (kind, stats, distinct) = self.analyze_column(samples, col_idx);
            let column = self.describe_column(header, kind, &stats, distinct, samples.len());
            debug!(column = %header, ?kind, filter = ?column.filter_kind, "Detected column");

            columns.push(column);
            kinds.push(kind);
            column_stats.insert(header.clone(), stats);
        }

        SchemaInfo {
            columns,
            kinds,
            column_stats,
        }
    }

    /// Analyze a single column
    fn analyze_column(
        &self,
        samples: &[Vec<String>],
        col_idx: usize,
    ) -> (ValueKind, ColumnStats, BTreeSet<String>) {
        let mut null_count = 0;
        let mut value_count = 0;
        let mut distinct = BTreeSet::new();
        let mut is_int = true;
        let mut is_float = true;
        let mut is_date = true;

        for row in samples {
            let value = match row.get(col_idx) {
                Some(v) if !self.null_config.is_null(v) => v.trim(),
                _ => {
                    null_count += 1;
                    continue;
                }
            };
            value_count += 1;

            if is_int && value.parse::<i64>().is_err() {
                is_int = false;
            }
            if is_float && !value.parse::<f64>().map(f64::is_finite).unwrap_or(false) {
                is_float = false;
            }
            if is_date && !Self::looks_like_date(value) {
                is_date = false;
            }
            distinct.insert(value.to_string());
        }

        let kind = if value_count == 0 {
            ValueKind::Text
        } else if is_int {
            ValueKind::Integer
        } else if is_float {
            ValueKind::Float
        } else if is_date {
            ValueKind::Date
        } else {
            ValueKind::Text
        };

        let stats = ColumnStats {
            null_count,
            distinct_count: distinct.len(),
            is_unique: distinct.len() == value_count,
        };

        (kind, stats, distinct)
    }

    fn describe_column(
        &self,
        header: &str,
        kind: ValueKind,
        stats: &ColumnStats,
        distinct: BTreeSet<String>,
        sampled_rows: usize,
    ) -> Column {
        let column = Column::new(header, header).sortable();
        match kind {
            ValueKind::Integer | ValueKind::Float => column.filter_kind(FilterKind::Number),
            ValueKind::Date => column.filter_kind(FilterKind::Date),
            ValueKind::Text => {
                let few_values = stats.distinct_count > 0
                    && stats.distinct_count <= self.max_select_options
                    && stats.distinct_count * 2 < sampled_rows;
                if few_values {
                    column.options(
                        distinct
                            .into_iter()
                            .map(|v| SelectOption::new(v.clone(), v))
                            .collect(),
                    )
                } else {
                    column
                }
            }
        }
    }

    /// ISO calendar date
    fn looks_like_date(value: &str) -> bool {
        NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
    }
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a raw cell into a typed value
pub fn parse_cell(raw: &str, kind: ValueKind, null_config: &NullConfig) -> CellValue {
    if null_config.is_null(raw) {
        return CellValue::Null;
    }
    let value = raw.trim();
    match kind {
        ValueKind::Integer => value
            .parse::<i64>()
            .map(CellValue::Int)
            .unwrap_or_else(|_| CellValue::from(value)),
        ValueKind::Float => value
            .parse::<f64>()
            .map(CellValue::Float)
            .unwrap_or_else(|_| CellValue::from(value)),
        // Dates stay textual so filters compare the ISO form
        ValueKind::Date | ValueKind::Text => CellValue::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["id", "score", "joined", "role", "name"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn samples() -> Vec<Vec<String>> {
        (0..10)
            .map(|i| {
                vec![
                    i.to_string(),
                    format!("{}.5", i),
                    format!("2024-01-{:02}", i + 1),
                    if i % 2 == 0 { "Admin" } else { "User" }.to_string(),
                    format!("person {}", i),
                ]
            })
            .collect()
    }

    #[test]
    fn test_detects_filter_kinds() {
        let info = SchemaDetector::new().detect_from_samples(&headers(), &samples());
        let kinds: Vec<_> = info.columns.iter().map(|c| c.filter_kind).collect();
        assert_eq!(
            kinds,
            vec![
                FilterKind::Number,
                FilterKind::Number,
                FilterKind::Date,
                FilterKind::Select,
                FilterKind::Text
            ]
        );
        assert_eq!(info.kinds[1], ValueKind::Float);
        assert!(info.columns.iter().all(|c| c.sortable && c.filterable));
    }

    #[test]
    fn test_select_options_sorted() {
        let info = SchemaDetector::new().detect_from_samples(&headers(), &samples());
        let values: Vec<_> = info.columns[3].options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Admin", "User"]);
    }

    #[test]
    fn test_nulls_counted_and_skipped() {
        let samples = vec![
            vec!["1".to_string()],
            vec!["N/A".to_string()],
            vec!["3".to_string()],
        ];
        let info = SchemaDetector::new().detect_from_samples(&["n".to_string()], &samples);
        assert_eq!(info.kinds[0], ValueKind::Integer);
        assert_eq!(info.column_stats["n"].null_count, 1);
        assert!(info.column_stats["n"].is_unique);
    }

    #[test]
    fn test_parse_cell() {
        let nulls = NullConfig::default();
        assert_eq!(parse_cell(" 42 ", ValueKind::Integer, &nulls), CellValue::Int(42));
        assert_eq!(parse_cell("1.5", ValueKind::Float, &nulls), CellValue::Float(1.5));
        assert_eq!(parse_cell("-", ValueKind::Float, &nulls), CellValue::Null);
        assert_eq!(
            parse_cell("2024-02-01", ValueKind::Date, &nulls),
            CellValue::from("2024-02-01")
        );
    }
}
