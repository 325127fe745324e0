//! Row records and cell values

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single cell. Anything that is not a number, bool or null is carried as
/// its display text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

static NULL_CELL: CellValue = CellValue::Null;

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric value, if the cell holds a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Immutable mapping from column accessor to cell value.
///
/// Rows have no identity of their own; the table refers to them by position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell insertion
    pub fn with(mut self, accessor: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(accessor.into(), value.into());
        self
    }

    /// Cell for `accessor`; missing cells read as null
    pub fn get(&self, accessor: &str) -> &CellValue {
        self.cells.get(accessor).unwrap_or(&NULL_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cell_is_null() {
        let row = Row::new().with("name", "Bob");
        assert_eq!(row.get("name"), &CellValue::Text("Bob".into()));
        assert!(row.get("age").is_null());
    }

    #[test]
    fn test_display_matches_plain_text() {
        assert_eq!(CellValue::Int(25).to_string(), "25");
        assert_eq!(CellValue::Float(25.0).to_string(), "25");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_row_from_json() {
        let row: Row = serde_json::from_str(r#"{"name":"Ann","age":25,"score":1.5,"nick":null}"#)
            .unwrap();
        assert_eq!(row.get("age"), &CellValue::Int(25));
        assert_eq!(row.get("score"), &CellValue::Float(1.5));
        assert!(row.get("nick").is_null());
        assert_eq!(row.len(), 4);
    }
}
