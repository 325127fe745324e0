//! Column descriptors

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::GridError;

/// How a column's filter input compares against cell values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Case-insensitive substring match
    #[default]
    Text,
    /// Exact match on the stringified cell
    Number,
    /// Exact match against one of the column's options
    Select,
    /// Exact match on the stringified cell
    Date,
}

impl FilterKind {
    /// Whether a non-empty filter value requires an exact match
    pub fn is_exact(self) -> bool {
        !matches!(self, FilterKind::Text)
    }
}

/// One entry of a select filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Describes one column of the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Key into each row
    pub accessor: String,
    /// Display label
    pub header: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default)]
    pub filter_kind: FilterKind,
    /// Options offered by a select filter, in display order
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl Column {
    /// Create a filterable, non-sortable text column
    pub fn new(accessor: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            accessor: accessor.into(),
            header: header.into(),
            sortable: false,
            filterable: true,
            filter_kind: FilterKind::Text,
            options: Vec::new(),
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    pub fn filter_kind(mut self, kind: FilterKind) -> Self {
        self.filter_kind = kind;
        self
    }

    /// Turn the column into a select filter with the given options
    pub fn options(mut self, options: Vec<SelectOption>) -> Self {
        self.filter_kind = FilterKind::Select;
        self.options = options;
        self
    }

    fn validate(&self) -> Result<(), GridError> {
        if self.accessor.is_empty() {
            return Err(GridError::EmptyAccessor);
        }
        if self.filter_kind == FilterKind::Select && self.options.is_empty() {
            return Err(GridError::MissingSelectOptions(self.accessor.clone()));
        }
        Ok(())
    }
}

/// Validated, ordered column list with accessor lookup
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
    index: AHashMap<String, usize>,
}

impl ColumnSet {
    /// Validate and index a column list.
    ///
    /// Accessors must be unique and select columns must carry options.
    pub fn new(columns: Vec<Column>) -> Result<Self, GridError> {
        let mut index = AHashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            column.validate()?;
            if index.insert(column.accessor.clone(), idx).is_some() {
                return Err(GridError::DuplicateAccessor(column.accessor.clone()));
            }
        }
        Ok(Self { columns, index })
    }

    pub fn get(&self, accessor: &str) -> Option<&Column> {
        self.index.get(accessor).map(|&idx| &self.columns[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether a header click on `accessor` may change the sort
    pub fn is_sortable(&self, accessor: &str) -> bool {
        self.get(accessor).map(|c| c.sortable).unwrap_or(false)
    }

    /// Whether a filter edit on `accessor` may change the filters
    pub fn is_filterable(&self, accessor: &str) -> bool {
        self.get(accessor).map(|c| c.filterable).unwrap_or(false)
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_accessor_rejected() {
        let result = ColumnSet::new(vec![
            Column::new("name", "Name"),
            Column::new("name", "Other"),
        ]);
        assert!(matches!(result, Err(GridError::DuplicateAccessor(a)) if a == "name"));
    }

    #[test]
    fn test_select_requires_options() {
        let result = ColumnSet::new(vec![
            Column::new("role", "Role").filter_kind(FilterKind::Select),
        ]);
        assert!(matches!(result, Err(GridError::MissingSelectOptions(_))));

        let ok = ColumnSet::new(vec![
            Column::new("role", "Role").options(vec![SelectOption::new("Admin", "Admin")]),
        ]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_lookup_flags() {
        let columns = ColumnSet::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("notes", "Notes").filterable(false),
        ])
        .unwrap();

        assert!(columns.is_sortable("name"));
        assert!(!columns.is_sortable("notes"));
        assert!(!columns.is_filterable("notes"));
        assert!(!columns.is_filterable("missing"));
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_deserialize_defaults() {
        let column: Column =
            serde_json::from_str(r#"{"accessor":"age","header":"Age","filter_kind":"number"}"#)
                .unwrap();
        assert!(column.filterable);
        assert!(!column.sortable);
        assert_eq!(column.filter_kind, FilterKind::Number);
    }
}
