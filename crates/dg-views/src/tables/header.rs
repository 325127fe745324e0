//! Header row model: labels, sort indicators and filter controls

use dg_core::{ColumnSet, FilterKind, FilterState, SelectOption, SortDirection, SortState};
use serde::Serialize;

/// Sort affordance of one header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    /// Column is not sortable
    None,
    /// Sortable, not the current key
    Inactive,
    Active(SortDirection),
}

/// Filter input shown under a header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub kind: FilterKind,
    /// Text currently shown in the control
    pub value: String,
    /// Choices for select controls, starting with "All"
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub accessor: String,
    pub label: String,
    pub sort_indicator: SortIndicator,
    /// `None` for non-filterable columns
    pub filter: Option<FilterControl>,
}

/// Build the header row. `filters` is the mapping the controls display.
pub fn header_cells(columns: &ColumnSet, sort: &SortState, filters: &FilterState) -> Vec<HeaderCell> {
    columns
        .iter()
        .map(|column| {
            let sort_indicator = if !column.sortable {
                SortIndicator::None
            } else if sort.key.as_deref() == Some(column.accessor.as_str()) {
                SortIndicator::Active(sort.direction)
            } else {
                SortIndicator::Inactive
            };

            let filter = column.filterable.then(|| {
                let options = if column.filter_kind == FilterKind::Select {
                    std::iter::once(SelectOption::new("All", ""))
                        .chain(column.options.iter().cloned())
                        .collect()
                } else {
                    Vec::new()
                };
                FilterControl {
                    kind: column.filter_kind,
                    value: filters.raw(&column.accessor).to_string(),
                    options,
                }
            });

            HeaderCell {
                accessor: column.accessor.clone(),
                label: column.header.clone(),
                sort_indicator,
                filter,
            }
        })
        .collect()
}
