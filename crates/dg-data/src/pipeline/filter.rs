//! Row filtering

use dg_core::{CellValue, ColumnSet, FilterKind, FilterState, Row};

/// One active column predicate, prepared once per pass
struct Predicate<'a> {
    accessor: &'a str,
    kind: FilterKind,
    needle: String,
}

impl Predicate<'_> {
    fn matches(&self, row: &Row) -> bool {
        cell_matches_prepared(row.get(self.accessor), self.kind, &self.needle)
    }
}

/// Whether `cell` passes a filter of `kind` with value `needle`.
///
/// Null cells never match an active filter. Text filters are
/// case-insensitive substring matches; every other kind compares the
/// stringified cell for equality.
pub fn cell_matches(cell: &CellValue, kind: FilterKind, needle: &str) -> bool {
    match kind {
        FilterKind::Text => cell_matches_prepared(cell, kind, &needle.to_lowercase()),
        _ => cell_matches_prepared(cell, kind, needle),
    }
}

fn cell_matches_prepared(cell: &CellValue, kind: FilterKind, needle: &str) -> bool {
    if cell.is_null() {
        return false;
    }
    let text = cell.to_string();
    match kind {
        FilterKind::Text => text.to_lowercase().contains(needle),
        FilterKind::Number | FilterKind::Select | FilterKind::Date => text == needle,
    }
}

fn predicates<'a>(columns: &'a ColumnSet, filters: &FilterState) -> Vec<Predicate<'a>> {
    columns
        .iter()
        .filter(|column| column.filterable)
        .filter_map(|column| {
            let value = filters.get(&column.accessor)?;
            let needle = match column.filter_kind {
                FilterKind::Text => value.to_lowercase(),
                _ => value.to_string(),
            };
            Some(Predicate {
                accessor: &column.accessor,
                kind: column.filter_kind,
                needle,
            })
        })
        .collect()
}

/// Whether `row` passes every active filter. Filters on unknown or
/// non-filterable columns are ignored.
pub fn row_matches(row: &Row, columns: &ColumnSet, filters: &FilterState) -> bool {
    predicates(columns, filters).iter().all(|p| p.matches(row))
}

/// Keep the indices whose rows pass every active filter, preserving order
pub fn filter_indices(
    rows: &[Row],
    indices: Vec<usize>,
    columns: &ColumnSet,
    filters: &FilterState,
) -> Vec<usize> {
    let predicates = predicates(columns, filters);
    if predicates.is_empty() {
        return indices;
    }
    indices
        .into_iter()
        .filter(|&idx| predicates.iter().all(|p| p.matches(&rows[idx])))
        .collect()
}
