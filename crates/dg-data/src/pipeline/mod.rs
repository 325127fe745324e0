//! Filter, sort and paginate pipeline
//!
//! The pipeline works on row indices so the caller's rows are never copied
//! or mutated. Each stage is optional: a concern owned by an external party
//! passes `None` and its stage becomes identity.

pub mod filter;
pub mod paginate;
pub mod sort;

use dg_core::{ColumnSet, FilterState, Row, SortState};

pub use filter::{cell_matches, filter_indices, row_matches};
pub use paginate::{paginate, PageSlice, PageWindow};
pub use sort::{compare_cells, locale_cmp, sort_indices};

/// Parameters of one pipeline pass. `None` skips the stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineParams<'a> {
    pub filters: Option<&'a FilterState>,
    pub sort: Option<&'a SortState>,
    pub page: Option<PageWindow>,
}

/// Displayed row collection produced by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineOutput {
    /// Indices into the input rows, in display order
    pub indices: Vec<usize>,
    /// Row count after filtering, before paging
    pub total_rows: usize,
    pub total_pages: usize,
    /// Effective page; 1 when not paging
    pub page: usize,
}

impl PipelineOutput {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolve the displayed rows against the input rows
    pub fn rows<'r>(&'r self, rows: &'r [Row]) -> impl Iterator<Item = &'r Row> + 'r {
        self.indices.iter().filter_map(move |&idx| rows.get(idx))
    }
}

/// Run filter, then sort, then paginate over `rows`
pub fn apply_pipeline(
    rows: &[Row],
    columns: &ColumnSet,
    params: &PipelineParams<'_>,
) -> PipelineOutput {
    let mut indices: Vec<usize> = (0..rows.len()).collect();

    if let Some(filters) = params.filters {
        indices = filter_indices(rows, indices, columns, filters);
    }

    if let Some(sort) = params.sort {
        sort_indices(rows, &mut indices, sort);
    }

    let total_rows = indices.len();
    match params.page {
        Some(window) => {
            let slice = paginate(indices, window);
            PipelineOutput {
                indices: slice.indices,
                total_rows,
                total_pages: slice.state.total_pages(),
                page: slice.state.page,
            }
        }
        None => PipelineOutput {
            indices,
            total_rows,
            total_pages: 1,
            page: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{Column, FilterKind, SortDirection};
    use proptest::prelude::*;

    fn columns() -> ColumnSet {
        ColumnSet::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("age", "Age").filter_kind(FilterKind::Number),
        ])
        .unwrap()
    }

    fn people() -> Vec<Row> {
        vec![
            Row::new().with("name", "Bob").with("age", 30),
            Row::new().with("name", "Ann").with("age", 25),
            Row::new().with("name", "Cid").with("age", 25),
        ]
    }

    fn names(rows: &[Row], output: &PipelineOutput) -> Vec<String> {
        output.rows(rows).map(|r| r.get("name").to_string()).collect()
    }

    #[test]
    fn test_sort_then_page() {
        let rows = people();
        let sort = SortState::new("name", SortDirection::Asc);
        let filters = FilterState::new();

        let page1 = apply_pipeline(
            &rows,
            &columns(),
            &PipelineParams {
                filters: Some(&filters),
                sort: Some(&sort),
                page: Some(PageWindow::new(1, 2)),
            },
        );
        assert_eq!(names(&rows, &page1), vec!["Ann", "Bob"]);
        assert_eq!(page1.total_pages, 2);
        assert_eq!(page1.total_rows, 3);

        let page2 = apply_pipeline(
            &rows,
            &columns(),
            &PipelineParams {
                filters: Some(&filters),
                sort: Some(&sort),
                page: Some(PageWindow::new(2, 2)),
            },
        );
        assert_eq!(names(&rows, &page2), vec!["Cid"]);
    }

    #[test]
    fn test_filter_before_sort() {
        let rows = people();
        let sort = SortState::new("name", SortDirection::Desc);
        let filters = FilterState::new().with("age", "25");
        let output = apply_pipeline(
            &rows,
            &columns(),
            &PipelineParams {
                filters: Some(&filters),
                sort: Some(&sort),
                page: Some(PageWindow::new(1, 2)),
            },
        );
        assert_eq!(names(&rows, &output), vec!["Cid", "Ann"]);
        assert_eq!(output.total_pages, 1);
    }

    #[test]
    fn test_skipped_stages_are_identity() {
        let rows = people();
        let output = apply_pipeline(&rows, &columns(), &PipelineParams::default());
        assert_eq!(output.indices, vec![0, 1, 2]);
        assert_eq!(output.total_pages, 1);
        assert_eq!(output.page, 1);
    }

    proptest! {
        #[test]
        fn prop_pipeline_is_idempotent(
            ages in proptest::collection::vec(proptest::option::of(0i64..5), 0..40),
            filter in proptest::option::of(0i64..5),
            desc in any::<bool>(),
            page in 1usize..6,
            page_size in 1usize..8,
        ) {
            let rows: Vec<Row> = ages
                .iter()
                .enumerate()
                .map(|(i, age)| Row::new().with("name", format!("n{}", i % 7)).with("age", *age))
                .collect();
            let snapshot = rows.clone();
            let filters = match filter {
                Some(age) => FilterState::new().with("age", age.to_string()),
                None => FilterState::new(),
            };
            let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
            let sort = SortState::new("age", direction);
            let params = PipelineParams {
                filters: Some(&filters),
                sort: Some(&sort),
                page: Some(PageWindow::new(page, page_size)),
            };

            let first = apply_pipeline(&rows, &columns(), &params);
            let second = apply_pipeline(&rows, &columns(), &params);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&rows, &snapshot);
            prop_assert!(first.len() <= page_size);
            prop_assert!(first.page >= 1 && first.page <= first.total_pages);
        }
    }
}
