//! Headless table engine
//!
//! [`TableEngine`] owns the sort, filter and pagination concerns of one table,
//! runs the row pipeline for the concerns it owns locally, forwards requests
//! for externally owned concerns to their callbacks, and computes the window
//! of rows a renderer should paint.
//!
//! The engine is driven by discrete events (header click, filter input, page
//! request, scroll, prop update). The only deferred work is the filter
//! debounce, which the host drives through [`TableEngine::next_deadline`] and
//! [`TableEngine::poll_timers`].

mod debounce;
mod frame;
mod header;
mod pager;

pub use debounce::{DebounceTimer, FilterDebouncer};
pub use frame::{DisplayRow, RowFrame};
pub use header::{header_cells, FilterControl, HeaderCell, SortIndicator};
pub use pager::PaginationSummary;

use std::sync::Arc;
use std::time::{Duration, Instant};

use dg_core::{
    Authority, AuthorityKind, Column, ColumnSet, Concern, ConcernSlot, FilterChangeFn,
    FilterState, GridError, PageChangeFn, PaginationState, Route, Row, RowEventFn,
    SortChangeFn, SortState, TableConfig, TableId,
};
use dg_data::{
    apply_pipeline, clamp_scroll_offset, compute_window, key_fingerprint, PageWindow,
    PipelineCache, PipelineKey, PipelineOutput, PipelineParams, VisibleWindow, WindowParams,
};
use serde_json::Value;
use tracing::{debug, info, trace, warn};

/// Sort, filter, pagination and windowing state of one table
pub struct TableEngine {
    id: TableId,
    config: TableConfig,

    columns: ColumnSet,
    columns_generation: u64,
    rows: Arc<Vec<Row>>,
    rows_generation: u64,
    loading: bool,

    sort: ConcernSlot<SortState, SortChangeFn>,
    filters: ConcernSlot<FilterState, FilterChangeFn>,
    pagination: ConcernSlot<usize, PageChangeFn>,
    /// Size of the full remote collection under external pagination
    total_count: Option<usize>,
    debouncer: FilterDebouncer,

    scroll_offset: f64,
    window: VisibleWindow,

    on_row_click: Option<Box<RowEventFn>>,
    on_row_double_click: Option<Box<RowEventFn>>,

    cache: PipelineCache,
    display: Arc<PipelineOutput>,
    /// Effective page, clamped for display
    pages: PaginationState,
    disposed: bool,
}

impl TableEngine {
    /// Create an engine with no rows. Fails on an invalid configuration.
    pub fn new(columns: ColumnSet, config: TableConfig) -> Result<Self, GridError> {
        config.validate()?;
        let quiet = Duration::from_millis(config.filter_debounce_ms);
        let page_size = config.page_size;

        let mut engine = Self {
            id: TableId::new_v4(),
            config,
            columns,
            columns_generation: 0,
            rows: Arc::new(Vec::new()),
            rows_generation: 0,
            loading: false,
            sort: ConcernSlot::new(Concern::Sort, SortState::default()),
            filters: ConcernSlot::new(Concern::Filter, FilterState::new()),
            pagination: ConcernSlot::new(Concern::Pagination, 1),
            total_count: None,
            debouncer: FilterDebouncer::new(quiet),
            scroll_offset: 0.0,
            window: VisibleWindow::default(),
            on_row_click: None,
            on_row_double_click: None,
            cache: PipelineCache::new(),
            display: Arc::new(PipelineOutput::default()),
            pages: PaginationState::new(1, page_size, 0),
            disposed: false,
        };
        engine.refresh();
        info!(table_id = %engine.id, columns = engine.columns.len(), "Created table engine");
        Ok(engine)
    }

    /// Create an engine from plain column descriptors
    pub fn from_columns(columns: Vec<Column>, config: TableConfig) -> Result<Self, GridError> {
        Self::new(ColumnSet::new(columns)?, config)
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ---- props ----

    /// Replace the row collection
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = Arc::new(rows);
        self.rows_generation += 1;
        self.refresh();
    }

    /// Replace the column descriptors
    pub fn set_columns(&mut self, columns: Vec<Column>) -> Result<(), GridError> {
        self.set_column_set(ColumnSet::new(columns)?);
        Ok(())
    }

    pub fn set_column_set(&mut self, columns: ColumnSet) {
        self.columns = columns;
        self.columns_generation += 1;
        self.refresh();
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: TableConfig) -> Result<(), GridError> {
        config.validate()?;
        self.debouncer
            .set_quiet_period(Duration::from_millis(config.filter_debounce_ms));
        self.config = config;
        self.refresh();
        Ok(())
    }

    /// Flat settings form of the configuration
    pub fn save_config(&self) -> Value {
        self.config.save_config()
    }

    /// Apply the recognized keys of a flat settings value
    pub fn load_config(&mut self, config: Value) {
        let mut next = self.config.clone();
        next.load_config(config);
        if let Err(err) = self.set_config(next) {
            warn!(table_id = %self.id, error = %err, "Ignoring invalid table settings");
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Externally owned sort state; `None` hands it back
    pub fn set_external_sort(&mut self, sort: Option<SortState>) {
        self.sort.set_external(sort);
        self.refresh();
    }

    /// Externally owned filter mapping; reflected values overwrite the echo
    pub fn set_external_filters(&mut self, filters: Option<FilterState>) {
        if let Some(filters) = &filters {
            self.debouncer.reconcile(filters);
        }
        self.filters.set_external(filters);
        self.refresh();
    }

    /// Externally owned 1-based page
    pub fn set_external_page(&mut self, page: Option<usize>) {
        self.pagination.set_external(page);
        self.refresh();
    }

    /// Total row count of an externally paged collection
    pub fn set_total_count(&mut self, total_count: Option<usize>) {
        self.total_count = total_count;
        self.refresh();
    }

    pub fn set_on_sort_change(&mut self, callback: Option<Box<SortChangeFn>>) {
        self.sort.set_callback(callback);
        self.refresh();
    }

    pub fn set_on_filters_change(&mut self, callback: Option<Box<FilterChangeFn>>) {
        match callback {
            Some(_) if !self.filters.has_callback() => {
                let seed = self.filters.current().clone();
                self.debouncer.reconcile(&seed);
            }
            None => self.debouncer.cancel(),
            Some(_) => {}
        }
        self.filters.set_callback(callback);
        self.refresh();
    }

    /// Hand pagination to the owner.
    ///
    /// With a callback the engine never slices `rows`: they are taken to be
    /// the current page. Page count comes from [`Self::set_total_count`];
    /// without a total it falls back to the length of `rows`, so an owner
    /// that passes a single page gets a single page and cannot advance.
    pub fn set_on_page_change(&mut self, callback: Option<Box<PageChangeFn>>) {
        self.pagination.set_callback(callback);
        self.refresh();
    }

    pub fn set_on_row_click(&mut self, callback: Option<Box<RowEventFn>>) {
        self.on_row_click = callback;
    }

    pub fn set_on_row_double_click(&mut self, callback: Option<Box<RowEventFn>>) {
        self.on_row_double_click = callback;
    }

    // ---- requests ----

    /// Header click. Returns whether the request was applied or forwarded.
    pub fn toggle_sort(&mut self, accessor: &str) -> bool {
        if self.disposed {
            return false;
        }
        if !self.columns.is_sortable(accessor) {
            debug!(table_id = %self.id, accessor, "Rejected sort on non-sortable column");
            return false;
        }

        let next = self.sort.current().toggled(accessor);
        match self.sort.resolve().route() {
            Route::Apply(state) => {
                *state = next;
                self.refresh();
            }
            Route::Notify(callback) => callback(accessor, next.direction),
            Route::Reject => {
                debug!(table_id = %self.id, accessor, "Rejected sort on read-only external sort");
                return false;
            }
        }
        true
    }

    /// Filter input change at `now`. An accepted change always sends the
    /// table back to page 1.
    pub fn set_filter(&mut self, accessor: &str, value: &str, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        if !self.columns.is_filterable(accessor) {
            debug!(table_id = %self.id, accessor, "Rejected filter on non-filterable column");
            return false;
        }

        let accepted = match self.filters.resolve().route() {
            Route::Apply(state) => {
                state.set(accessor, value);
                true
            }
            Route::Notify(_) => {
                self.debouncer.input(accessor, value, now);
                true
            }
            Route::Reject => false,
        };
        if !accepted {
            debug!(table_id = %self.id, accessor, "Rejected filter on read-only external filter");
            return false;
        }

        self.reset_page();
        self.refresh();
        true
    }

    /// Request a 1-based page. Pages outside `[1, total_pages]` are ignored.
    pub fn set_page(&mut self, page: usize) -> bool {
        if self.disposed {
            return false;
        }
        if !self.config.pagination {
            debug!(table_id = %self.id, page, "Rejected page change, pagination disabled");
            return false;
        }
        if !self.pages.accepts(page) {
            debug!(
                table_id = %self.id,
                page,
                total_pages = self.pages.total_pages(),
                "Rejected out-of-range page"
            );
            return false;
        }

        match self.pagination.resolve().route() {
            Route::Apply(current) => {
                *current = page;
                self.refresh();
            }
            Route::Notify(callback) => callback(page),
            Route::Reject => {
                debug!(table_id = %self.id, page, "Rejected page on read-only external pagination");
                return false;
            }
        }
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.set_page(self.pages.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.pages.page.saturating_sub(1))
    }

    /// Scroll event. Negative and non-finite offsets read as 0.
    pub fn scroll_to(&mut self, offset: f64) {
        if self.disposed {
            return;
        }
        self.scroll_offset = if offset.is_finite() && offset > 0.0 {
            offset
        } else {
            0.0
        };
        self.recompute_window();
    }

    /// Forward a debounced filter change if its quiet period has elapsed.
    /// Returns whether the filter callback was invoked.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let Some(filters) = self.debouncer.poll(now) else {
            return false;
        };

        match self.filters.resolve() {
            Authority::External {
                callback: Some(callback),
                ..
            } => {
                debug!(
                    table_id = %self.id,
                    filters = key_fingerprint(&filters),
                    "Forwarding debounced filter change"
                );
                callback(&filters);
                true
            }
            _ => false,
        }
    }

    /// When the host should next call [`poll_timers`](Self::poll_timers)
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        self.debouncer.next_deadline()
    }

    /// Row click at a displayed index
    pub fn click_row(&mut self, index: usize) -> bool {
        let row = self.display.indices.get(index).and_then(|&i| self.rows.get(i));
        match (self.on_row_click.as_deref_mut(), row) {
            (Some(callback), Some(row)) if !self.disposed => {
                callback(row, index);
                true
            }
            _ => false,
        }
    }

    /// Row double-click at a displayed index
    pub fn double_click_row(&mut self, index: usize) -> bool {
        let row = self.display.indices.get(index).and_then(|&i| self.rows.get(i));
        match (self.on_row_double_click.as_deref_mut(), row) {
            (Some(callback), Some(row)) if !self.disposed => {
                callback(row, index);
                true
            }
            _ => false,
        }
    }

    /// Tear down: cancel the pending filter forward and ignore later requests
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.debouncer.cancel();
        self.disposed = true;
        info!(table_id = %self.id, "Disposed table engine");
    }

    // ---- reads ----

    pub fn authority(&self, concern: Concern) -> AuthorityKind {
        match concern {
            Concern::Sort => self.sort.kind(),
            Concern::Filter => self.filters.kind(),
            Concern::Pagination => self.pagination.kind(),
        }
    }

    /// Effective sort state
    pub fn sort_state(&self) -> &SortState {
        self.sort.current()
    }

    /// Effective filter mapping, as used by the pipeline or supplied externally
    pub fn filter_state(&self) -> &FilterState {
        self.filters.current()
    }

    /// Mapping shown in the filter controls
    pub fn displayed_filters(&self) -> &FilterState {
        if self.filters.has_callback() {
            self.debouncer.echo()
        } else {
            self.filters.current()
        }
    }

    pub fn filter_value(&self, accessor: &str) -> &str {
        self.displayed_filters().raw(accessor)
    }

    /// Effective 1-based page
    pub fn current_page(&self) -> usize {
        self.pages.page
    }

    pub fn total_pages(&self) -> usize {
        self.pages.total_pages()
    }

    pub fn total_rows(&self) -> usize {
        self.pages.total_rows
    }

    pub fn pagination_summary(&self) -> PaginationSummary {
        PaginationSummary::new(
            self.config.pagination,
            self.pages.page,
            self.pages.total_pages(),
            self.pages.total_rows,
        )
    }

    pub fn header_cells(&self) -> Vec<HeaderCell> {
        header_cells(&self.columns, self.sort.current(), self.displayed_filters())
    }

    /// Length of the displayed collection
    pub fn displayed_len(&self) -> usize {
        self.display.len()
    }

    /// The full displayed collection, before windowing
    pub fn displayed_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.display.rows(&self.rows)
    }

    pub fn displayed_row(&self, index: usize) -> Option<&Row> {
        self.display
            .indices
            .get(index)
            .and_then(|&source| self.rows.get(source))
    }

    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Rows to paint now
    pub fn frame(&self) -> RowFrame<'_> {
        let rows = if self.loading {
            Vec::new()
        } else {
            self.window
                .range()
                .filter_map(|index| {
                    self.displayed_row(index)
                        .map(|row| DisplayRow { index, row })
                })
                .collect()
        };
        RowFrame {
            rows,
            window: self.window,
            total_displayed: self.display.len(),
            loading: self.loading,
        }
    }

    /// Pipeline cache (hits, misses)
    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }

    // ---- internals ----

    fn reset_page(&mut self) {
        match self.pagination.resolve().route() {
            Route::Apply(page) => *page = 1,
            Route::Notify(callback) => callback(1),
            Route::Reject => {
                debug!(table_id = %self.id, "Page reset dropped, pagination is read-only");
            }
        }
    }

    /// Rerun the pipeline for the locally owned concerns and rederive the
    /// page and window state.
    fn refresh(&mut self) {
        let page_size = self.config.page_size;
        let paging_locally = self.config.pagination && !self.pagination.is_external();

        let params = PipelineParams {
            filters: (!self.filters.is_external()).then(|| self.filters.current()),
            sort: (!self.sort.is_external()).then(|| self.sort.current()),
            page: paging_locally.then(|| PageWindow::new(*self.pagination.current(), page_size)),
        };
        let key = PipelineKey::new(self.rows_generation, self.columns_generation, &params);
        let fingerprint = key_fingerprint(&key);

        let rows = &self.rows;
        let columns = &self.columns;
        let output = self
            .cache
            .get_or_compute(key, || apply_pipeline(rows, columns, &params));

        let previous_len = self.display.len();
        self.display = output;
        debug!(
            table_id = %self.id,
            key = fingerprint,
            displayed = self.display.len(),
            "Recomputed display rows"
        );

        self.pages = if !self.config.pagination {
            PaginationState::new(1, page_size, self.display.total_rows)
        } else if self.pagination.is_external() {
            let total_rows = self.total_count.unwrap_or(self.display.len());
            let mut state = PaginationState::new(*self.pagination.current(), page_size, total_rows);
            let clamped = state.clamped_page();
            if clamped != state.page {
                warn!(
                    table_id = %self.id,
                    page = state.page,
                    total_pages = state.total_pages(),
                    "External page out of range, clamping for display"
                );
                state.page = clamped;
            }
            state
        } else {
            if let Authority::Local(page) = self.pagination.resolve() {
                *page = self.display.page;
            }
            PaginationState::new(self.display.page, page_size, self.display.total_rows)
        };

        if self.display.len() != previous_len {
            let v = &self.config.virtualization;
            self.scroll_offset = clamp_scroll_offset(
                self.scroll_offset,
                self.display.len(),
                v.row_height,
                v.viewport_height,
            );
        }
        self.recompute_window();
    }

    fn recompute_window(&mut self) {
        let total_rows = self.display.len();
        let v = &self.config.virtualization;
        self.window = if v.enabled {
            compute_window(&WindowParams {
                scroll_offset: self.scroll_offset,
                row_height: v.row_height,
                viewport_height: v.viewport_height,
                overscan: v.overscan,
                total_rows,
            })
        } else {
            VisibleWindow::full(total_rows)
        };
        trace!(
            table_id = %self.id,
            start = self.window.start,
            end = self.window.end,
            "Window recomputed"
        );
    }
}

impl Drop for TableEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dg_core::{FilterKind, SortDirection};

    fn engine(config: TableConfig) -> TableEngine {
        TableEngine::from_columns(
            vec![
                Column::new("name", "Name").sortable(),
                Column::new("age", "Age").filter_kind(FilterKind::Number),
            ],
            config,
        )
        .unwrap()
        .with_rows(vec![
            Row::new().with("name", "Bob").with("age", 30),
            Row::new().with("name", "Ann").with("age", 25),
            Row::new().with("name", "Cid").with("age", 25),
        ])
    }

    fn names(engine: &TableEngine) -> Vec<String> {
        engine
            .displayed_rows()
            .map(|r| r.get("name").to_string())
            .collect()
    }

    #[test]
    fn test_invalid_config_is_error() {
        let config = TableConfig::default().paginated(0);
        assert!(matches!(
            TableEngine::new(ColumnSet::default(), config),
            Err(GridError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_toggle_sort_flips_direction() {
        let mut engine = engine(TableConfig::default());
        assert!(engine.toggle_sort("name"));
        assert_eq!(names(&engine), vec!["Ann", "Bob", "Cid"]);
        assert!(engine.toggle_sort("name"));
        assert_eq!(engine.sort_state().direction, SortDirection::Desc);
        assert_eq!(names(&engine), vec!["Cid", "Bob", "Ann"]);
    }

    #[test]
    fn test_unchanged_state_hits_cache() {
        let mut engine = engine(TableConfig::default());
        let (_, misses) = engine.cache_stats();
        engine.set_loading(true);
        engine.set_total_count(None);
        let (hits, after) = engine.cache_stats();
        assert_eq!(after, misses);
        assert!(hits >= 1);
    }

    #[test]
    fn test_disabled_pagination_rejects_pages() {
        let mut engine = engine(TableConfig::default());
        assert!(!engine.set_page(1));
        assert_eq!(engine.total_pages(), 1);
        assert!(!engine.pagination_summary().visible);
    }

    #[test]
    fn test_loading_frame_has_no_rows() {
        let mut engine = engine(TableConfig::default());
        engine.set_loading(true);
        let frame = engine.frame();
        assert!(frame.loading);
        assert!(frame.is_empty());
        assert_eq!(frame.total_displayed, 3);
    }

    #[test]
    fn test_load_config_ignores_invalid_values() {
        let mut engine = engine(TableConfig::default());
        engine.load_config(serde_json::json!({ "pagination": true, "page_size": 2 }));
        assert_eq!(engine.total_pages(), 2);
        engine.load_config(serde_json::json!({ "row_height": -1.0 }));
        assert_eq!(engine.config().virtualization.row_height, 48.0);
        assert_eq!(engine.save_config()["page_size"], 2);
    }
}
