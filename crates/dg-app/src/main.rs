//! Data grid demo
//!
//! Drives one table in self-contained mode and one in externally driven mode
//! against an in-memory row source.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dg_core::events::{filter_handler, page_handler, row_handler, sort_handler};
use dg_core::{ColumnSet, FilterState, Row, SortState, TableConfig};
use dg_data::{CsvSource, MemorySource, PageQuery, RowSource};
use dg_views::TableEngine;

mod demo;

/// Headless data grid demo
#[derive(Debug, Parser)]
#[command(name = "datagrid", version)]
struct Args {
    /// CSV file to load; a generated roster is used when omitted
    csv: Option<PathBuf>,

    /// Table configuration as JSON
    config: Option<PathBuf>,
}

/// Change requests the table forwards to its external owner
#[derive(Debug)]
enum OwnerEvent {
    Sort(SortState),
    Filters(FilterState),
    Page(usize),
}

fn print_frame(title: &str, engine: &TableEngine) {
    println!("== {} ==", title);
    let header: Vec<String> = engine
        .header_cells()
        .iter()
        .map(|cell| match cell.filter.as_ref().filter(|f| !f.value.is_empty()) {
            Some(filter) => format!("{} [{}]", cell.label, filter.value),
            None => cell.label.clone(),
        })
        .collect();
    println!("{}", header.join(" | "));

    let frame = engine.frame();
    if frame.loading {
        println!("Loading...");
    }
    for display in &frame.rows {
        let cells: Vec<String> = engine
            .columns()
            .iter()
            .map(|c| display.row.get(&c.accessor).to_string())
            .collect();
        println!("{:>3}: {}", display.index, cells.join(" | "));
    }

    let summary = engine.pagination_summary();
    if summary.visible {
        println!("{}", summary.label());
    }
    println!();
}

/// Self-contained table: the engine sorts, filters and pages on its own
fn run_local(columns: &ColumnSet, rows: &[Row], config: &TableConfig) -> Result<()> {
    let mut engine = TableEngine::new(columns.clone(), config.clone())?.with_rows(rows.to_vec());
    engine.set_on_row_click(Some(row_handler(|row, index| {
        info!(index, row = ?row, "Row clicked");
    })));

    print_frame("local: initial", &engine);

    if let Some(column) = columns.iter().find(|c| c.sortable) {
        engine.toggle_sort(&column.accessor);
        print_frame(&format!("local: sorted by {}", column.accessor), &engine);
        engine.toggle_sort(&column.accessor);
        print_frame(&format!("local: sorted by {} desc", column.accessor), &engine);
    }

    engine.next_page();
    print_frame("local: next page", &engine);

    if let Some(column) = columns.iter().find(|c| c.filterable) {
        let sample = rows
            .first()
            .map(|r| r.get(&column.accessor).to_string())
            .unwrap_or_default();
        let needle: String = sample.chars().take(2).collect();
        engine.set_filter(&column.accessor, &needle, Instant::now());
        print_frame(&format!("local: {} ~ {:?}", column.accessor, needle), &engine);
    }

    engine.click_row(0);
    engine.dispose();
    Ok(())
}

/// Apply pending owner events, fetch the page they describe and reflect it
/// back into the engine
async fn sync_owner(
    engine: &mut TableEngine,
    events: &mut UnboundedReceiver<OwnerEvent>,
    source: &MemorySource,
    query: &mut PageQuery,
) -> Result<()> {
    let mut changed = false;
    while let Ok(event) = events.try_recv() {
        info!(?event, "Owner received change request");
        match event {
            OwnerEvent::Sort(sort) => query.sort = sort,
            OwnerEvent::Filters(filters) => query.filters = filters,
            OwnerEvent::Page(page) => query.page = page,
        }
        changed = true;
    }
    if !changed {
        return Ok(());
    }

    engine.set_loading(true);
    let result = source.query(query).await?;
    query.page = result.page;

    engine.set_rows(result.rows);
    engine.set_total_count(Some(result.total_count));
    engine.set_external_page(Some(result.page));
    engine.set_external_sort(Some(query.sort.clone()));
    engine.set_external_filters(Some(query.filters.clone()));
    engine.set_loading(false);
    Ok(())
}

/// Run owner sync and debounce timers until nothing is pending
async fn settle(
    engine: &mut TableEngine,
    events: &mut UnboundedReceiver<OwnerEvent>,
    source: &MemorySource,
    query: &mut PageQuery,
) -> Result<()> {
    loop {
        sync_owner(engine, events, source, query).await?;
        match engine.next_deadline() {
            Some(deadline) => {
                tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
                engine.poll_timers(Instant::now());
            }
            None => return Ok(()),
        }
    }
}

/// Externally driven table: every concern is owned by the row source
async fn run_external(source: MemorySource, config: &TableConfig) -> Result<()> {
    let page_size = config.page_size;
    let mut engine = TableEngine::new(source.columns().clone(), config.clone().paginated(page_size))?;
    let (tx, mut events) = mpsc::unbounded_channel();

    let sink = tx.clone();
    engine.set_on_sort_change(Some(sort_handler(move |key, direction| {
        if let Err(err) = sink.send(OwnerEvent::Sort(SortState::new(key, direction))) {
            debug!(event = ?err.0, "Owner channel closed, dropping change request");
        }
    })));
    let sink = tx.clone();
    engine.set_on_filters_change(Some(filter_handler(move |filters| {
        if let Err(err) = sink.send(OwnerEvent::Filters(filters.clone())) {
            debug!(event = ?err.0, "Owner channel closed, dropping change request");
        }
    })));
    let sink = tx;
    engine.set_on_page_change(Some(page_handler(move |page| {
        if let Err(err) = sink.send(OwnerEvent::Page(page)) {
            debug!(event = ?err.0, "Owner channel closed, dropping change request");
        }
    })));

    let mut query = PageQuery {
        page: 1,
        page_size,
        ..Default::default()
    };
    let first = source.query(&query).await?;
    engine.set_rows(first.rows);
    engine.set_total_count(Some(first.total_count));
    engine.set_external_page(Some(first.page));
    engine.set_external_sort(Some(SortState::default()));
    engine.set_external_filters(Some(FilterState::new()));
    info!(source = source.source_name(), total = first.total_count, "External table ready");
    print_frame("external: initial", &engine);

    let columns = source.columns().clone();
    if let Some(column) = columns.iter().find(|c| c.sortable) {
        engine.toggle_sort(&column.accessor);
        settle(&mut engine, &mut events, &source, &mut query).await?;
        print_frame(&format!("external: sorted by {}", column.accessor), &engine);
    }

    engine.next_page();
    settle(&mut engine, &mut events, &source, &mut query).await?;
    print_frame("external: next page", &engine);

    if let Some(column) = columns.iter().find(|c| c.filterable && !c.filter_kind.is_exact()) {
        // Simulated typing; only the last value reaches the owner
        let mut typed = String::new();
        for ch in "a1".chars() {
            typed.push(ch);
            engine.set_filter(&column.accessor, &typed, Instant::now());
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        settle(&mut engine, &mut events, &source, &mut query).await?;
        print_frame(&format!("external: {} ~ {:?}", column.accessor, typed), &engine);
    }

    engine.dispose();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TableConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Ok(TableConfig::from_json_str(&json)?)
        }
        None => Ok(TableConfig::default().paginated(8).virtualized(32.0, 160.0)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let (name, columns, rows) = match args.csv {
        Some(path) => {
            let source = CsvSource::load(path.clone())
                .await
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let name = source.name().to_string();
            let (columns, rows) = source.into_parts();
            (name, columns, rows)
        }
        None => {
            info!("No CSV given, using demo roster");
            (
                "demo roster".to_string(),
                ColumnSet::new(demo::demo_columns())?,
                demo::demo_rows(60),
            )
        }
    };
    info!(source = %name, rows = rows.len(), "Starting data grid demo");

    run_local(&columns, &rows, &config)?;
    run_external(MemorySource::new(name, columns, rows), &config).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_are_optional_positionals() {
        let args = Args::try_parse_from(["datagrid"]).unwrap();
        assert!(args.csv.is_none() && args.config.is_none());

        let args = Args::try_parse_from(["datagrid", "people.csv", "grid.json"]).unwrap();
        assert_eq!(args.csv, Some(PathBuf::from("people.csv")));
        assert_eq!(args.config, Some(PathBuf::from("grid.json")));
    }

    #[test]
    fn test_help_is_not_a_path() {
        let err = Args::try_parse_from(["datagrid", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert!(Args::try_parse_from(["datagrid", "a.csv", "b.json", "extra"]).is_err());
    }

    #[test]
    fn test_default_config_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.page_size, 8);
    }
}
