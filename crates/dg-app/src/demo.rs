//! Synthetic staff roster for the demo

use chrono::{Duration, NaiveDate};
use dg_core::{Column, FilterKind, Row, SelectOption};

const FIRST_NAMES: [&str; 12] = [
    "Ada", "Bea", "Cal", "Dev", "Eli", "Fay", "Gus", "Hal", "Ivy", "Jon", "Kit", "Lou",
];
const DEPARTMENTS: [&str; 4] = ["Engineering", "Finance", "Operations", "Sales"];

pub fn demo_columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID").sortable().filter_kind(FilterKind::Number),
        Column::new("name", "Name").sortable(),
        Column::new("department", "Department").sortable().options(
            DEPARTMENTS
                .iter()
                .map(|d| SelectOption::new(*d, *d))
                .collect(),
        ),
        Column::new("salary", "Salary").sortable().filter_kind(FilterKind::Number),
        Column::new("joined", "Joined").sortable().filter_kind(FilterKind::Date),
        Column::new("notes", "Notes").filterable(false),
    ]
}

/// Deterministic rows; every seventh salary is missing
pub fn demo_rows(count: usize) -> Vec<Row> {
    let epoch = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN);
    (0..count)
        .map(|i| {
            let t = i as f64;
            let salary = (52_000.0 + 18_000.0 * (t * 0.37).sin()).round() as i64;
            let joined = epoch + Duration::days((i * 41 % 1500) as i64);
            Row::new()
                .with("id", i as i64 + 1)
                .with("name", format!("{} {}", FIRST_NAMES[i % FIRST_NAMES.len()], i / FIRST_NAMES.len()))
                .with("department", DEPARTMENTS[(i * 7 / 3) % DEPARTMENTS.len()])
                .with("salary", (i % 7 != 3).then_some(salary))
                .with("joined", joined.format("%Y-%m-%d").to_string())
                .with("notes", "")
        })
        .collect()
}
