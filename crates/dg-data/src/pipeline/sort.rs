//! Stable single-column sorting

use std::cmp::Ordering;

use dg_core::{CellValue, Row, SortDirection, SortState};

/// Compare two cells for sorting.
///
/// Nulls and NaN sort last in both directions. Two numbers compare
/// numerically, everything else by [`locale_cmp`] on the display text.
/// `Desc` reverses the value comparison only, so ties stay ties.
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (sorts_last(a), sorts_last(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(a, b);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        }
    }
}

fn sorts_last(cell: &CellValue) -> bool {
    match cell {
        CellValue::Null => true,
        CellValue::Float(v) => v.is_nan(),
        _ => false,
    }
}

fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    if let (CellValue::Int(x), CellValue::Int(y)) = (a, b) {
        return x.cmp(y);
    }
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.total_cmp(&y);
    }
    locale_cmp(&a.to_string(), &b.to_string())
}

/// Case-folded string ordering; among case variants lowercase comes first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Sort row indices in place by the active sort key. No-op without a key.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], sort: &SortState) {
    let Some(key) = sort.key.as_deref() else {
        return;
    };
    // slice::sort_by is stable
    indices.sort_by(|&a, &b| compare_cells(rows[a].get(key), rows[b].get(key), sort.direction));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(rows: &[Row], indices: &[usize]) -> Vec<i64> {
        indices
            .iter()
            .map(|&i| match rows[i].get("id") {
                CellValue::Int(v) => *v,
                _ => -1,
            })
            .collect()
    }

    #[test]
    fn test_ties_preserve_input_order() {
        let rows = vec![
            Row::new().with("id", 1).with("k", 5),
            Row::new().with("id", 2).with("k", 5),
            Row::new().with("id", 3).with("k", 1),
        ];
        let mut indices = vec![0, 1, 2];
        sort_indices(&rows, &mut indices, &SortState::new("k", SortDirection::Asc));
        assert_eq!(ids(&rows, &indices), vec![3, 1, 2]);

        let mut indices = vec![0, 1, 2];
        sort_indices(&rows, &mut indices, &SortState::new("k", SortDirection::Desc));
        assert_eq!(ids(&rows, &indices), vec![1, 2, 3]);
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let rows = vec![
            Row::new().with("id", 1),
            Row::new().with("id", 2).with("k", 2),
            Row::new().with("id", 3).with("k", 9),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut indices = vec![0, 1, 2];
            sort_indices(&rows, &mut indices, &SortState::new("k", direction));
            assert_eq!(ids(&rows, &indices).last(), Some(&1));
        }
    }

    #[test]
    fn test_nan_sorts_last_and_keeps_order_total() {
        let values = [3.0, f64::NAN, -1.5, 7.25, f64::NAN, 0.0, 2.0, f64::NAN, -8.0, 5.5];
        let mut rows: Vec<Row> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Row::new().with("id", i as i64).with("k", *v))
            .collect();
        rows.push(Row::new().with("id", 99).with("k", 4));
        rows.push(Row::new().with("id", 100));

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut indices: Vec<usize> = (0..rows.len()).collect();
            sort_indices(&rows, &mut indices, &SortState::new("k", direction));
            for pair in indices.windows(2) {
                let ord = compare_cells(rows[pair[0]].get("k"), rows[pair[1]].get("k"), direction);
                assert_ne!(ord, Ordering::Greater, "{:?} out of order", pair);
            }
            let tail: Vec<i64> = ids(&rows, &indices[indices.len() - 4..]);
            // NaN and null share the trailing block in input order
            assert_eq!(tail, vec![1, 4, 7, 100]);
        }
    }

    #[test]
    fn test_numbers_compare_numerically() {
        let rows = vec![
            Row::new().with("id", 1).with("k", 10),
            Row::new().with("id", 2).with("k", 9.5),
            Row::new().with("id", 3).with("k", 100),
        ];
        let mut indices = vec![0, 1, 2];
        sort_indices(&rows, &mut indices, &SortState::new("k", SortDirection::Asc));
        assert_eq!(ids(&rows, &indices), vec![2, 1, 3]);
    }

    #[test]
    fn test_text_is_case_folded() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("Cid", "bob"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_no_key_keeps_order() {
        let rows = vec![Row::new().with("id", 2), Row::new().with("id", 1)];
        let mut indices = vec![0, 1];
        sort_indices(&rows, &mut indices, &SortState::default());
        assert_eq!(indices, vec![0, 1]);
    }
}
