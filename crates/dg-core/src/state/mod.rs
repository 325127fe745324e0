//! Per-concern table state: sort, filter and pagination

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Single-column sort state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: Some(key.into()),
            direction,
        }
    }

    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }

    /// State after a header click on `accessor`: the current key flips
    /// direction, any other key starts ascending.
    pub fn toggled(&self, accessor: &str) -> SortState {
        let direction = if self.key.as_deref() == Some(accessor) {
            self.direction.toggled()
        } else {
            SortDirection::Asc
        };
        SortState::new(accessor, direction)
    }
}

/// Filter values keyed by accessor, in insertion order
pub type FilterMap = IndexMap<String, String>;

/// Raw filter inputs. An empty value and a missing key both mean "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    values: FilterMap,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active filter value for `accessor`
    pub fn get(&self, accessor: &str) -> Option<&str> {
        self.values
            .get(accessor)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Raw value for `accessor`, empty when unset
    pub fn raw(&self, accessor: &str) -> &str {
        self.values.get(accessor).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, accessor: impl Into<String>, value: impl Into<String>) {
        self.values.insert(accessor.into(), value.into());
    }

    pub fn with(mut self, accessor: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(accessor, value);
        self
    }

    /// Overwrite the entries present in `other`, keeping the rest
    pub fn overwrite_from(&mut self, other: &FilterState) {
        for (accessor, value) in &other.values {
            self.values.insert(accessor.clone(), value.clone());
        }
    }

    /// Entries with a non-empty value
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }

    /// Full mapping including empty values
    pub fn as_map(&self) -> &FilterMap {
        &self.values
    }
}

impl From<FilterMap> for FilterState {
    fn from(values: FilterMap) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Hashes only active entries, ordered by accessor, so equal maps hash alike
// regardless of insertion order.
impl Hash for FilterState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut active: Vec<_> = self.active().collect();
        active.sort_unstable();
        active.hash(state);
    }
}

/// Pagination state. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationState {
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

impl PaginationState {
    pub fn new(page: usize, page_size: usize, total_rows: usize) -> Self {
        Self {
            page,
            page_size,
            total_rows,
        }
    }

    /// `max(1, ceil(total_rows / page_size))`
    pub fn total_pages(&self) -> usize {
        total_pages(self.total_rows, self.page_size)
    }

    /// Whether a request for `page` may be accepted
    pub fn accepts(&self, page: usize) -> bool {
        page >= 1 && page <= self.total_pages()
    }

    /// Current page forced into `[1, total_pages]`
    pub fn clamped_page(&self) -> usize {
        self.page.clamp(1, self.total_pages())
    }

    /// Index of the first row of the (clamped) current page
    pub fn offset(&self) -> usize {
        (self.clamped_page() - 1).saturating_mul(self.page_size.max(1))
    }
}

/// Page count for `total_rows` rows at `page_size` rows per page, never below 1
pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_rows.div_ceil(page_size).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_sort_toggle() {
        let none = SortState::default();
        let asc = none.toggled("name");
        assert_eq!(asc, SortState::new("name", SortDirection::Asc));

        let desc = asc.toggled("name");
        assert_eq!(desc.direction, SortDirection::Desc);

        let other = desc.toggled("age");
        assert_eq!(other, SortState::new("age", SortDirection::Asc));
    }

    #[test]
    fn test_filter_empty_is_inactive() {
        let filters = FilterState::new().with("name", "").with("age", "25");
        assert_eq!(filters.get("name"), None);
        assert_eq!(filters.get("age"), Some("25"));
        assert_eq!(filters.active().count(), 1);
    }

    #[test]
    fn test_filter_hash_ignores_order_and_empty_entries() {
        let a = FilterState::new().with("a", "1").with("b", "2");
        let b = FilterState::new().with("b", "2").with("a", "1").with("c", "");
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_overwrite_keeps_other_entries() {
        let mut echo = FilterState::new().with("name", "an").with("age", "25");
        echo.overwrite_from(&FilterState::new().with("name", "ann"));
        assert_eq!(echo.get("name"), Some("ann"));
        assert_eq!(echo.get("age"), Some("25"));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 2), 2);
    }

    #[test]
    fn test_page_bounds() {
        let state = PaginationState::new(7, 10, 25);
        assert!(!state.accepts(0));
        assert!(state.accepts(3));
        assert!(!state.accepts(4));
        assert_eq!(state.clamped_page(), 3);
        assert_eq!(state.offset(), 20);
    }
}
