//! Null cell detection for loaded data

use serde::{Deserialize, Serialize};

/// Raw cell texts that load as null cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    pub patterns: Vec<String>,
    /// Trim whitespace before matching
    pub trim_whitespace: bool,
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "N/A", "null", "None"]
                .into_iter()
                .map(String::from)
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Only the empty cell is null
    pub fn empty_only() -> Self {
        Self {
            patterns: vec![String::new()],
            ..Self::default()
        }
    }

    pub fn is_null(&self, value: &str) -> bool {
        let value = if self.trim_whitespace { value.trim() } else { value };
        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                value == pattern
            } else {
                value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }
}
