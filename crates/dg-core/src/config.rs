//! Table configuration

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::GridError;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 48.0;
/// Default viewport height in pixels
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 400.0;
/// Default rows rendered beyond each edge of the viewport
pub const DEFAULT_OVERSCAN: usize = 5;
/// Default quiet period before a filter change is forwarded
pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 400;

/// Row virtualization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualizationConfig {
    pub enabled: bool,
    pub row_height: f64,
    pub viewport_height: f64,
    pub overscan: usize,
}

impl Default for VirtualizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// Configuration for a table engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Whether the table is paginated at all
    pub pagination: bool,
    pub page_size: usize,
    pub virtualization: VirtualizationConfig,
    pub filter_debounce_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            pagination: false,
            page_size: DEFAULT_PAGE_SIZE,
            virtualization: VirtualizationConfig::default(),
            filter_debounce_ms: DEFAULT_FILTER_DEBOUNCE_MS,
        }
    }
}

impl TableConfig {
    pub fn paginated(mut self, page_size: usize) -> Self {
        self.pagination = true;
        self.page_size = page_size;
        self
    }

    pub fn virtualized(mut self, row_height: f64, viewport_height: f64) -> Self {
        self.virtualization.enabled = true;
        self.virtualization.row_height = row_height;
        self.virtualization.viewport_height = viewport_height;
        self
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.virtualization.overscan = overscan;
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size == 0 {
            return Err(GridError::InvalidConfig("page_size must be > 0".to_string()));
        }
        let v = &self.virtualization;
        if !(v.row_height.is_finite() && v.row_height > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "row_height must be > 0, got {}",
                v.row_height
            )));
        }
        if !(v.viewport_height.is_finite() && v.viewport_height > 0.0) {
            return Err(GridError::InvalidConfig(format!(
                "viewport_height must be > 0, got {}",
                v.viewport_height
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing keys take defaults
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Flat key/value form for embedding in a larger settings document
    pub fn save_config(&self) -> Value {
        json!({
            "pagination": self.pagination,
            "page_size": self.page_size,
            "virtualized": self.virtualization.enabled,
            "row_height": self.virtualization.row_height,
            "viewport_height": self.virtualization.viewport_height,
            "overscan": self.virtualization.overscan,
            "filter_debounce_ms": self.filter_debounce_ms,
        })
    }

    /// Apply the recognized, well-typed keys of a flat settings value.
    /// Out-of-range values are ignored.
    pub fn load_config(&mut self, config: Value) {
        if let Some(pagination) = config.get("pagination").and_then(|v| v.as_bool()) {
            self.pagination = pagination;
        }
        if let Some(page_size) = config.get("page_size").and_then(|v| v.as_u64()) {
            if page_size > 0 {
                self.page_size = page_size as usize;
            }
        }
        if let Some(enabled) = config.get("virtualized").and_then(|v| v.as_bool()) {
            self.virtualization.enabled = enabled;
        }
        if let Some(row_height) = config.get("row_height").and_then(|v| v.as_f64()) {
            if row_height > 0.0 {
                self.virtualization.row_height = row_height;
            }
        }
        if let Some(viewport_height) = config.get("viewport_height").and_then(|v| v.as_f64()) {
            if viewport_height > 0.0 {
                self.virtualization.viewport_height = viewport_height;
            }
        }
        if let Some(overscan) = config.get("overscan").and_then(|v| v.as_u64()) {
            self.virtualization.overscan = overscan as usize;
        }
        if let Some(ms) = config.get("filter_debounce_ms").and_then(|v| v.as_u64()) {
            self.filter_debounce_ms = ms;
        }
    }
}
