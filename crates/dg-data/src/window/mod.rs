//! Row virtualization window calculation
//!
//! Given a scroll offset over a list of fixed-height rows, decide which
//! contiguous index range must be materialized. The calculation is pure: it
//! reads the offset and never adjusts it.

use std::ops::Range;

use tracing::warn;

/// Inputs of one window calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    pub scroll_offset: f64,
    pub row_height: f64,
    pub viewport_height: f64,
    pub overscan: usize,
    pub total_rows: usize,
}

/// Half-open range of rows to render plus the spacer heights around it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibleWindow {
    pub start: usize,
    pub end: usize,
    /// Height of the rows above `start`
    pub top_pad: f64,
    /// Height of the rows at and after `end`
    pub bottom_pad: f64,
}

impl VisibleWindow {
    /// Window covering all `total` rows without spacers
    pub fn full(total: usize) -> Self {
        Self {
            start: 0,
            end: total,
            top_pad: 0.0,
            bottom_pad: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Compute the visible window.
///
/// `start = max(0, floor(offset / row_height) - overscan)` and
/// `end = min(total, start + ceil(viewport / row_height) + 2 * overscan)`,
/// with `start` additionally capped at `total` so offsets past the content
/// still give `0 <= start <= end <= total`.
pub fn compute_window(params: &WindowParams) -> VisibleWindow {
    let total = params.total_rows;
    let row_height = params.row_height;
    if !(row_height.is_finite() && row_height > 0.0) {
        warn!(row_height, "Degenerate row height, rendering no rows");
        return VisibleWindow {
            start: 0,
            end: 0,
            top_pad: 0.0,
            bottom_pad: 0.0,
        };
    }

    let offset = non_negative(params.scroll_offset);
    let viewport = non_negative(params.viewport_height);

    // Float to int casts saturate
    let visible_count = (viewport / row_height).ceil() as usize;
    let first_visible = (offset / row_height).floor() as usize;

    let start = first_visible.saturating_sub(params.overscan).min(total);
    let span = visible_count.saturating_add(params.overscan.saturating_mul(2));
    let end = start.saturating_add(span).min(total);

    VisibleWindow {
        start,
        end,
        top_pad: start as f64 * row_height,
        bottom_pad: (total - end) as f64 * row_height,
    }
}

/// Largest offset that still shows content: `max(0, total * row_height - viewport)`
pub fn max_scroll_offset(total_rows: usize, row_height: f64, viewport_height: f64) -> f64 {
    let content = total_rows as f64 * non_negative(row_height);
    non_negative(content - non_negative(viewport_height))
}

/// Clamp `offset` into `[0, max_scroll_offset]`
pub fn clamp_scroll_offset(
    offset: f64,
    total_rows: usize,
    row_height: f64,
    viewport_height: f64,
) -> f64 {
    non_negative(offset).min(max_scroll_offset(total_rows, row_height, viewport_height))
}
