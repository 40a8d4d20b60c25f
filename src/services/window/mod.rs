//! Windowed rendering math shared by rows and columns.
//!
//! Both axes are described by a monotonic offset array with `count + 1`
//! entries (item `i` spans `offsets[i]..offsets[i + 1]`). The visible window is
//! found with two lower-bound searches and widened by an overscan count.

use std::ops::Range;

/// Prefix sums of item sizes: `[0, s0, s0 + s1, ...]`.
pub fn prefix_offsets(sizes: impl IntoIterator<Item = f32>) -> Vec<f32> {
    let mut offsets = vec![0.0];
    let mut acc = 0.0;
    for size in sizes {
        acc += size.max(0.0);
        offsets.push(acc);
    }
    offsets
}

/// Items intersecting `[scroll, scroll + viewport)`, widened by `overscan` and
/// clamped to `0..count`. Returns at least one index whenever `count > 0`.
pub fn visible_range(offsets: &[f32], scroll: f32, viewport: f32, overscan: usize) -> Range<usize> {
    let count = offsets.len().saturating_sub(1);
    if count == 0 {
        return 0..0;
    }
    let scroll = if scroll.is_finite() { scroll.max(0.0) } else { 0.0 };
    let viewport = if viewport.is_finite() { viewport.max(0.0) } else { 0.0 };
    let bottom = scroll + viewport;

    // First item whose end lies past the scroll offset.
    let mut start = offsets[1..].partition_point(|end| *end <= scroll);
    // Items starting before the bottom edge.
    let mut end = offsets[..count].partition_point(|begin| *begin < bottom);

    if start >= count {
        start = count - 1;
    }
    if end <= start {
        end = start + 1;
    }

    start.saturating_sub(overscan)..(end + overscan).min(count)
}

/// Index of the item containing `position`, clamped into `0..count`.
pub fn index_at(offsets: &[f32], position: f32) -> Option<usize> {
    let count = offsets.len().saturating_sub(1);
    if count == 0 || !position.is_finite() {
        return None;
    }
    if position < offsets[0] || position >= offsets[count] {
        return None;
    }
    let after = offsets[..count].partition_point(|begin| *begin <= position);
    Some(after.saturating_sub(1))
}

/// One axis of virtualization: a toggle plus overscan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Virtualizer {
    pub enabled: bool,
    pub overscan: usize,
}

impl Virtualizer {
    pub fn new(enabled: bool, overscan: usize) -> Self {
        Self { enabled, overscan }
    }

    /// Visible window, or everything when virtualization is off.
    pub fn window(&self, offsets: &[f32], scroll: f32, viewport: f32) -> Range<usize> {
        if self.enabled {
            visible_range(offsets, scroll, viewport, self.overscan)
        } else {
            0..offsets.len().saturating_sub(1)
        }
    }
}
