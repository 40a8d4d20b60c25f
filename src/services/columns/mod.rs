//! Column width allocation and the pixel → slot inverse.
//!
//! Widths come from one of the allocation policies (fixed, shrink,
//! redistribute, day-view anchor compression), optionally topped up to fill
//! the container. `slot_lefts` holds the prefix sums with `len() + 1` entries,
//! the last one being the grid width.

use std::collections::BTreeSet;

use crate::models::settings::{FillTarget, LayoutMode, TimelineConfig};
use crate::services::lanes::{slot_coverage, SlotSpan};

/// Inputs for one column layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRequest {
    pub slot_count: usize,
    pub fixed_slot_width: f32,
    pub empty_slot_width: f32,
    pub compressed_slot_width: f32,
    pub redistribute_max_multiple: f32,
    pub mode: LayoutMode,
    pub anchor_compression: bool,
    pub anchor_midpoint_min_slots: usize,
    /// `Some(target)` to fill up to `viewport_width`.
    pub fill: Option<FillTarget>,
    pub viewport_width: f32,
}

impl ColumnRequest {
    /// Build a request from resolved configuration for a plan of `slot_count`
    /// slots shown in a viewport `viewport_width` pixels wide.
    pub fn from_config(config: &TimelineConfig, slot_count: usize, viewport_width: f32) -> Self {
        let mut fixed = config.slot_widths.for_view(config.view);
        if config.view == crate::models::ui::ViewKind::Week && slot_count > 0 {
            fixed = fixed.max((viewport_width / slot_count as f32).floor());
        }
        Self {
            slot_count,
            fixed_slot_width: fixed,
            empty_slot_width: config.empty_slot_width.min(fixed),
            compressed_slot_width: config.compressed_slot_width.min(fixed),
            redistribute_max_multiple: config.redistribute_max_multiple,
            mode: config.effective_layout_mode(),
            anchor_compression: config.uses_anchor_compression(),
            anchor_midpoint_min_slots: config.anchor_midpoint_min_slots,
            fill: config.fill_container.then_some(config.fill_target),
            viewport_width,
        }
    }
}

/// Computed column geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub slot_widths: Vec<f32>,
    pub slot_lefts: Vec<f32>,
    pub grid_width: f32,
    /// Per-slot event coverage used by the adaptive policies.
    pub covered: Vec<bool>,
    /// Day-view label anchors (empty unless compression is active).
    pub anchors: BTreeSet<usize>,
    uniform_width: Option<f32>,
}

impl ColumnLayout {
    /// Lay out columns for `request` given every event's slot span.
    pub fn compute(request: &ColumnRequest, spans: &[SlotSpan]) -> Self {
        let n = request.slot_count;
        let fixed = request.fixed_slot_width.max(0.0);
        let covered = slot_coverage(n, spans);
        let mut anchors = BTreeSet::new();

        let mut widths = if request.anchor_compression {
            anchors = label_anchors(n, spans, request.anchor_midpoint_min_slots);
            (0..n)
                .map(|i| {
                    if anchors.contains(&i) {
                        fixed
                    } else {
                        request.compressed_slot_width
                    }
                })
                .collect()
        } else {
            match request.mode {
                LayoutMode::Fixed => vec![fixed; n],
                LayoutMode::Shrink | LayoutMode::Redistribute => {
                    adaptive_widths(request, &covered, fixed)
                }
            }
        };

        if let Some(target) = request.fill {
            fill_to_container(&mut widths, &covered, target, request.viewport_width);
        }

        Self::from_widths(widths, covered, anchors)
    }

    /// Layout with every slot at `width`.
    pub fn uniform(slot_count: usize, width: f32) -> Self {
        Self::from_widths(vec![width.max(0.0); slot_count], vec![false; slot_count], BTreeSet::new())
    }

    fn from_widths(slot_widths: Vec<f32>, covered: Vec<bool>, anchors: BTreeSet<usize>) -> Self {
        let uniform_width = match slot_widths.first() {
            Some(&first) if first > 0.0 && slot_widths.iter().all(|w| *w == first) => Some(first),
            _ => None,
        };

        let slot_lefts: Vec<f32> = match uniform_width {
            Some(width) => (0..=slot_widths.len()).map(|i| i as f32 * width).collect(),
            None => {
                let mut lefts = Vec::with_capacity(slot_widths.len() + 1);
                let mut acc = 0.0;
                lefts.push(acc);
                for width in &slot_widths {
                    acc += width;
                    lefts.push(acc);
                }
                lefts
            }
        };
        let grid_width = slot_lefts.last().copied().unwrap_or(0.0);

        Self {
            slot_widths,
            slot_lefts,
            grid_width,
            covered,
            anchors,
            uniform_width,
        }
    }

    pub fn len(&self) -> usize {
        self.slot_widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_widths.is_empty()
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform_width.is_some()
    }

    /// Left edge of boundary `i` (`0..=len()`).
    pub fn left(&self, i: usize) -> f32 {
        self.slot_lefts
            .get(i)
            .copied()
            .unwrap_or(self.grid_width)
    }

    /// Pixel extent `(left, width)` of slots `[start_idx, end_idx)`.
    pub fn span_extent(&self, start_idx: usize, end_idx: usize) -> (f32, f32) {
        let left = self.left(start_idx);
        (left, (self.left(end_idx) - left).max(0.0))
    }

    /// Slot index under content x-coordinate `x`, clamped into the grid.
    ///
    /// Uniform layouts divide directly; others binary-search `slot_lefts`.
    pub fn x_to_slot_idx(&self, x: f32) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        if !x.is_finite() || x <= 0.0 {
            return 0;
        }
        if x >= self.grid_width {
            return n - 1;
        }

        match self.uniform_width {
            Some(width) => {
                let mut idx = ((x / width).floor() as usize).min(n - 1);
                // Division can land one off at exact boundaries.
                if self.slot_lefts[idx] > x {
                    idx = idx.saturating_sub(1);
                } else if idx + 1 < n && self.slot_lefts[idx + 1] <= x {
                    idx += 1;
                }
                idx
            }
            None => {
                let after = self.slot_lefts[..n].partition_point(|left| *left <= x);
                let mut idx = after.saturating_sub(1).min(n - 1);
                // Zero-width slots share a left edge; pick the last one that has room.
                while idx > 0 && self.slot_widths[idx] <= 0.0 {
                    idx -= 1;
                }
                idx
            }
        }
    }
}

fn adaptive_widths(request: &ColumnRequest, covered: &[bool], fixed: f32) -> Vec<f32> {
    let n = covered.len();
    let covered_count = covered.iter().filter(|c| **c).count();
    if covered_count == 0 || covered_count == n {
        return vec![fixed; n];
    }

    let empty = request.empty_slot_width.clamp(0.0, fixed);
    let covered_widths = match request.mode {
        LayoutMode::Redistribute => {
            redistributed_widths(n, covered_count, fixed, empty, request.redistribute_max_multiple)
        }
        _ => vec![fixed; covered_count],
    };

    let mut next_covered = covered_widths.into_iter();
    covered
        .iter()
        .map(|is_covered| {
            if *is_covered {
                next_covered.next().unwrap_or(fixed)
            } else {
                empty
            }
        })
        .collect()
}

/// Widths for covered slots such that the grid keeps the width it would have
/// with every slot at `fixed`.
///
/// Widths are whole pixels: the remainder of the division goes one pixel at a
/// time to the leftmost covered slots, so the total is exact unless the
/// `fixed..=fixed * max_multiple` clamp kicks in.
fn redistributed_widths(
    n: usize,
    covered_count: usize,
    fixed: f32,
    empty: f32,
    max_multiple: f32,
) -> Vec<f32> {
    let target = (n as f32 * fixed).round();
    let remaining = target - (n - covered_count) as f32 * empty;
    let cap = (fixed * max_multiple).max(fixed);

    let base = (remaining / covered_count as f32).floor();
    if base < fixed {
        return vec![fixed; covered_count];
    }
    if base >= cap {
        return vec![cap; covered_count];
    }

    let extra = (remaining - base * covered_count as f32).max(0.0) as usize;
    (0..covered_count)
        .map(|i| {
            let width = if i < extra { base + 1.0 } else { base };
            width.min(cap)
        })
        .collect()
}

/// Slots whose header must stay legible under compression: the first and last
/// slot of every event, plus the midpoint of long spans.
pub fn label_anchors(n: usize, spans: &[SlotSpan], midpoint_min_slots: usize) -> BTreeSet<usize> {
    let mut anchors = BTreeSet::new();
    for span in spans {
        if span.start_idx >= n || span.end_idx <= span.start_idx {
            continue;
        }
        let last = span.end_idx.min(n) - 1;
        anchors.insert(span.start_idx);
        anchors.insert(last);
        if span.end_idx - span.start_idx >= midpoint_min_slots {
            anchors.insert((span.start_idx + last) / 2);
        }
    }
    anchors
}

fn fill_to_container(widths: &mut [f32], covered: &[bool], target: FillTarget, viewport_width: f32) {
    let total: f32 = widths.iter().sum();
    if widths.is_empty() || !viewport_width.is_finite() || total >= viewport_width {
        return;
    }
    let shortfall = viewport_width - total;

    let mut eligible: Vec<usize> = match target {
        FillTarget::All => (0..widths.len()).filter(|&i| widths[i] > 0.0).collect(),
        FillTarget::Events => (0..widths.len()).filter(|&i| covered[i]).collect(),
    };
    if eligible.is_empty() {
        eligible = (0..widths.len()).collect();
    }

    let increment = shortfall / eligible.len() as f32;
    for i in eligible {
        widths[i] += increment;
    }
}
