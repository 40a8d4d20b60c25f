//! Lane packing for overlapping events within a resource row.
//!
//! A sweep over events sorted by `(start_idx, end_idx)` keeps two heaps: the
//! active `(end_idx, lane)` pairs and the free lane numbers. Each event takes
//! the smallest free lane once every active span ending at or before its start
//! has been retired. The lane count equals the maximum overlap depth.

mod heap;

use std::collections::HashMap;

pub use heap::MinHeap;

use crate::models::event::NormalizedEvent;
use crate::services::slots::SlotPlan;

/// Half-open slot-index interval of one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotSpan {
    pub start_idx: usize,
    pub end_idx: usize,
}

impl SlotSpan {
    pub fn new(start_idx: usize, end_idx: usize) -> Self {
        Self { start_idx, end_idx }
    }

    pub fn overlaps(&self, other: &SlotSpan) -> bool {
        self.start_idx < other.end_idx && other.start_idx < self.end_idx
    }
}

/// Lane numbers for a list of spans, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanePacking {
    pub lanes: Vec<usize>,
    pub lane_count: usize,
}

/// Assign lanes so that spans sharing a lane never overlap.
pub fn pack_lanes(spans: &[SlotSpan]) -> LanePacking {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    // Input position breaks full ties so output is deterministic.
    order.sort_by_key(|&i| (spans[i].start_idx, spans[i].end_idx, i));

    let mut lanes = vec![0; spans.len()];
    let mut active: MinHeap<(usize, usize)> = MinHeap::with_capacity(spans.len());
    let mut free: MinHeap<usize> = MinHeap::new();
    let mut next_lane = 0;

    for i in order {
        let span = spans[i];
        while let Some((_, lane)) = active.pop_if(|(end, _)| *end <= span.start_idx) {
            free.push(lane);
        }
        let lane = free.pop().unwrap_or_else(|| {
            next_lane += 1;
            next_lane - 1
        });
        lanes[i] = lane;
        active.push((span.end_idx, lane));
    }

    LanePacking {
        lanes,
        lane_count: next_lane,
    }
}

/// One event's placement inside its resource row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEntry {
    /// Index into the normalized event list.
    pub event_index: usize,
    pub span: SlotSpan,
    pub lane: usize,
}

/// Lane assignment for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceLanes {
    pub entries: Vec<LaneEntry>,
    pub lane_count: usize,
    /// Events in lanes at or beyond the per-row cap; not drawn, reported
    /// through the overflow indicator instead.
    pub hidden: Vec<usize>,
}

impl ResourceLanes {
    pub fn visible_lanes(&self, max_lanes: usize) -> usize {
        self.lane_count.min(max_lanes)
    }

    pub fn entry_for(&self, event_index: usize) -> Option<&LaneEntry> {
        self.entries.iter().find(|e| e.event_index == event_index)
    }
}

/// Slot span of every normalized event, in input order.
pub fn event_spans(plan: &SlotPlan, events: &[NormalizedEvent]) -> Vec<SlotSpan> {
    events
        .iter()
        .map(|event| {
            let (start_idx, end_idx) = plan.slot_span(event.view_start, event.view_end);
            SlotSpan::new(start_idx, end_idx)
        })
        .collect()
}

/// Group events by resource and pack each group.
pub fn assign_lanes(
    spans: &[SlotSpan],
    events: &[NormalizedEvent],
    max_lanes: usize,
) -> HashMap<String, ResourceLanes> {
    let mut by_resource: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, event) in events.iter().enumerate() {
        by_resource.entry(event.resource_id()).or_default().push(index);
    }

    by_resource
        .into_iter()
        .map(|(resource_id, indices)| {
            let resource_spans: Vec<SlotSpan> = indices.iter().map(|&i| spans[i]).collect();
            let packing = pack_lanes(&resource_spans);
            let entries: Vec<LaneEntry> = indices
                .iter()
                .zip(packing.lanes.iter())
                .map(|(&event_index, &lane)| LaneEntry {
                    event_index,
                    span: spans[event_index],
                    lane,
                })
                .collect();
            let hidden = entries
                .iter()
                .filter(|e| e.lane >= max_lanes)
                .map(|e| e.event_index)
                .collect();
            (
                resource_id.to_string(),
                ResourceLanes {
                    entries,
                    lane_count: packing.lane_count,
                    hidden,
                },
            )
        })
        .collect()
}

/// Per-slot coverage flags via a difference array over event spans.
pub fn slot_coverage(slot_count: usize, spans: &[SlotSpan]) -> Vec<bool> {
    let mut diff = vec![0i64; slot_count + 1];
    for span in spans {
        let start = span.start_idx.min(slot_count);
        let end = span.end_idx.min(slot_count);
        if start < end {
            diff[start] += 1;
            diff[end] -= 1;
        }
    }
    let mut running = 0;
    diff.iter()
        .take(slot_count)
        .map(|delta| {
            running += delta;
            running > 0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::RawEvent;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn spans(pairs: &[(usize, usize)]) -> Vec<SlotSpan> {
        pairs.iter().map(|&(s, e)| SlotSpan::new(s, e)).collect()
    }

    #[test]
    fn test_disjoint_spans_share_lane_zero() {
        let packing = pack_lanes(&spans(&[(0, 2), (2, 4), (4, 5)]));
        assert_eq!(packing.lanes, vec![0, 0, 0]);
        assert_eq!(packing.lane_count, 1);
    }

    #[test]
    fn test_overlaps_stack() {
        let packing = pack_lanes(&spans(&[(0, 5), (1, 3), (2, 4), (3, 6)]));
        // (0,5)->0, (1,3)->1, (2,4)->2, (3,6) reuses lane 1 freed at 3
        assert_eq!(packing.lanes, vec![0, 1, 2, 1]);
        assert_eq!(packing.lane_count, 3);
    }

    #[test]
    fn test_smallest_free_lane_is_reused() {
        let packing = pack_lanes(&spans(&[(0, 2), (0, 3), (0, 4), (3, 5), (2, 6)]));
        // At 2 lane 0 frees; at 3 lane 1 frees: (2,6)->0, (3,5)->1
        assert_eq!(packing.lanes, vec![0, 1, 2, 1, 0]);
        assert_eq!(packing.lane_count, 3);
    }

    #[test]
    fn test_equal_starts_order_by_end() {
        let packing = pack_lanes(&spans(&[(1, 6), (1, 2)]));
        // Shorter span is placed first.
        assert_eq!(packing.lanes, vec![1, 0]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(pack_lanes(&[]), LanePacking::default());
    }

    #[test]
    fn test_slot_coverage_difference_array() {
        let coverage = slot_coverage(8, &spans(&[(1, 3), (2, 4), (6, 7)]));
        assert_eq!(
            coverage,
            vec![false, true, true, true, false, false, true, false]
        );
    }

    #[test]
    fn test_assign_lanes_per_resource_with_hidden() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let make = |id: &str, resource: &str| NormalizedEvent {
            event: RawEvent::new(id, resource, base, base),
            start: base,
            end: base,
            view_start: base,
            view_end: base,
        };
        let events = vec![
            make("a", "r1"),
            make("b", "r1"),
            make("c", "r1"),
            make("d", "r2"),
        ];
        let spans = spans(&[(0, 3), (1, 4), (2, 5), (0, 3)]);
        let lanes = assign_lanes(&spans, &events, 2);

        let r1 = &lanes["r1"];
        assert_eq!(r1.lane_count, 3);
        assert_eq!(r1.visible_lanes(2), 2);
        assert_eq!(r1.hidden, vec![2]);
        assert_eq!(r1.entry_for(1).map(|e| e.lane), Some(1));

        let r2 = &lanes["r2"];
        assert_eq!(r2.lane_count, 1);
        assert!(r2.hidden.is_empty());
    }
}
