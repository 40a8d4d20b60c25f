// Lane packing never overlaps and uses exactly the maximum overlap depth

use proptest::prelude::*;
use resource_timeline::services::lanes::{pack_lanes, SlotSpan};

fn spans_strategy() -> impl Strategy<Value = Vec<SlotSpan>> {
    prop::collection::vec((0usize..60, 1usize..12), 0..40)
        .prop_map(|pairs| pairs.into_iter().map(|(s, len)| SlotSpan::new(s, s + len)).collect())
}

/// Brute force: the deepest stack of spans covering any single slot.
fn max_depth(spans: &[SlotSpan]) -> usize {
    let end = spans.iter().map(|s| s.end_idx).max().unwrap_or(0);
    (0..end)
        .map(|slot| {
            spans
                .iter()
                .filter(|s| s.start_idx <= slot && slot < s.end_idx)
                .count()
        })
        .max()
        .unwrap_or(0)
}

proptest! {
    /// Property: spans sharing a lane are disjoint
    #[test]
    fn prop_lanes_never_overlap(spans in spans_strategy()) {
        let packing = pack_lanes(&spans);
        prop_assert_eq!(packing.lanes.len(), spans.len());
        for i in 0..spans.len() {
            prop_assert!(packing.lanes[i] < packing.lane_count);
            for j in (i + 1)..spans.len() {
                if packing.lanes[i] == packing.lanes[j] {
                    prop_assert!(!spans[i].overlaps(&spans[j]));
                }
            }
        }
    }

    /// Property: lane count equals the true overlap depth
    #[test]
    fn prop_lane_count_is_overlap_depth(spans in spans_strategy()) {
        prop_assert_eq!(pack_lanes(&spans).lane_count, max_depth(&spans));
    }

    /// Property: packing is deterministic regardless of how often it runs
    #[test]
    fn prop_packing_is_deterministic(spans in spans_strategy()) {
        prop_assert_eq!(pack_lanes(&spans), pack_lanes(&spans));
    }
}
