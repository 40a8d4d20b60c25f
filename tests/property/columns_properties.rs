// Column layouts cover the grid exactly and invert at every slot boundary

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use proptest::prelude::*;
use resource_timeline::models::settings::{FillTarget, LayoutMode};
use resource_timeline::models::ui::{TimeRange, ViewKind};
use resource_timeline::services::columns::{ColumnLayout, ColumnRequest};
use resource_timeline::services::lanes::SlotSpan;
use resource_timeline::services::normalize::clip_interval;
use resource_timeline::utils::date;

fn mode_strategy() -> impl Strategy<Value = LayoutMode> {
    prop_oneof![
        Just(LayoutMode::Fixed),
        Just(LayoutMode::Shrink),
        Just(LayoutMode::Redistribute),
    ]
}

fn fill_strategy() -> impl Strategy<Value = Option<FillTarget>> {
    prop_oneof![Just(None), Just(Some(FillTarget::All)), Just(Some(FillTarget::Events))]
}

proptest! {
    /// Property: slot_lefts ends at the grid width and x_to_slot_idx inverts every left edge
    #[test]
    fn prop_layout_coverage(
        n in 1usize..120,
        fixed in 8.0f32..160.0,
        mode in mode_strategy(),
        anchor_compression in any::<bool>(),
        fill in fill_strategy(),
        viewport in 0.0f32..3000.0,
        raw_spans in prop::collection::vec((0usize..120, 1usize..20), 0..12),
    ) {
        let spans: Vec<SlotSpan> = raw_spans
            .into_iter()
            .filter(|(s, _)| *s < n)
            .map(|(s, len)| SlotSpan::new(s, (s + len).min(n)))
            .collect();
        let request = ColumnRequest {
            slot_count: n,
            fixed_slot_width: fixed,
            empty_slot_width: (fixed / 4.0).max(4.0),
            compressed_slot_width: (fixed / 5.0).max(4.0),
            redistribute_max_multiple: 4.0,
            mode,
            anchor_compression,
            anchor_midpoint_min_slots: 6,
            fill,
            viewport_width: viewport,
        };
        let layout = ColumnLayout::compute(&request, &spans);

        prop_assert_eq!(layout.slot_lefts.len(), n + 1);
        prop_assert_eq!(layout.slot_lefts[n], layout.grid_width);
        for i in 0..n {
            prop_assert_eq!(layout.x_to_slot_idx(layout.slot_lefts[i]), i);
        }
        prop_assert_eq!(layout.x_to_slot_idx(-10.0), 0);
        prop_assert_eq!(layout.x_to_slot_idx(layout.grid_width + 10.0), n - 1);
    }

    /// Property: clipping an already clipped interval changes nothing
    #[test]
    fn prop_clipping_is_idempotent(
        start_minutes in -2000i64..50_000,
        length_minutes in -300i64..20_000,
        day_view in any::<bool>(),
        berlin in any::<bool>(),
    ) {
        let zone = if berlin { chrono_tz::Europe::Berlin } else { Tz::UTC };
        let view = if day_view { ViewKind::Day } else { ViewKind::Month };
        // Ranges always start and end on local midnights.
        let range = TimeRange {
            start: date::midnight(zone, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            end: date::midnight(zone, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
        };
        let start = range.start + Duration::minutes(start_minutes);
        let end = start + Duration::minutes(length_minutes);

        if let Some((s1, e1)) = clip_interval(start, end, range, view, zone) {
            prop_assert!(s1 < e1);
            let again = clip_interval(s1, e1, range, view, zone);
            prop_assert_eq!(again, Some((s1, e1)));
        }
    }
}
