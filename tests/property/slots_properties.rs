// Slot plans are strictly increasing for every view, zone and knob setting

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use resource_timeline::models::settings::{DayRangeMode, TimelineConfig, WorkHours};
use resource_timeline::models::ui::ViewKind;
use resource_timeline::services::slots::SlotPlanner;

const ZONES: [&str; 6] = [
    "UTC",
    "Europe/Berlin",
    "America/New_York",
    "Australia/Sydney",
    "Asia/Kolkata",
    "Not/AZone",
];

fn view_strategy() -> impl Strategy<Value = ViewKind> {
    prop_oneof![
        Just(ViewKind::Month),
        Just(ViewKind::Week),
        Just(ViewKind::Day),
        Just(ViewKind::Sprint),
    ]
}

proptest! {
    /// Property: slot starts strictly increase and the range ends after the last one
    #[test]
    fn prop_slot_starts_strictly_increase(
        view in view_strategy(),
        zone in 0..ZONES.len(),
        minutes_from_base in 0i64..(3 * 366 * 24 * 60),
        week_starts_on in 0u8..7,
        day_slot_minutes in 0u32..400,
        work_mode in any::<bool>(),
        start_hour in 0u32..24,
        end_hour in 0u32..=24,
    ) {
        let config = TimelineConfig {
            view,
            time_zone: ZONES[zone].to_string(),
            week_starts_on,
            day_slot_minutes,
            day_range_mode: if work_mode { DayRangeMode::Work } else { DayRangeMode::Full },
            work_hours: WorkHours { start_hour, end_hour },
            ..TimelineConfig::default()
        }
        .resolve();

        let anchor = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(minutes_from_base);
        let plan = SlotPlanner::new(&config).plan(anchor, anchor);

        prop_assert!(!plan.is_empty());
        prop_assert!(plan.slot_starts.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(plan.slot_starts[0], plan.range.start);
        prop_assert!(plan.range.end > *plan.slot_starts.last().unwrap());
        prop_assert_eq!(plan.slots.len(), plan.len());
    }
}
