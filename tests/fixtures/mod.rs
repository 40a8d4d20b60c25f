// Test fixtures - reusable test data
// Provides consistent resources, groups and events across test files

#![allow(dead_code)]

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use resource_timeline::models::event::RawEvent;
use resource_timeline::models::resource::{Group, Resource};
use resource_timeline::models::settings::TimelineConfig;
use resource_timeline::models::ui::{ScrollState, ViewKind};
use resource_timeline::services::timeline::{TimelineInput, TimelineLayout};

/// Sample instants for testing
pub mod dates {
    use super::*;

    /// Wednesday May 1, 2024 at `hour`:00 UTC
    pub fn may_1_2024(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    /// Returns Jan 31, 2024 (month-end clamp source)
    pub fn jan_31_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()
    }
}

/// Sample fleet: one ungrouped resource, a group of two, and a disabled one.
pub fn fleet() -> (Vec<Resource>, Vec<Group>) {
    let resources = vec![
        Resource::new("office", "Office"),
        Resource::new("r1", "Crane").in_group("g1"),
        Resource::new("r2", "Truck").in_group("g1"),
        Resource::new("r3", "Tipper").in_group("g1").disabled(true),
    ];
    (resources, vec![Group::new("g1", "Fleet")])
}

/// Bookings on May 1 2024, three of them stacked on r1.
pub fn bookings() -> Vec<RawEvent> {
    vec![
        RawEvent::new("a", "r1", "2024-05-01T09:00", "2024-05-01T12:00"),
        RawEvent::new("b", "r1", "2024-05-01T10:00", "2024-05-01T11:00"),
        RawEvent::new("c", "r1", "2024-05-01T10:30", "2024-05-01T13:00"),
        RawEvent::new("d", "r2", "2024-05-01T14:00", "2024-05-01T15:00"),
        RawEvent::new("e", "office", "2024-04-30T20:00", "2024-05-01T02:00"),
        RawEvent::new("bad", "r2", "not a date", "2024-05-01T15:00"),
    ]
}

pub fn day_config() -> TimelineConfig {
    TimelineConfig {
        view: ViewKind::Day,
        day_slot_minutes: 60,
        fill_container: false,
        ..TimelineConfig::default()
    }
}

/// Lay out `events` over the fleet for May 1 2024.
pub fn layout(config: &TimelineConfig, events: &[RawEvent]) -> TimelineLayout {
    let (resources, groups) = fleet();
    let collapsed = HashSet::new();
    TimelineLayout::compute(
        config,
        TimelineInput {
            resources: &resources,
            groups: &groups,
            events,
            collapsed: &collapsed,
            anchor: dates::may_1_2024(12),
            now: dates::may_1_2024(12),
            viewport_width: 800.0,
        },
    )
}

/// Scroll state for an 800x400 viewport over `layout`.
pub fn scroll(layout: &TimelineLayout, left: f32) -> ScrollState {
    ScrollState {
        left,
        top: 0.0,
        viewport_width: 800.0,
        viewport_height: 400.0,
        max_left: (layout.columns.grid_width - 800.0).max(0.0),
    }
}
