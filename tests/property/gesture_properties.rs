// Moving an event keeps its duration for any grab point and target slot

use std::collections::HashSet;

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use resource_timeline::models::event::RawEvent;
use resource_timeline::models::resource::{Group, Resource};
use resource_timeline::models::settings::TimelineConfig;
use resource_timeline::models::ui::{MoveEventRequest, ScrollState, TimelineCallbacks, ViewKind};
use resource_timeline::services::interaction::{InteractionController, PointerInput};
use resource_timeline::services::timeline::{TimelineInput, TimelineLayout};

#[derive(Default)]
struct Moves(Vec<MoveEventRequest>);

impl TimelineCallbacks for Moves {
    fn on_event_move(&mut self, request: MoveEventRequest) {
        self.0.push(request);
    }
}

proptest! {
    /// Property: a committed move has the same duration as the original event
    #[test]
    fn prop_move_preserves_duration(
        start_slot in 0i64..20,
        offset_minutes in 0i64..60,
        length_minutes in 60i64..240,
        target in 0usize..24,
    ) {
        let day = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let start = day + Duration::hours(start_slot) + Duration::minutes(offset_minutes);
        let end = start + Duration::minutes(length_minutes);
        let events = vec![RawEvent::new("e", "r1", start, end)];
        let resources = vec![Resource::new("r1", "Crane")];
        let groups: Vec<Group> = Vec::new();
        let collapsed = HashSet::new();
        let config = TimelineConfig {
            view: ViewKind::Day,
            fill_container: false,
            ..TimelineConfig::default()
        };
        let layout = TimelineLayout::compute(&config, TimelineInput {
            resources: &resources,
            groups: &groups,
            events: &events,
            collapsed: &collapsed,
            anchor: day,
            now: day,
            viewport_width: 2000.0,
        });
        let scroll = ScrollState {
            viewport_width: 2000.0,
            viewport_height: 400.0,
            ..ScrollState::default()
        };

        let rect = layout.event_rect(0).unwrap();
        let grab_x = rect.left + rect.width / 2.0;
        let grab_slot = layout.columns.x_to_slot_idx(grab_x);
        prop_assume!(grab_slot != target);
        let target_x = layout.columns.left(target) + 32.0;
        let y = rect.top + rect.height / 2.0;

        let mut host = Moves::default();
        let mut controller = InteractionController::new();
        prop_assert!(controller.pointer_down(&layout, &scroll, PointerInput::new(1, grab_x, y), &mut host));
        controller.pointer_move(&layout, &scroll, PointerInput::new(1, target_x, y));
        controller.pointer_up(&layout, &scroll, PointerInput::new(1, target_x, y), &mut host);

        prop_assert_eq!(host.0.len(), 1);
        let committed = &host.0[0];
        prop_assert_eq!(committed.end - committed.start, end - start);
        prop_assert_eq!(
            committed.start - start,
            Duration::hours(target as i64 - grab_slot as i64)
        );
    }
}
