//! Demo application: a timeline over in-memory sample data.
//!
//! Host callbacks mutate a local [`EventStore`]; the toolbar drives
//! navigation and a few configuration knobs that are persisted through
//! [`ConfigService`].

use chrono::{DateTime, Duration, Utc};
use egui::ComboBox;

use super::timeline_view::{TimelineData, TimelineView};
use crate::models::event::{RawEvent, TimeInput};
use crate::models::resource::{Group, Resource};
use crate::models::settings::{CreateMode, LayoutMode, TimelineConfig};
use crate::models::ui::{
    CreateEventRequest, MoreClickRequest, MoveEventRequest, ResizeEventRequest, TimeRange,
    TimelineCallbacks, ViewKind,
};
use crate::services::settings::ConfigService;
use crate::services::slots::SlotPlanner;
use crate::utils::date;

/// Event list owned by the demo host.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<RawEvent>,
    next_id: u64,
    /// Latest host-facing message, shown in the status bar.
    status: String,
}

impl EventStore {
    pub fn new(events: Vec<RawEvent>) -> Self {
        let next_id = events.len() as u64 + 1;
        Self {
            events,
            next_id,
            status: String::new(),
        }
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn find_mut(&mut self, event_id: &str) -> Option<&mut RawEvent> {
        self.events.iter_mut().find(|e| e.id == event_id)
    }
}

impl TimelineCallbacks for EventStore {
    fn on_range_change(&mut self, range: TimeRange) {
        log::info!("Showing {} .. {}", range.start, range.end);
    }

    fn on_create_event(&mut self, request: CreateEventRequest) {
        if request.end <= request.start {
            return;
        }
        let id = format!("new-{}", self.next_id);
        self.next_id += 1;
        let mut event = RawEvent::new(id.clone(), request.resource_id, request.start, request.end);
        event.title = Some("New booking".to_string());
        self.events.push(event);
        self.status = format!("Created {}", id);
    }

    fn on_event_move(&mut self, request: MoveEventRequest) {
        if let Some(event) = self.find_mut(&request.event_id) {
            event.resource_id = request.resource_id;
            event.start = TimeInput::instant(request.start);
            event.end = TimeInput::instant(request.end);
            self.status = format!("Moved {}", request.event_id);
        }
    }

    fn on_event_resize(&mut self, request: ResizeEventRequest) {
        if request.end <= request.start {
            return;
        }
        if let Some(event) = self.find_mut(&request.event_id) {
            event.start = TimeInput::instant(request.start);
            event.end = TimeInput::instant(request.end);
            self.status = format!("Resized {}", request.event_id);
        }
    }

    fn on_event_delete(&mut self, event_id: String) {
        self.events.retain(|e| e.id != event_id);
        self.status = format!("Deleted {}", event_id);
    }

    fn on_event_click(&mut self, event_id: String) {
        self.status = format!("Selected {}", event_id);
    }

    fn on_more_click(&mut self, request: MoreClickRequest) {
        self.status = format!(
            "{} hidden on {}: {}",
            request.hidden_event_ids.len(),
            request.resource_id,
            request.hidden_event_ids.join(", ")
        );
    }
}

pub struct TimelineApp {
    config: TimelineConfig,
    config_service: ConfigService,
    resources: Vec<Resource>,
    groups: Vec<Group>,
    store: EventStore,
    view: TimelineView,
    anchor: DateTime<Utc>,
}

impl TimelineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config_service: ConfigService) -> Self {
        let config = match config_service.load() {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}; falling back to defaults", err);
                TimelineConfig::default()
            }
        };
        let now = Utc::now();
        let (resources, groups, events) = sample_data(now, &config);
        Self {
            config,
            config_service,
            resources,
            groups,
            store: EventStore::new(events),
            view: TimelineView::new(),
            anchor: now,
        }
    }

    fn navigate(&mut self, steps: i32) {
        self.anchor = SlotPlanner::new(&self.config.resolve()).step_anchor(self.anchor, steps);
        self.view.reset_scroll();
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀").clicked() {
                self.navigate(-1);
            }
            if ui.button("Today").clicked() {
                self.anchor = Utc::now();
                self.view.reset_scroll();
            }
            if ui.button("▶").clicked() {
                self.navigate(1);
            }

            ui.separator();
            ComboBox::from_label("View")
                .selected_text(self.config.view.as_str())
                .show_ui(ui, |ui| {
                    for view in [ViewKind::Day, ViewKind::Week, ViewKind::Month, ViewKind::Sprint] {
                        ui.selectable_value(&mut self.config.view, view, view.as_str());
                    }
                });
            ComboBox::from_label("Columns")
                .selected_text(format!("{:?}", self.config.layout_mode))
                .show_ui(ui, |ui| {
                    for mode in [LayoutMode::Fixed, LayoutMode::Shrink, LayoutMode::Redistribute] {
                        ui.selectable_value(&mut self.config.layout_mode, mode, format!("{:?}", mode));
                    }
                });
            ui.checkbox(&mut self.config.anchor_compression, "Compress hours");
            ui.checkbox(&mut self.config.gestures.view_only, "View only");
            let mut click_create = self.config.gestures.create_mode == CreateMode::Click;
            if ui.checkbox(&mut click_create, "Click to create").changed() {
                self.config.gestures.create_mode = if click_create {
                    CreateMode::Click
                } else {
                    CreateMode::Drag
                };
            }

            ui.separator();
            if ui.button("Save settings").clicked() {
                match self.config_service.save(&self.config) {
                    Ok(()) => log::info!("Saved config to {}", self.config_service.path().display()),
                    Err(err) => log::error!("{}", err),
                }
            }
        });
    }
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.render_toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.store.status());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            // Callbacks mutate the store, so render from a snapshot.
            let events = self.store.events().to_vec();
            let data = TimelineData {
                resources: &self.resources,
                groups: &self.groups,
                events: &events,
                anchor: self.anchor,
                now: Utc::now(),
            };
            self.view.show(ui, &self.config, data, &mut self.store);
        });
    }
}

/// A small fleet with a few overlapping bookings around `now`.
fn sample_data(now: DateTime<Utc>, config: &TimelineConfig) -> (Vec<Resource>, Vec<Group>, Vec<RawEvent>) {
    let zone = date::resolve_zone(&config.time_zone);
    let today = date::start_of_day(now, zone);
    let at = |days: i64, hours: i64| today + Duration::days(days) + Duration::hours(hours);

    let groups = vec![Group::new("cranes", "Cranes"), Group::new("trucks", "Trucks")];
    let resources = vec![
        Resource::new("yard", "Yard office"),
        Resource::new("c1", "Tower crane").in_group("cranes"),
        Resource::new("c2", "Mobile crane").in_group("cranes"),
        Resource::new("t1", "Flatbed 1").in_group("trucks"),
        Resource::new("t2", "Flatbed 2").in_group("trucks"),
        Resource::new("t3", "Tipper (service)").in_group("trucks").disabled(true),
    ];

    let booking = |id: &str, resource: &str, start: DateTime<Utc>, end: DateTime<Utc>, title: &str, color: &str| {
        RawEvent::builder()
            .id(id)
            .resource(resource)
            .start(start)
            .end(end)
            .title(title)
            .color(color)
            .build()
    };

    let events = [
        booking("1", "c1", at(0, 8), at(0, 12), "Lift steel", "#3b82f6"),
        booking("2", "c1", at(0, 10), at(0, 15), "Roof panels", "#10b981"),
        booking("3", "c1", at(0, 11), at(0, 13), "Inspection", "#f59e0b"),
        booking("4", "c1", at(0, 11), at(0, 12), "Safety walk", "#ef4444"),
        booking("5", "c1", at(0, 9), at(0, 14), "Glazing", "#8b5cf6"),
        booking("6", "c2", at(-2, 0), at(3, 0), "Site B hire", "#6366f1"),
        booking("7", "t1", at(0, 6), at(0, 9), "Deliver rebar", "#14b8a6"),
        booking("8", "t1", at(1, 7), at(1, 17), "Timber run", "#0ea5e9"),
        booking("9", "t2", at(-1, 12), at(2, 12), "Interstate", "#a855f7"),
        booking("10", "yard", at(0, 9), at(0, 10), "Standup", "#64748b"),
    ]
    .into_iter()
    .filter_map(|result| match result {
        Ok(event) => Some(event),
        Err(err) => {
            log::warn!("Skipping sample event: {}", err);
            None
        }
    })
    .collect();

    (resources, groups, events)
}
