//! Timeline composition.
//!
//! Turns one snapshot of host data into everything a renderer needs: the slot
//! plan, flattened rows, normalized events, lane assignments, column geometry,
//! row offsets, and from those the rectangle of every visible event. Nothing is
//! cached between passes; [`TimelineModel`] only remembers the last visible
//! range so it can tell the host when it changes.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use chrono::{DateTime, Utc};

use crate::models::event::{NormalizedEvent, RawEvent};
use crate::models::resource::{build_rows, Group, Resource, Row};
use crate::models::settings::TimelineConfig;
use crate::models::ui::{LayoutRect, ScrollState, TimeRange, TimelineCallbacks};
use crate::services::columns::{ColumnLayout, ColumnRequest};
use crate::services::lanes::{assign_lanes, event_spans, ResourceLanes, SlotSpan};
use crate::services::normalize::normalize_events;
use crate::services::slots::{SlotPlan, SlotPlanner};
use crate::services::window::{index_at, prefix_offsets, Virtualizer};

/// Width of the resize hit zone at each end of an event bar.
pub const HANDLE_SIZE: f32 = 8.0;

/// One render pass worth of host data.
#[derive(Debug, Clone, Copy)]
pub struct TimelineInput<'a> {
    pub resources: &'a [Resource],
    pub groups: &'a [Group],
    pub events: &'a [RawEvent],
    pub collapsed: &'a HashSet<String>,
    pub anchor: DateTime<Utc>,
    pub now: DateTime<Utc>,
    /// Width of the scrollable grid viewport, for fill and week stretching.
    pub viewport_width: f32,
}

/// Which part of an event bar is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPart {
    Body,
    StartHandle,
    EndHandle,
}

/// Result of hit testing a content-space point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Outside,
    GroupHeader {
        row: usize,
        group_id: String,
    },
    MoreIndicator {
        row: usize,
        resource_id: String,
    },
    Event {
        row: usize,
        event_index: usize,
        part: EventPart,
    },
    Cell {
        row: usize,
        resource_id: String,
        slot: usize,
    },
}

/// An event that should be drawn, with its rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedEvent {
    pub event_index: usize,
    pub row: usize,
    pub rect: LayoutRect,
}

/// Visible part of the grid for a scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleWindow {
    pub rows: Range<usize>,
    pub columns: Range<usize>,
    pub events: Vec<PlacedEvent>,
}

/// Fully derived timeline geometry for one pass.
#[derive(Debug, Clone)]
pub struct TimelineLayout {
    pub config: TimelineConfig,
    pub plan: SlotPlan,
    pub rows: Vec<Row>,
    pub events: Vec<NormalizedEvent>,
    pub spans: Vec<SlotSpan>,
    pub lanes: HashMap<String, ResourceLanes>,
    pub columns: ColumnLayout,
    pub row_heights: Vec<f32>,
    pub row_offsets: Vec<f32>,
    resource_rows: HashMap<String, usize>,
}

impl TimelineLayout {
    pub fn compute(config: &TimelineConfig, input: TimelineInput<'_>) -> Self {
        let config = config.resolve();
        let planner = SlotPlanner::new(&config);
        let plan = planner.plan(input.anchor, input.now);

        let events = normalize_events(input.events, plan.range, plan.view, plan.zone);
        let spans = event_spans(&plan, &events);
        let lanes = assign_lanes(&spans, &events, config.max_lanes_per_row);

        let request = ColumnRequest::from_config(&config, plan.len(), input.viewport_width);
        let columns = ColumnLayout::compute(&request, &spans);

        let rows = build_rows(input.resources, input.groups, input.collapsed);
        let row_heights: Vec<f32> = rows
            .iter()
            .map(|row| match row {
                Row::Group(_) => config.group_row_height,
                Row::Resource(resource) => match lanes.get(&resource.id) {
                    Some(assigned) => config
                        .resource_row_height(assigned.lane_count, !assigned.hidden.is_empty()),
                    None => config.resource_row_height(0, false),
                },
            })
            .collect();
        let row_offsets = prefix_offsets(row_heights.iter().copied());
        let resource_rows = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.resource().map(|r| (r.id.clone(), i)))
            .collect();

        log::debug!(
            "Timeline layout: {} rows, {} slots, {} events, grid {}x{}",
            rows.len(),
            plan.len(),
            events.len(),
            columns.grid_width,
            row_offsets.last().copied().unwrap_or(0.0)
        );

        Self {
            config,
            plan,
            rows,
            events,
            spans,
            lanes,
            columns,
            row_heights,
            row_offsets,
            resource_rows,
        }
    }

    pub fn total_height(&self) -> f32 {
        self.row_offsets.last().copied().unwrap_or(0.0)
    }

    pub fn range(&self) -> TimeRange {
        self.plan.range
    }

    pub fn row_of_resource(&self, resource_id: &str) -> Option<usize> {
        self.resource_rows.get(resource_id).copied()
    }

    pub fn row_at(&self, y: f32) -> Option<usize> {
        index_at(&self.row_offsets, y)
    }

    pub fn resource_at_row(&self, row: usize) -> Option<&Resource> {
        self.rows.get(row).and_then(|r| r.resource())
    }

    pub fn event_index(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id() == event_id)
    }

    /// Rectangle of one event, or `None` if its row is not shown or its lane
    /// is beyond the per-row cap.
    pub fn event_rect(&self, event_index: usize) -> Option<LayoutRect> {
        let event = self.events.get(event_index)?;
        let row = self.row_of_resource(event.resource_id())?;
        let entry = self.lanes.get(event.resource_id())?.entry_for(event_index)?;
        if entry.lane >= self.config.max_lanes_per_row {
            return None;
        }
        Some(self.lane_rect(row, entry.lane, entry.span))
    }

    /// Rectangle a span would occupy in `row` at `lane`.
    pub fn lane_rect(&self, row: usize, lane: usize, span: SlotSpan) -> LayoutRect {
        let (left, width) = self.columns.span_extent(span.start_idx, span.end_idx);
        let row_top = self.row_offsets.get(row).copied().unwrap_or(0.0);
        LayoutRect {
            left,
            width,
            lane,
            top: row_top
                + self.config.row_padding
                + lane as f32 * (self.config.event_height + self.config.lane_gap),
            height: self.config.event_height,
        }
    }

    /// Strip at the bottom of a row that lists hidden events.
    pub fn more_indicator_rect(&self, row: usize) -> Option<LayoutRect> {
        let resource = self.resource_at_row(row)?;
        let lanes = self.lanes.get(&resource.id)?;
        if lanes.hidden.is_empty() {
            return None;
        }
        let bottom = self.row_offsets.get(row + 1).copied()?;
        let height = self.config.more_indicator_height;
        Some(LayoutRect {
            left: 0.0,
            width: self.columns.grid_width,
            lane: self.config.max_lanes_per_row,
            top: bottom - self.config.row_padding.min(bottom) - height,
            height,
        })
    }

    /// Hidden event ids for the resource on `row`.
    pub fn hidden_event_ids(&self, resource_id: &str) -> Vec<String> {
        self.lanes
            .get(resource_id)
            .map(|lanes| {
                lanes
                    .hidden
                    .iter()
                    .filter_map(|&i| self.events.get(i).map(|e| e.id().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Rows, columns and event rectangles to draw for `scroll`.
    pub fn visible(&self, scroll: &ScrollState) -> VisibleWindow {
        let virtualization = self.config.virtualization;
        let rows = Virtualizer::new(virtualization.enabled, virtualization.row_overscan).window(
            &self.row_offsets,
            scroll.top,
            scroll.viewport_height,
        );
        let columns = Virtualizer::new(virtualization.enabled, virtualization.column_overscan)
            .window(&self.columns.slot_lefts, scroll.left, scroll.viewport_width);

        let mut events = Vec::new();
        for row in rows.clone() {
            let Some(resource) = self.resource_at_row(row) else {
                continue;
            };
            let Some(lanes) = self.lanes.get(&resource.id) else {
                continue;
            };
            for entry in &lanes.entries {
                if entry.lane >= self.config.max_lanes_per_row {
                    continue;
                }
                if entry.span.end_idx <= columns.start || entry.span.start_idx >= columns.end {
                    continue;
                }
                events.push(PlacedEvent {
                    event_index: entry.event_index,
                    row,
                    rect: self.lane_rect(row, entry.lane, entry.span),
                });
            }
        }

        VisibleWindow {
            rows,
            columns,
            events,
        }
    }

    /// What lies under content-space point `(x, y)`.
    pub fn hit_test(&self, x: f32, y: f32) -> HitTarget {
        if x < 0.0 || x >= self.columns.grid_width || self.columns.is_empty() {
            return HitTarget::Outside;
        }
        let Some(row) = self.row_at(y) else {
            return HitTarget::Outside;
        };

        let resource = match &self.rows[row] {
            Row::Group(group) => {
                return HitTarget::GroupHeader {
                    row,
                    group_id: group.id.clone(),
                }
            }
            Row::Resource(resource) => resource,
        };

        if let Some(strip) = self.more_indicator_rect(row) {
            if strip.contains(x, y) {
                return HitTarget::MoreIndicator {
                    row,
                    resource_id: resource.id.clone(),
                };
            }
        }

        if let Some(lanes) = self.lanes.get(&resource.id) {
            for entry in &lanes.entries {
                if entry.lane >= self.config.max_lanes_per_row {
                    continue;
                }
                let rect = self.lane_rect(row, entry.lane, entry.span);
                if rect.contains(x, y) {
                    return HitTarget::Event {
                        row,
                        event_index: entry.event_index,
                        part: event_part(&rect, x),
                    };
                }
            }
        }

        HitTarget::Cell {
            row,
            resource_id: resource.id.clone(),
            slot: self.columns.x_to_slot_idx(x),
        }
    }
}

fn event_part(rect: &LayoutRect, x: f32) -> EventPart {
    let handle = HANDLE_SIZE.min(rect.width / 3.0);
    if x < rect.left + handle {
        EventPart::StartHandle
    } else if x >= rect.right() - handle {
        EventPart::EndHandle
    } else {
        EventPart::Body
    }
}

/// Recomputes layouts and reports visible-range changes to the host.
#[derive(Debug, Default)]
pub struct TimelineModel {
    last_range: Option<TimeRange>,
}

impl TimelineModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_range(&self) -> Option<TimeRange> {
        self.last_range
    }

    /// Compute a fresh layout, firing `on_range_change` if the visible range
    /// differs from the previous pass.
    pub fn refresh(
        &mut self,
        config: &TimelineConfig,
        input: TimelineInput<'_>,
        callbacks: &mut dyn TimelineCallbacks,
    ) -> TimelineLayout {
        let layout = TimelineLayout::compute(config, input);
        let range = layout.range();
        if self.last_range != Some(range) {
            log::debug!("Visible range changed to {} .. {}", range.start, range.end);
            self.last_range = Some(range);
            callbacks.on_range_change(range);
        }
        layout
    }

    /// Ask the host to delete `event_id`. Fires `on_event_delete` only when
    /// deletion is enabled and the event is part of the current layout.
    pub fn request_delete(
        &self,
        layout: &TimelineLayout,
        event_id: &str,
        callbacks: &mut dyn TimelineCallbacks,
    ) -> bool {
        if !layout.config.gestures.can_delete() {
            log::debug!("Delete of {} refused: deletion disabled", event_id);
            return false;
        }
        if layout.event_index(event_id).is_none() {
            return false;
        }
        callbacks.on_event_delete(event_id.to_string());
        true
    }
}
