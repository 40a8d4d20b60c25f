//! Pointer interaction: create, move and resize gestures.
//!
//! The controller is driven by the host with pointer events in viewport
//! coordinates (relative to the top-left of the scrollable grid body). It
//! hit-tests against the current [`TimelineLayout`], keeps a preview of the
//! pending change and fires exactly one host callback on commit.

pub mod autoscroll;
pub mod gesture;

use chrono::{DateTime, Utc};

use crate::models::ui::{
    CreateEventRequest, MoreClickRequest, MoveEventRequest, ResizeEventRequest, ScrollState,
    TimelineCallbacks,
};
use crate::models::settings::CreateMode;
use crate::services::timeline::{EventPart, HitTarget, TimelineLayout};

pub use autoscroll::{edge_velocity, AutoScrollTask};
pub use gesture::{Gesture, GestureCell, GestureMode, Preview};

/// Pointer travel, in pixels, before a press on an event becomes a drag.
pub const DRAG_THRESHOLD_PX: f32 = 4.0;
/// Bias toward the earlier slot when snapping a create gesture.
pub const SNAP_EPSILON: f32 = 0.5;

/// One pointer sample in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer_id: u64,
    pub x: f32,
    pub y: f32,
}

impl PointerInput {
    pub fn new(pointer_id: u64, x: f32, y: f32) -> Self {
        Self { pointer_id, x, y }
    }

    fn content(&self, scroll: &ScrollState) -> (f32, f32) {
        (self.x + scroll.left, self.y + scroll.top)
    }
}

/// Gesture state machine for one timeline.
#[derive(Debug, Default)]
pub struct InteractionController {
    gesture: GestureCell,
    /// Press on an event that may not be dragged; reported as a click on release.
    pending_click: Option<(u64, String)>,
    suppress_click: bool,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn mode(&self) -> Option<GestureMode> {
        self.gesture.get().map(|g| g.mode)
    }

    /// Preview of the active gesture, if it has produced one yet.
    pub fn preview(&self) -> Option<&Preview> {
        self.gesture.get().and_then(|g| g.preview.as_ref())
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.gesture
            .get()
            .map(|g| g.autoscroll.is_running())
            .unwrap_or(false)
    }

    /// True once after a gesture that really moved, so the host can swallow
    /// the click its toolkit reports for the same release.
    pub fn take_click_suppression(&mut self) -> bool {
        std::mem::take(&mut self.suppress_click)
    }

    /// Handle a press. Returns true if the press was consumed.
    pub fn pointer_down(
        &mut self,
        layout: &TimelineLayout,
        scroll: &ScrollState,
        input: PointerInput,
        callbacks: &mut dyn TimelineCallbacks,
    ) -> bool {
        if self.gesture.is_active() || self.pending_click.is_some() {
            log::trace!("Ignoring press from pointer {} during a gesture", input.pointer_id);
            return false;
        }
        self.suppress_click = false;

        let (x, y) = input.content(scroll);
        let gestures = layout.config.gestures;

        match layout.hit_test(x, y) {
            HitTarget::MoreIndicator { resource_id, .. } => {
                let hidden_event_ids = layout.hidden_event_ids(&resource_id);
                callbacks.on_more_click(MoreClickRequest {
                    resource_id,
                    hidden_event_ids,
                });
                true
            }
            HitTarget::Event {
                event_index, part, ..
            } => {
                let Some(event) = layout.events.get(event_index) else {
                    return false;
                };
                let resizable = event.event.is_resizable(gestures.can_resize());
                let mode = match part {
                    EventPart::StartHandle if resizable => Some(GestureMode::ResizingStart),
                    EventPart::EndHandle if resizable => Some(GestureMode::ResizingEnd),
                    _ if event.event.is_draggable(gestures.can_drag()) => Some(GestureMode::Moving),
                    _ => None,
                };
                let Some(mode) = mode else {
                    self.pending_click = Some((input.pointer_id, event.id().to_string()));
                    return true;
                };
                self.gesture.begin(Gesture {
                    pointer_id: input.pointer_id,
                    mode,
                    event_id: Some(event.id().to_string()),
                    resource_id: event.resource_id().to_string(),
                    origin_start: event.start,
                    origin_end: event.end,
                    start_slot_idx: layout.columns.x_to_slot_idx(x),
                    start_client: (input.x, input.y),
                    last_client: (input.x, input.y),
                    moved: false,
                    preview: None,
                    autoscroll: AutoScrollTask::default(),
                })
            }
            HitTarget::Cell {
                row,
                resource_id,
                slot,
            } => {
                if !gestures.can_create() {
                    return false;
                }
                if layout.resource_at_row(row).map(|r| r.disabled).unwrap_or(true) {
                    return false;
                }
                let slot = create_slot(layout, x).min(slot);
                let start = layout.plan.boundary(slot);
                let end = layout.plan.slot_end(slot);
                self.gesture.begin(Gesture {
                    pointer_id: input.pointer_id,
                    mode: GestureMode::Creating,
                    event_id: None,
                    resource_id: resource_id.clone(),
                    origin_start: start,
                    origin_end: end,
                    start_slot_idx: slot,
                    start_client: (input.x, input.y),
                    last_client: (input.x, input.y),
                    moved: false,
                    preview: Some(Preview {
                        event_id: None,
                        resource_id,
                        start,
                        end,
                    }),
                    autoscroll: AutoScrollTask::default(),
                })
            }
            HitTarget::GroupHeader { .. } | HitTarget::Outside => false,
        }
    }

    /// Handle pointer motion. Returns true if the preview changed.
    pub fn pointer_move(
        &mut self,
        layout: &TimelineLayout,
        scroll: &ScrollState,
        input: PointerInput,
    ) -> bool {
        let Some(gesture) = self.gesture.get_for(input.pointer_id) else {
            return false;
        };
        gesture.last_client = (input.x, input.y);
        let changed = update_preview(gesture, layout, scroll);

        // A still pointer inside the edge zone must not scroll.
        let velocity = if gesture.moved {
            edge_velocity(input.x, scroll.viewport_width, &layout.config.autoscroll)
        } else {
            0.0
        };
        if gesture.autoscroll.steer(velocity) {
            log::trace!("Autoscroll started at {:.1} px/frame", velocity);
        }
        changed
    }

    /// Handle a release: commit the preview, report a click, or cancel.
    pub fn pointer_up(
        &mut self,
        layout: &TimelineLayout,
        scroll: &ScrollState,
        input: PointerInput,
        callbacks: &mut dyn TimelineCallbacks,
    ) {
        if let Some((pointer_id, event_id)) = self.pending_click.take() {
            if pointer_id == input.pointer_id {
                callbacks.on_event_click(event_id);
            }
            return;
        }

        let matches = self
            .gesture
            .get()
            .map(|g| g.pointer_id == input.pointer_id)
            .unwrap_or(false);
        if !matches {
            if let Some(gesture) = self.gesture.take() {
                log::debug!(
                    "Release from pointer {} does not own the {:?} gesture; cancelling",
                    input.pointer_id,
                    gesture.mode
                );
            }
            return;
        }

        if let Some(gesture) = self.gesture.get_mut() {
            gesture.last_client = (input.x, input.y);
            update_preview(gesture, layout, scroll);
        }
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        self.suppress_click = gesture.moved;

        let Some(preview) = gesture.preview else {
            if let (Some(event_id), false) = (gesture.event_id, gesture.moved) {
                callbacks.on_event_click(event_id);
            } else {
                log::trace!("{:?} gesture released without a preview", gesture.mode);
            }
            return;
        };

        match gesture.mode {
            GestureMode::Creating => {
                log::debug!(
                    "Create on {} from {} to {}",
                    preview.resource_id,
                    preview.start,
                    preview.end
                );
                callbacks.on_create_event(CreateEventRequest {
                    resource_id: preview.resource_id,
                    start: preview.start,
                    end: preview.end,
                });
            }
            GestureMode::Moving => {
                let Some(event_id) = preview.event_id else {
                    return;
                };
                if preview.start == gesture.origin_start && preview.resource_id == gesture.resource_id {
                    log::trace!("Move of {} ended where it started", event_id);
                    return;
                }
                log::debug!(
                    "Move {} to {} at {}",
                    event_id,
                    preview.resource_id,
                    preview.start
                );
                callbacks.on_event_move(MoveEventRequest {
                    event_id,
                    resource_id: preview.resource_id,
                    start: preview.start,
                    end: preview.end,
                });
            }
            GestureMode::ResizingStart | GestureMode::ResizingEnd => {
                let Some(event_id) = preview.event_id else {
                    return;
                };
                if preview.start == gesture.origin_start && preview.end == gesture.origin_end {
                    return;
                }
                log::debug!(
                    "Resize {} to {} .. {}",
                    event_id,
                    preview.start,
                    preview.end
                );
                callbacks.on_event_resize(ResizeEventRequest {
                    event_id,
                    start: preview.start,
                    end: preview.end,
                });
            }
        }
    }

    /// Pointer capture was lost; drop the gesture without a callback.
    pub fn pointer_cancel(&mut self, pointer_id: u64) {
        if matches!(&self.pending_click, Some((id, _)) if *id == pointer_id) {
            self.pending_click = None;
        }
        if self.gesture.get().map(|g| g.pointer_id) == Some(pointer_id) {
            if let Some(gesture) = self.gesture.take() {
                log::trace!("{:?} gesture cancelled", gesture.mode);
            }
        }
    }

    /// Advance edge autoscroll by one frame, writing the new offset into
    /// `scroll` and re-deriving the preview. Returns true while scrolling
    /// continues, so the host knows to schedule another frame.
    pub fn tick_autoscroll(&mut self, layout: &TimelineLayout, scroll: &mut ScrollState) -> bool {
        let Some(gesture) = self.gesture.get_mut() else {
            return false;
        };
        let Some(left) = gesture.autoscroll.step(scroll.left, scroll.max_left) else {
            return false;
        };
        scroll.left = left;
        update_preview(gesture, layout, scroll);
        true
    }
}

/// Slot under content x for creation, nudged toward the earlier slot.
fn create_slot(layout: &TimelineLayout, x: f32) -> usize {
    layout.columns.x_to_slot_idx((x - SNAP_EPSILON).max(0.0))
}

/// Recompute the preview from the gesture's last pointer position.
fn update_preview(gesture: &mut Gesture, layout: &TimelineLayout, scroll: &ScrollState) -> bool {
    let (client_x, client_y) = gesture.last_client;
    let x = client_x + scroll.left;
    let y = client_y + scroll.top;
    let plan = &layout.plan;
    if plan.is_empty() {
        return false;
    }

    if !gesture.moved {
        let dx = client_x - gesture.start_client.0;
        let dy = client_y - gesture.start_client.1;
        if (dx * dx + dy * dy).sqrt() > DRAG_THRESHOLD_PX {
            gesture.moved = true;
        } else if gesture.mode != GestureMode::Creating {
            return false;
        }
    }

    let next = match gesture.mode {
        GestureMode::Creating => {
            if layout.config.gestures.create_mode == CreateMode::Click {
                return false;
            }
            let target = create_slot(layout, x);
            let first = target.min(gesture.start_slot_idx);
            let last = target.max(gesture.start_slot_idx);
            Preview {
                event_id: None,
                resource_id: gesture.resource_id.clone(),
                start: plan.boundary(first),
                end: plan.slot_end(last),
            }
        }
        GestureMode::Moving => {
            let target = layout.columns.x_to_slot_idx(x);
            let delta = plan.boundary(target) - plan.boundary(gesture.start_slot_idx);
            let resource_id = layout
                .row_at(y)
                .and_then(|row| layout.resource_at_row(row))
                .filter(|resource| !resource.disabled)
                .map(|resource| resource.id.clone())
                .or_else(|| gesture.preview.as_ref().map(|p| p.resource_id.clone()))
                .unwrap_or_else(|| gesture.resource_id.clone());
            Preview {
                event_id: gesture.event_id.clone(),
                resource_id,
                start: gesture.origin_start + delta,
                end: gesture.origin_end + delta,
            }
        }
        GestureMode::ResizingStart => {
            let target = layout.columns.x_to_slot_idx(x);
            let start = clamp_start(
                plan.boundary(target),
                gesture.origin_end,
                plan.min_unit(),
                plan.range.start,
            );
            Preview {
                event_id: gesture.event_id.clone(),
                resource_id: gesture.resource_id.clone(),
                start,
                end: gesture.origin_end,
            }
        }
        GestureMode::ResizingEnd => {
            let target = layout.columns.x_to_slot_idx(x);
            let end = clamp_end(
                plan.slot_end(target),
                gesture.origin_start,
                plan.min_unit(),
                plan.range.end,
            );
            Preview {
                event_id: gesture.event_id.clone(),
                resource_id: gesture.resource_id.clone(),
                start: gesture.origin_start,
                end,
            }
        }
    };

    if gesture.preview.as_ref() == Some(&next) {
        return false;
    }
    gesture.preview = Some(next);
    true
}

/// New start at least one unit before `end` and not before the range start.
fn clamp_start(
    candidate: DateTime<Utc>,
    end: DateTime<Utc>,
    unit: chrono::Duration,
    range_start: DateTime<Utc>,
) -> DateTime<Utc> {
    candidate.min(end - unit).max(range_start)
}

/// New end at least one unit after `start` and not past the range end.
fn clamp_end(
    candidate: DateTime<Utc>,
    start: DateTime<Utc>,
    unit: chrono::Duration,
    range_end: DateTime<Utc>,
) -> DateTime<Utc> {
    candidate.max(start + unit).min(range_end)
}
