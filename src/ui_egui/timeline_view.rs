//! egui widget that paints a [`TimelineLayout`] and feeds pointer input to
//! the [`InteractionController`].
//!
//! The widget owns its scroll position instead of wrapping an
//! `egui::ScrollArea`, so the same offsets drive virtualization, hit testing
//! and edge autoscroll.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use egui::{pos2, vec2, Align2, Color32, FontId, Key, Pos2, Rect, Response, Sense, Stroke, Ui};

use super::theme::{parse_color, TimelineTheme};
use crate::models::event::RawEvent;
use crate::models::resource::{Group, Resource, Row};
use crate::models::settings::TimelineConfig;
use crate::models::ui::{LayoutRect, ScrollState, TimelineCallbacks};
use crate::services::interaction::{InteractionController, PointerInput};
use crate::services::timeline::{HitTarget, TimelineInput, TimelineLayout, TimelineModel};

/// Height of the slot header strip.
pub const HEADER_HEIGHT: f32 = 28.0;
/// Width of the resource label column.
pub const LABEL_WIDTH: f32 = 160.0;

/// egui exposes a single primary pointer.
const MOUSE_POINTER: u64 = 0;

/// Host data for one frame.
#[derive(Debug, Clone, Copy)]
pub struct TimelineData<'a> {
    pub resources: &'a [Resource],
    pub groups: &'a [Group],
    pub events: &'a [RawEvent],
    pub anchor: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

/// Persistent widget state. Keep one per timeline across frames.
#[derive(Debug, Default)]
pub struct TimelineView {
    model: TimelineModel,
    controller: InteractionController,
    scroll: ScrollState,
    collapsed: HashSet<String>,
    selected: Option<String>,
    /// Event under the pointer at press; selected on release unless dragged.
    pressed: Option<String>,
}

impl TimelineView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collapsed(&self) -> &HashSet<String> {
        &self.collapsed
    }

    pub fn toggle_group(&mut self, group_id: &str) {
        if !self.collapsed.remove(group_id) {
            self.collapsed.insert(group_id.to_string());
        }
    }

    /// Event last pressed, the target of the Delete key.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Jump back to the top-left corner, e.g. after navigating.
    pub fn reset_scroll(&mut self) {
        self.scroll.left = 0.0;
        self.scroll.top = 0.0;
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        config: &TimelineConfig,
        data: TimelineData<'_>,
        callbacks: &mut dyn TimelineCallbacks,
    ) -> Response {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, Sense::click_and_drag());
        let body = Rect::from_min_max(
            pos2(rect.left() + LABEL_WIDTH, rect.top() + HEADER_HEIGHT),
            rect.max,
        );
        if body.width() <= 0.0 || body.height() <= 0.0 {
            return response;
        }

        let input = TimelineInput {
            resources: data.resources,
            groups: data.groups,
            events: data.events,
            collapsed: &self.collapsed,
            anchor: data.anchor,
            now: data.now,
            viewport_width: body.width(),
        };
        let layout = self.model.refresh(config, input, callbacks);
        self.sync_viewport(&layout, body);

        self.handle_wheel(ui, &response, &layout);
        self.handle_pointer(ui, &layout, rect, body, callbacks);
        self.handle_keys(ui, &layout, callbacks);

        if self.controller.tick_autoscroll(&layout, &mut self.scroll) {
            ui.ctx().request_repaint();
        }

        let theme = TimelineTheme::for_visuals(ui.visuals());
        self.paint(ui, &layout, rect, body, &theme);
        response
    }

    fn sync_viewport(&mut self, layout: &TimelineLayout, body: Rect) {
        self.scroll.viewport_width = body.width();
        self.scroll.viewport_height = body.height();
        self.scroll.max_left = (layout.columns.grid_width - body.width()).max(0.0);
        self.scroll.left = self.scroll.clamp_left(self.scroll.left);
        self.scroll.top = self.clamp_top(layout, self.scroll.top);
    }

    fn clamp_top(&self, layout: &TimelineLayout, top: f32) -> f32 {
        let max_top = (layout.total_height() - self.scroll.viewport_height).max(0.0);
        top.clamp(0.0, max_top)
    }

    fn handle_wheel(&mut self, ui: &Ui, response: &Response, layout: &TimelineLayout) {
        if !response.hovered() || self.controller.is_active() {
            return;
        }
        let delta = ui.input(|i| i.smooth_scroll_delta);
        if delta == egui::Vec2::ZERO {
            return;
        }
        self.scroll.left = self.scroll.clamp_left(self.scroll.left - delta.x);
        self.scroll.top = self.clamp_top(layout, self.scroll.top - delta.y);
    }

    fn handle_pointer(
        &mut self,
        ui: &Ui,
        layout: &TimelineLayout,
        rect: Rect,
        body: Rect,
        callbacks: &mut dyn TimelineCallbacks,
    ) {
        let (pos, pressed, released, down) = ui.input(|i| {
            (
                i.pointer.interact_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
            )
        });

        let Some(pos) = pos else {
            if self.controller.is_active() && !down {
                self.controller.pointer_cancel(MOUSE_POINTER);
            }
            return;
        };
        let pointer = PointerInput::new(MOUSE_POINTER, pos.x - body.left(), pos.y - body.top());

        if pressed {
            if body.contains(pos) {
                let content_x = pointer.x + self.scroll.left;
                let content_y = pointer.y + self.scroll.top;
                self.pressed = match layout.hit_test(content_x, content_y) {
                    HitTarget::Event { event_index, .. } => {
                        layout.events.get(event_index).map(|e| e.id().to_string())
                    }
                    _ => None,
                };
                self.controller
                    .pointer_down(layout, &self.scroll, pointer, callbacks);
            } else if pos.x < body.left() && pos.y >= body.top() && rect.contains(pos) {
                self.toggle_group_at(layout, pointer.y + self.scroll.top);
            }
        }

        if released {
            self.controller
                .pointer_up(layout, &self.scroll, pointer, callbacks);
            let dragged = self.controller.take_click_suppression();
            self.finish_press(dragged);
        } else if self.controller.is_active() {
            if down {
                if self.controller.pointer_move(layout, &self.scroll, pointer) {
                    ui.ctx().request_repaint();
                }
            } else {
                self.controller.pointer_cancel(MOUSE_POINTER);
            }
        }
    }

    /// A drag leaves the selection alone; a click selects what was pressed.
    fn finish_press(&mut self, dragged: bool) {
        let pressed = self.pressed.take();
        if !dragged {
            self.selected = pressed;
        }
    }

    fn toggle_group_at(&mut self, layout: &TimelineLayout, content_y: f32) {
        let Some(row) = layout.row_at(content_y) else {
            return;
        };
        if let Some(Row::Group(group)) = layout.rows.get(row) {
            if group.collapsible {
                let id = group.id.clone();
                self.toggle_group(&id);
            }
        }
    }

    fn handle_keys(
        &mut self,
        ui: &Ui,
        layout: &TimelineLayout,
        callbacks: &mut dyn TimelineCallbacks,
    ) {
        let Some(event_id) = self.selected.clone() else {
            return;
        };
        if ui.input(|i| i.key_pressed(Key::Delete))
            && self.model.request_delete(layout, &event_id, callbacks)
        {
            self.selected = None;
        }
    }

    fn paint(&self, ui: &Ui, layout: &TimelineLayout, rect: Rect, body: Rect, theme: &TimelineTheme) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme.background);

        let window = layout.visible(&self.scroll);
        let header = Rect::from_min_max(pos2(body.left(), rect.top()), pos2(rect.right(), body.top()));
        let labels = Rect::from_min_max(pos2(rect.left(), body.top()), pos2(body.left(), rect.bottom()));

        // Column backgrounds and separators.
        let body_painter = painter.with_clip_rect(body);
        let header_painter = painter.with_clip_rect(header);
        header_painter.rect_filled(header, 0.0, theme.header_background);
        let show_all_labels = layout.columns.anchors.is_empty();
        for col in window.columns.clone() {
            let x = body.left() + layout.columns.left(col) - self.scroll.left;
            let width = layout.columns.slot_widths[col];
            let slot = &layout.plan.slots[col];
            let column = Rect::from_min_size(pos2(x, body.top()), vec2(width, body.height()));

            if slot.is_today {
                body_painter.rect_filled(column, 0.0, theme.today_background);
            } else if slot.is_weekend {
                body_painter.rect_filled(column, 0.0, theme.weekend_background);
            }
            body_painter.line_segment(
                [pos2(x, body.top()), pos2(x, body.bottom())],
                Stroke::new(1.0, theme.grid_line),
            );

            if show_all_labels || layout.columns.anchors.contains(&col) {
                header_painter.text(
                    pos2(x + 4.0, header.center().y),
                    Align2::LEFT_CENTER,
                    &slot.label,
                    FontId::proportional(11.0),
                    if slot.is_today {
                        theme.text_primary
                    } else {
                        theme.text_secondary
                    },
                );
            }
        }

        // Rows.
        let label_painter = painter.with_clip_rect(labels);
        for row in window.rows.clone() {
            let top = body.top() + layout.row_offsets[row] - self.scroll.top;
            let height = layout.row_heights[row];
            let row_body = Rect::from_min_size(pos2(body.left(), top), vec2(body.width(), height));
            let row_label = Rect::from_min_size(pos2(labels.left(), top), vec2(labels.width(), height));

            match &layout.rows[row] {
                Row::Group(group) => {
                    body_painter.rect_filled(row_body, 0.0, theme.group_background);
                    label_painter.rect_filled(row_label, 0.0, theme.group_background);
                    let marker = match (group.collapsible, self.collapsed.contains(&group.id)) {
                        (false, _) => "",
                        (true, true) => "▸ ",
                        (true, false) => "▾ ",
                    };
                    label_painter.text(
                        pos2(row_label.left() + 6.0, row_label.center().y),
                        Align2::LEFT_CENTER,
                        format!("{}{}", marker, group.label),
                        FontId::proportional(13.0),
                        theme.text_primary,
                    );
                }
                Row::Resource(resource) => {
                    label_painter.text(
                        pos2(row_label.left() + 12.0, row_label.center().y),
                        Align2::LEFT_CENTER,
                        &resource.label,
                        FontId::proportional(13.0),
                        if resource.disabled {
                            theme.text_secondary
                        } else {
                            theme.text_primary
                        },
                    );
                }
            }
            body_painter.line_segment(
                [pos2(rect.left(), row_body.bottom()), pos2(rect.right(), row_body.bottom())],
                Stroke::new(1.0, theme.grid_line),
            );

            if let Some(strip) = layout.more_indicator_rect(row) {
                let hidden = layout
                    .resource_at_row(row)
                    .map(|r| layout.hidden_event_ids(&r.id).len())
                    .unwrap_or(0);
                body_painter.text(
                    pos2(body.left() + 6.0, self.to_screen(body, &strip).center().y),
                    Align2::LEFT_CENTER,
                    format!("+{} more", hidden),
                    FontId::proportional(11.0),
                    theme.more_indicator,
                );
            }
        }

        // Events.
        for placed in &window.events {
            let event = &layout.events[placed.event_index];
            let screen = self.to_screen(body, &placed.rect);
            let fill = event
                .event
                .color
                .as_deref()
                .and_then(parse_color)
                .unwrap_or(theme.event_fill);
            body_painter.rect_filled(screen, 3.0, fill);
            if self.selected.as_deref() == Some(event.id()) {
                body_painter.rect_stroke(screen, 3.0, Stroke::new(2.0, theme.text_primary));
            }
            let title = event.event.title.as_deref().unwrap_or(event.id());
            let text_painter = body_painter.with_clip_rect(screen.intersect(body));
            text_painter.text(
                pos2(screen.left().max(body.left()) + 4.0, screen.center().y),
                Align2::LEFT_CENTER,
                title,
                FontId::proportional(12.0),
                Color32::WHITE,
            );
        }

        // Gesture preview.
        if let Some(preview) = self.controller.preview() {
            if let Some(row) = layout.row_of_resource(&preview.resource_id) {
                let (start_idx, end_idx) = layout.plan.slot_span(preview.start, preview.end);
                let (left, width) = layout.columns.span_extent(start_idx, end_idx);
                let screen = self.to_screen(
                    body,
                    &LayoutRect {
                        left,
                        width,
                        lane: 0,
                        top: layout.row_offsets[row] + 1.0,
                        height: layout.row_heights[row] - 2.0,
                    },
                );
                body_painter.rect_filled(screen, 3.0, theme.preview_fill);
            }
        }
    }

    fn to_screen(&self, body: Rect, rect: &LayoutRect) -> Rect {
        Rect::from_min_size(
            Pos2::new(
                body.left() + rect.left - self.scroll.left,
                body.top() + rect.top - self.scroll.top,
            ),
            vec2(rect.width, rect.height),
        )
    }
}
