// UI models module
// View kinds, screen geometry and the payloads handed back to the host.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which time axis the timeline is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Month,
    Week,
    Day,
    /// One slot per ISO week across the anchor's calendar year.
    Sprint,
}

impl ViewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::Month => "month",
            ViewKind::Week => "week",
            ViewKind::Day => "day",
            ViewKind::Sprint => "sprint",
        }
    }

    /// Day view keeps sub-day precision; every other view works in whole days.
    pub fn is_sub_day(&self) -> bool {
        matches!(self, ViewKind::Day)
    }

    /// Views that may use shrink/redistribute column allocation.
    pub fn supports_adaptive_columns(&self) -> bool {
        matches!(self, ViewKind::Month | ViewKind::Day)
    }
}

/// Visible time window produced by slot planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Screen rectangle of one event inside the grid, in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRect {
    pub left: f32,
    pub width: f32,
    pub lane: usize,
    pub top: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }
}

/// Scroll position and size of the scrollable grid viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub left: f32,
    pub top: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Largest valid `left` (content width minus viewport width, never negative).
    pub max_left: f32,
}

impl ScrollState {
    pub fn clamp_left(&self, left: f32) -> f32 {
        left.clamp(0.0, self.max_left.max(0.0))
    }
}

/// Payload of `on_create_event`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Payload of `on_event_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveEventRequest {
    pub event_id: String,
    pub resource_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Payload of `on_event_resize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeEventRequest {
    pub event_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Payload of `on_more_click`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoreClickRequest {
    pub resource_id: String,
    pub hidden_event_ids: Vec<String>,
}

/// Host callback interface. Every method defaults to a no-op so hosts only
/// implement what they listen to.
#[cfg_attr(test, mockall::automock)]
pub trait TimelineCallbacks {
    fn on_range_change(&mut self, _range: TimeRange) {}
    fn on_create_event(&mut self, _request: CreateEventRequest) {}
    fn on_event_move(&mut self, _request: MoveEventRequest) {}
    fn on_event_resize(&mut self, _request: ResizeEventRequest) {}
    fn on_event_delete(&mut self, _event_id: String) {}
    fn on_event_click(&mut self, _event_id: String) {}
    fn on_more_click(&mut self, _request: MoreClickRequest) {}
}

/// Callback sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl TimelineCallbacks for NoopCallbacks {}
