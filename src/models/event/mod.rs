// Event module
// Host-supplied timeline events and their view-normalized form

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::utils::date;

/// A point in time as the host supplied it.
///
/// Hosts hand over whatever they have: an instant, epoch milliseconds, or
/// text. Text may be RFC 3339 (`2024-05-01T09:00:00+02:00`), a naive
/// date-time (`2024-05-01T09:00`, `2024-05-01 09:00:00`) or a plain date
/// (`2024-05-01`); naive forms are read as wall-clock time in the view zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeInput {
    Millis(i64),
    Text(String),
}

impl TimeInput {
    pub fn instant(dt: DateTime<Utc>) -> Self {
        TimeInput::Millis(dt.timestamp_millis())
    }

    /// Resolve to an instant, or `None` when the input is not a valid time.
    pub fn parse(&self, zone: Tz) -> Option<DateTime<Utc>> {
        match self {
            TimeInput::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            TimeInput::Text(text) => parse_text(text.trim(), zone),
        }
    }
}

impl From<DateTime<Utc>> for TimeInput {
    fn from(dt: DateTime<Utc>) -> Self {
        TimeInput::instant(dt)
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        TimeInput::Text(text.to_string())
    }
}

fn parse_text(text: &str, zone: Tz) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date::from_local(zone, naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|day| date::midnight(zone, day))
}

/// Timeline event as owned by the host. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub resource_id: String,
    pub start: TimeInput,
    pub end: TimeInput,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Per-event override; `None` defers to the global gesture flags.
    #[serde(default)]
    pub draggable: Option<bool>,
    #[serde(default)]
    pub resizable: Option<bool>,
}

impl RawEvent {
    /// Create an event spanning `[start, end)` on `resource_id`.
    ///
    /// # Examples
    /// ```
    /// use resource_timeline::models::event::RawEvent;
    ///
    /// let event = RawEvent::new("e1", "r1", "2024-05-01T09:00", "2024-05-01T11:00");
    /// assert_eq!(event.resource_id, "r1");
    /// ```
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        start: impl Into<TimeInput>,
        end: impl Into<TimeInput>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_id: resource_id.into(),
            start: start.into(),
            end: end.into(),
            title: None,
            color: None,
            draggable: None,
            resizable: None,
        }
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> RawEventBuilder {
        RawEventBuilder::new()
    }

    /// Check identifiers and, when present, the color format.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.trim().is_empty() {
            return Err(EventValidationError::EmptyId);
        }
        if self.resource_id.trim().is_empty() {
            return Err(EventValidationError::EmptyResource);
        }
        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err(EventValidationError::InvalidColor);
            }
        }
        Ok(())
    }

    pub fn is_draggable(&self, global: bool) -> bool {
        global && self.draggable.unwrap_or(true)
    }

    pub fn is_resizable(&self, global: bool) -> bool {
        global && self.resizable.unwrap_or(true)
    }
}

/// Validation errors for [`RawEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyId,
    EmptyResource,
    MissingStart,
    MissingEnd,
    InvalidColor,
}

impl std::fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Event id cannot be empty"),
            Self::EmptyResource => write!(f, "Event resource id cannot be empty"),
            Self::MissingStart => write!(f, "Event start time is required"),
            Self::MissingEnd => write!(f, "Event end time is required"),
            Self::InvalidColor => write!(f, "Color must be in hex format (#RRGGBB or #RGB)"),
        }
    }
}

impl std::error::Error for EventValidationError {}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct RawEventBuilder {
    id: Option<String>,
    resource_id: Option<String>,
    start: Option<TimeInput>,
    end: Option<TimeInput>,
    title: Option<String>,
    color: Option<String>,
    draggable: Option<bool>,
    resizable: Option<bool>,
}

impl RawEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn start(mut self, start: impl Into<TimeInput>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn end(mut self, end: impl Into<TimeInput>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = Some(draggable);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = Some(resizable);
        self
    }

    pub fn build(self) -> Result<RawEvent, EventValidationError> {
        let event = RawEvent {
            id: self.id.unwrap_or_default(),
            resource_id: self.resource_id.unwrap_or_default(),
            start: self.start.ok_or(EventValidationError::MissingStart)?,
            end: self.end.ok_or(EventValidationError::MissingEnd)?,
            title: self.title,
            color: self.color,
            draggable: self.draggable,
            resizable: self.resizable,
        };
        event.validate()?;
        Ok(event)
    }
}

/// An event after normalization against the visible range.
///
/// `start`/`end` are the parsed host times; `view_start`/`view_end` are the
/// clipped, granularity-aligned span that is actually drawn. The view span
/// always satisfies `view_start < view_end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub event: RawEvent,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub view_start: DateTime<Utc>,
    pub view_end: DateTime<Utc>,
}

impl NormalizedEvent {
    pub fn id(&self) -> &str {
        &self.event.id
    }

    pub fn resource_id(&self) -> &str {
        &self.event.resource_id
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}
