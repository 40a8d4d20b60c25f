//! Event normalization against the visible range.
//!
//! Raw host events are parsed, aligned to the view granularity and clipped
//! to the plan's range. Events that cannot be parsed or that fall entirely
//! outside the range are left out of the result; the host is not told.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::models::event::{NormalizedEvent, RawEvent};
use crate::models::ui::{TimeRange, ViewKind};
use crate::utils::date;

/// Normalize a snapshot of raw events for one render pass.
pub fn normalize_events(
    events: &[RawEvent],
    range: TimeRange,
    view: ViewKind,
    zone: Tz,
) -> Vec<NormalizedEvent> {
    let normalized: Vec<NormalizedEvent> = events
        .iter()
        .filter_map(|event| normalize_event(event, range, view, zone))
        .collect();

    if normalized.len() != events.len() {
        log::debug!(
            "Normalized {} of {} events for {} view",
            normalized.len(),
            events.len(),
            view.as_str()
        );
    }
    normalized
}

/// Normalize one event, or `None` if it is unparseable or out of range.
pub fn normalize_event(
    event: &RawEvent,
    range: TimeRange,
    view: ViewKind,
    zone: Tz,
) -> Option<NormalizedEvent> {
    let start = event.start.parse(zone)?;
    let end = event.end.parse(zone)?;
    let (view_start, view_end) = clip_interval(start, end, range, view, zone)?;
    Some(NormalizedEvent {
        event: event.clone(),
        start,
        end,
        view_start,
        view_end,
    })
}

/// Align `[start, end)` to the view granularity and clip it to `range`.
///
/// Outside day view both endpoints floor to local midnight. A span that
/// collapses (or was inverted) is extended by one minimal unit: one day, or
/// one minute in day view. Returns `None` when nothing is left after clipping
/// or the repair would leave the representable range.
pub fn clip_interval(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    range: TimeRange,
    view: ViewKind,
    zone: Tz,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (mut start, mut end) = if view.is_sub_day() {
        (start, end)
    } else {
        (date::start_of_day(start, zone), date::start_of_day(end, zone))
    };

    if end <= start {
        end = if view.is_sub_day() {
            start.checked_add_signed(Duration::minutes(1))?
        } else {
            date::checked_add_days(start, 1, zone)?
        };
    }

    start = start.clamp(range.start, range.end);
    end = end.clamp(range.start, range.end);

    (start < end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::TimeInput;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn june() -> TimeRange {
        TimeRange {
            start: utc(2024, 6, 1, 0, 0),
            end: utc(2024, 7, 1, 0, 0),
        }
    }

    #[test]
    fn test_month_view_floors_to_days() {
        let event = RawEvent::new("e1", "r1", "2024-06-05T10:00", "2024-06-07T15:00");
        let normalized = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        assert_eq!(normalized.view_start, utc(2024, 6, 5, 0, 0));
        assert_eq!(normalized.view_end, utc(2024, 6, 7, 0, 0));
        assert_eq!(normalized.start, utc(2024, 6, 5, 10, 0));
    }

    #[test]
    fn test_same_day_event_extends_one_day() {
        let event = RawEvent::new("e1", "r1", "2024-06-05T10:00", "2024-06-05T11:00");
        let normalized = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        assert_eq!(normalized.view_start, utc(2024, 6, 5, 0, 0));
        assert_eq!(normalized.view_end, utc(2024, 6, 6, 0, 0));
    }

    #[test]
    fn test_day_view_zero_length_extends_one_minute() {
        let range = TimeRange {
            start: utc(2024, 6, 5, 0, 0),
            end: utc(2024, 6, 6, 0, 0),
        };
        let event = RawEvent::new("e1", "r1", "2024-06-05T10:00", "2024-06-05T10:00");
        let normalized = normalize_event(&event, range, ViewKind::Day, Tz::UTC).unwrap();
        assert_eq!(normalized.view_start, utc(2024, 6, 5, 10, 0));
        assert_eq!(normalized.view_end, utc(2024, 6, 5, 10, 1));
    }

    #[test]
    fn test_clipped_to_range() {
        let event = RawEvent::new("e1", "r1", "2024-05-20", "2024-06-03");
        let normalized = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        assert_eq!(normalized.view_start, june().start);
        assert_eq!(normalized.view_end, utc(2024, 6, 3, 0, 0));

        let event = RawEvent::new("e2", "r1", "2024-06-28", "2024-07-10");
        let normalized = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        assert_eq!(normalized.view_end, june().end);
    }

    #[test]
    fn test_out_of_range_and_invalid_are_dropped() {
        let events = vec![
            RawEvent::new("before", "r1", "2024-05-01", "2024-05-10"),
            RawEvent::new("after", "r1", "2024-07-01", "2024-07-02"),
            RawEvent::new("garbage", "r1", "not a date", "2024-06-02"),
            RawEvent::new("ok", "r1", "2024-06-10", "2024-06-12"),
        ];
        let normalized = normalize_events(&events, june(), ViewKind::Month, Tz::UTC);
        let ids: Vec<&str> = normalized.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["ok"]);
    }

    #[test]
    fn test_floor_uses_view_zone() {
        let zone = chrono_tz::America::Los_Angeles;
        let range = TimeRange {
            start: utc(2024, 6, 1, 7, 0),
            end: utc(2024, 7, 1, 7, 0),
        };
        // 2024-06-10 03:00 UTC is still June 9 in Los Angeles.
        let event = RawEvent::new("e1", "r1", "2024-06-10T03:00:00Z", "2024-06-11T03:00:00Z");
        let normalized = normalize_event(&event, range, ViewKind::Month, zone).unwrap();
        assert_eq!(normalized.view_start, utc(2024, 6, 9, 7, 0));
        assert_eq!(normalized.view_end, utc(2024, 6, 10, 7, 0));
    }

    #[test]
    fn test_inverted_event_is_repaired() {
        let event = RawEvent::new("e1", "r1", "2024-06-10", "2024-06-08");
        let normalized = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        assert_eq!(normalized.view_start, utc(2024, 6, 10, 0, 0));
        assert_eq!(normalized.view_end, utc(2024, 6, 11, 0, 0));
    }

    #[test_case(ViewKind::Day ; "day view")]
    #[test_case(ViewKind::Month ; "month view")]
    fn test_event_at_end_of_time_is_dropped(view: ViewKind) {
        let last = TimeInput::Millis(DateTime::<Utc>::MAX_UTC.timestamp_millis());
        let mut event = RawEvent::new("edge", "r1", "2024-06-01", "2024-06-01");
        event.start = last.clone();
        event.end = last;
        let range = TimeRange {
            start: june().start,
            end: DateTime::<Utc>::MAX_UTC,
        };
        assert!(normalize_event(&event, range, view, Tz::UTC).is_none());
        assert!(normalize_events(&[event], june(), view, Tz::UTC).is_empty());
    }

    #[test]
    fn test_clipping_is_idempotent() {
        let event = RawEvent::new("e1", "r1", "2024-05-28T08:00", "2024-06-03T17:00");
        let first = normalize_event(&event, june(), ViewKind::Month, Tz::UTC).unwrap();
        let again = clip_interval(first.view_start, first.view_end, june(), ViewKind::Month, Tz::UTC);
        assert_eq!(again, Some((first.view_start, first.view_end)));
    }
}
