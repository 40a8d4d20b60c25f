//! Slot planning for every timeline view.
//!
//! A plan is the ordered list of slot start instants plus the overall visible
//! range. Slot starts are strictly increasing and the range end is a synthetic
//! boundary after the last slot start.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::models::settings::{DayRangeMode, TimelineConfig};
use crate::models::ui::{TimeRange, ViewKind};
use crate::utils::date;

/// Upper bound on generated day-view slots.
pub const MAX_DAY_SLOTS: usize = 2000;
/// Upper bound on generated week/sprint slots.
pub const MAX_WEEK_SLOTS: usize = 60;
/// Upper bound on generated month slots.
pub const MAX_MONTH_SLOTS: usize = 62;

/// One header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub is_today: bool,
    pub is_weekend: bool,
    pub label: String,
}

/// Output of slot planning.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPlan {
    pub view: ViewKind,
    pub zone: Tz,
    pub range: TimeRange,
    pub slot_starts: Vec<DateTime<Utc>>,
    pub slots: Vec<Slot>,
    /// Set when the iteration cap cut the plan short.
    pub truncated: bool,
}

impl SlotPlan {
    pub fn len(&self) -> usize {
        self.slot_starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_starts.is_empty()
    }

    /// Boundary `i` for `i` in `0..=len()`: slot starts followed by the range end.
    pub fn boundary(&self, i: usize) -> DateTime<Utc> {
        self.slot_starts.get(i).copied().unwrap_or(self.range.end)
    }

    /// Exclusive end of slot `idx`.
    pub fn slot_end(&self, idx: usize) -> DateTime<Utc> {
        self.boundary(idx + 1)
    }

    /// Index of the slot containing `instant` (clamped into the plan).
    pub fn start_index(&self, instant: DateTime<Utc>) -> usize {
        let after = self.slot_starts.partition_point(|s| *s <= instant);
        after.saturating_sub(1).min(self.len().saturating_sub(1))
    }

    /// Number of slots starting before `instant`, i.e. the exclusive end index
    /// of a span ending at `instant`.
    pub fn end_index(&self, instant: DateTime<Utc>) -> usize {
        self.slot_starts.partition_point(|s| *s < instant)
    }

    /// Half-open slot-index interval covered by `[start, end)`; never empty
    /// unless the plan has no slots.
    pub fn slot_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> (usize, usize) {
        if self.is_empty() {
            return (0, 0);
        }
        let start_idx = self.start_index(start);
        let end_idx = self.end_index(end).clamp(start_idx + 1, self.len());
        (start_idx, end_idx)
    }

    /// Smallest duration an event may shrink to in this view.
    pub fn min_unit(&self) -> Duration {
        if self.view.is_sub_day() {
            Duration::minutes(1)
        } else {
            Duration::days(1)
        }
    }
}

/// Builds slot plans from a resolved configuration.
pub struct SlotPlanner<'a> {
    config: &'a TimelineConfig,
    zone: Tz,
}

impl<'a> SlotPlanner<'a> {
    pub fn new(config: &'a TimelineConfig) -> Self {
        Self {
            config,
            zone: date::resolve_zone(&config.time_zone),
        }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Plan the slots around `anchor`; `now` only drives the today flags.
    pub fn plan(&self, anchor: DateTime<Utc>, now: DateTime<Utc>) -> SlotPlan {
        let view = self.config.view;
        let (range_start, range_end, slot_starts, truncated) = match view {
            ViewKind::Month => {
                let start = date::start_of_month(anchor, self.zone);
                let end = date::add_months(start, 1, self.zone);
                self.step_days(start, end, 1, MAX_MONTH_SLOTS)
            }
            ViewKind::Week => {
                let start = date::start_of_week(anchor, self.zone, self.config.week_starts_on);
                let end = date::add_days(start, 7, self.zone);
                self.step_days(start, end, 1, MAX_WEEK_SLOTS)
            }
            ViewKind::Day => self.day_slots(anchor),
            ViewKind::Sprint => {
                let year = date::local_date(anchor, self.zone).year();
                let jan_1 = NaiveDate::from_ymd_opt(year, 1, 1);
                let dec_31 = NaiveDate::from_ymd_opt(year, 12, 31);
                match (jan_1, dec_31) {
                    (Some(first), Some(last)) => {
                        let start = date::midnight(self.zone, date::week_start_date(first, 1));
                        let end = date::midnight(
                            self.zone,
                            date::week_start_date(last, 1) + Duration::days(7),
                        );
                        self.step_days(start, end, 7, MAX_WEEK_SLOTS)
                    }
                    _ => {
                        let start = date::start_of_week(anchor, self.zone, 1);
                        self.step_days(start, date::add_days(start, 7, self.zone), 7, MAX_WEEK_SLOTS)
                    }
                }
            }
        };

        if truncated {
            log::warn!(
                "{} view slot generation hit its cap at {} slots; check the view configuration",
                view.as_str(),
                slot_starts.len()
            );
        }

        let today = date::local_date(now, self.zone);
        let slots = slot_starts
            .iter()
            .map(|start| self.describe_slot(*start, today))
            .collect();

        log::debug!(
            "Planned {} {} slots from {} to {}",
            slot_starts.len(),
            view.as_str(),
            range_start,
            range_end
        );

        SlotPlan {
            view,
            zone: self.zone,
            range: TimeRange {
                start: range_start,
                end: range_end,
            },
            slot_starts,
            slots,
            truncated,
        }
    }

    /// Anchor one navigation step away (month, week, day or year).
    pub fn step_anchor(&self, anchor: DateTime<Utc>, steps: i32) -> DateTime<Utc> {
        match self.config.view {
            ViewKind::Month => date::add_months(anchor, steps, self.zone),
            ViewKind::Week => date::add_days(anchor, 7 * steps as i64, self.zone),
            ViewKind::Day => date::add_days(anchor, steps as i64, self.zone),
            ViewKind::Sprint => date::add_years(anchor, steps, self.zone),
        }
    }

    fn step_days(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        days: i64,
        cap: usize,
    ) -> (DateTime<Utc>, DateTime<Utc>, Vec<DateTime<Utc>>, bool) {
        let mut starts = Vec::new();
        let mut cursor = start;
        while cursor < end {
            if starts.len() >= cap {
                return (start, cursor, starts, true);
            }
            starts.push(cursor);
            let next = date::add_days(cursor, days, self.zone);
            if next <= cursor {
                // Calendar arithmetic failed to advance; stop instead of spinning.
                return (start, cursor + Duration::days(days.max(1)), starts, true);
            }
            cursor = next;
        }
        (start, end.max(cursor), starts, false)
    }

    fn day_slots(&self, anchor: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>, Vec<DateTime<Utc>>, bool) {
        let day = date::local_date(anchor, self.zone);
        let day_start = date::midnight(self.zone, day);
        let next_day = date::add_days(day_start, 1, self.zone);

        let (start, end) = match self.config.day_range_mode {
            DayRangeMode::Full => (day_start, next_day),
            DayRangeMode::Work => {
                let hours = self.config.work_hours;
                let start = self.at_hour(day, hours.start_hour).unwrap_or(day_start);
                let end = if hours.end_hour >= 24 {
                    next_day
                } else {
                    self.at_hour(day, hours.end_hour).unwrap_or(next_day)
                };
                if end > start {
                    (start, end)
                } else {
                    (day_start, next_day)
                }
            }
        };

        let step = Duration::minutes(self.config.day_slot_minutes.clamp(
            crate::models::settings::MIN_DAY_SLOT_MINUTES,
            crate::models::settings::MAX_DAY_SLOT_MINUTES,
        ) as i64);

        let mut starts = Vec::new();
        let mut cursor = start;
        while cursor < end {
            if starts.len() >= MAX_DAY_SLOTS {
                return (start, cursor, starts, true);
            }
            starts.push(cursor);
            cursor += step;
        }
        (start, end, starts, false)
    }

    fn at_hour(&self, day: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
        day.and_hms_opt(hour, 0, 0)
            .map(|naive| date::from_local(self.zone, naive))
    }

    fn describe_slot(&self, start: DateTime<Utc>, today: NaiveDate) -> Slot {
        let local = date::local_datetime(start, self.zone);
        let local_day = local.date();
        let labels = &self.config.labels;

        let (is_today, is_weekend, label) = match self.config.view {
            ViewKind::Month => (
                local_day == today,
                is_weekend(local_day),
                format_label(local, &labels.month, "%-d"),
            ),
            ViewKind::Week => (
                local_day == today,
                is_weekend(local_day),
                format_label(local, &labels.week, "%a %-d"),
            ),
            ViewKind::Day => (
                local_day == today,
                is_weekend(local_day),
                format_label(local, &labels.day, "%H:%M"),
            ),
            ViewKind::Sprint => {
                let week = local_day.iso_week().week();
                let in_week = local_day <= today && today < local_day + Duration::days(7);
                let label = self
                    .config
                    .sprint_definitions
                    .iter()
                    .find(|sprint| sprint.covers(week))
                    .map(|sprint| sprint.name.clone())
                    .unwrap_or_else(|| format!("W{:02}", week));
                (in_week, false, label)
            }
        };

        Slot {
            start,
            is_today,
            is_weekend,
            label,
        }
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Format with a user-supplied strftime string, falling back when the
/// string contains an invalid specifier.
fn format_label(local: NaiveDateTime, format: &str, fallback: &str) -> String {
    let mut label = String::new();
    if write!(label, "{}", local.format(format)).is_ok() {
        return label;
    }
    label.clear();
    let _ = write!(label, "{}", local.format(fallback));
    label
}
