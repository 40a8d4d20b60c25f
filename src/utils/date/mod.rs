// Date utility functions
// Zone-aware calendar arithmetic used by slot planning and normalization.
//
// Every operation converts the instant into wall-clock parts in the target
// zone, does the arithmetic on those parts and resolves the result back to an
// instant. Nothing here relies on a fixed UTC offset, so results stay correct
// across daylight-saving transitions.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use chrono_tz::Tz;

/// ISO-8601 week number together with the week-numbering year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoWeekInfo {
    pub week: u32,
    pub week_year: i32,
}

/// Resolve a zone identifier, falling back to UTC for unknown names.
pub fn resolve_zone(name: &str) -> Tz {
    match Tz::from_str(name.trim()) {
        Ok(tz) => tz,
        Err(_) => {
            log::warn!("Unknown time zone '{}', falling back to UTC", name);
            Tz::UTC
        }
    }
}

/// Wall-clock date of `date` in `zone`.
pub fn local_date(date: DateTime<Utc>, zone: Tz) -> NaiveDate {
    date.with_timezone(&zone).date_naive()
}

/// Wall-clock date and time of `date` in `zone`.
pub fn local_datetime(date: DateTime<Utc>, zone: Tz) -> NaiveDateTime {
    date.with_timezone(&zone).naive_local()
}

/// Resolve a wall-clock time in `zone` to an instant.
///
/// Ambiguous times (clocks set back) resolve to the earlier instant. Times that
/// fall into a gap (clocks set forward) are pushed forward in 15 minute steps
/// until they exist, which lands on the first valid instant after the gap for
/// every real-world zone.
pub fn from_local(zone: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..16 {
        match zone.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => match candidate.checked_add_signed(Duration::minutes(15)) {
                Some(next) => candidate = next,
                None => break,
            },
        }
    }
    // Only reached at the edge of the representable range.
    Utc.from_utc_datetime(&naive)
}

/// Midnight of `date` in `zone`.
pub fn midnight(zone: Tz, date: NaiveDate) -> DateTime<Utc> {
    from_local(zone, date.and_time(NaiveTime::MIN))
}

pub fn start_of_day(date: DateTime<Utc>, zone: Tz) -> DateTime<Utc> {
    midnight(zone, local_date(date, zone))
}

/// Start of the week containing `date`.
///
/// # Arguments
/// * `week_starts_on` - 0 = Sunday, 1 = Monday, ... 6 = Saturday (values above 6 wrap)
pub fn start_of_week(date: DateTime<Utc>, zone: Tz, week_starts_on: u8) -> DateTime<Utc> {
    let day = local_date(date, zone);
    midnight(zone, week_start_date(day, week_starts_on))
}

/// Calendar date of the first day of the week containing `date`.
pub fn week_start_date(date: NaiveDate, week_starts_on: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - (week_starts_on % 7) as i64 + 7) % 7;
    date.checked_sub_signed(Duration::days(offset)).unwrap_or(date)
}

pub fn start_of_month(date: DateTime<Utc>, zone: Tz) -> DateTime<Utc> {
    let day = local_date(date, zone);
    let first = day.with_day(1).unwrap_or(day);
    midnight(zone, first)
}

pub fn start_of_year(date: DateTime<Utc>, zone: Tz) -> DateTime<Utc> {
    let day = local_date(date, zone);
    let first = NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day);
    midnight(zone, first)
}

/// Shift by `n` calendar days, keeping the wall-clock time of day.
/// Saturates at the representable range.
pub fn add_days(date: DateTime<Utc>, n: i64, zone: Tz) -> DateTime<Utc> {
    checked_add_days(date, n, zone).unwrap_or(if n < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Like [`add_days`], but `None` when the result is out of range.
pub fn checked_add_days(date: DateTime<Utc>, n: i64, zone: Tz) -> Option<DateTime<Utc>> {
    let local = local_datetime(date, zone);
    let shifted = local.checked_add_signed(Duration::try_days(n)?)?;
    Some(from_local(zone, shifted))
}

/// Shift by `n` calendar months, clamping the day of month to the target
/// month's length (Jan 31 + 1 month is the last day of February).
pub fn add_months(date: DateTime<Utc>, n: i32, zone: Tz) -> DateTime<Utc> {
    let local = local_datetime(date, zone);
    let shifted = shift_months(local.date(), n);
    from_local(zone, shifted.and_time(local.time()))
}

/// Shift by `n` calendar years; Feb 29 lands on Feb 28 in non-leap years.
pub fn add_years(date: DateTime<Utc>, n: i32, zone: Tz) -> DateTime<Utc> {
    add_months(date, n.saturating_mul(12), zone)
}

pub fn iso_week_info(date: DateTime<Utc>, zone: Tz) -> IsoWeekInfo {
    let week = local_date(date, zone).iso_week();
    IsoWeekInfo {
        week: week.week(),
        week_year: week.year(),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

fn shift_months(date: NaiveDate, n: i32) -> NaiveDate {
    let total = date.year() as i64 * 12 + date.month0() as i64 + n as i64;
    let year = total.div_euclid(12) as i32;
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_unknown_zone_falls_back_to_utc() {
        assert_eq!(resolve_zone("Mars/Olympus_Mons"), Tz::UTC);
        assert_eq!(resolve_zone("Europe/Berlin"), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_start_of_day_in_zone() {
        // 2024-03-10 03:30 UTC is still 2024-03-09 in New York.
        let zone = chrono_tz::America::New_York;
        let start = start_of_day(utc(2024, 3, 10, 3, 30), zone);
        assert_eq!(start, utc(2024, 3, 9, 5, 0));
    }

    #[test]
    fn test_start_of_day_on_spring_forward_day() {
        let zone = chrono_tz::America::New_York;
        // Midday on the DST switch day; midnight is still EST (UTC-5).
        let start = start_of_day(utc(2024, 3, 10, 16, 0), zone);
        assert_eq!(start, utc(2024, 3, 10, 5, 0));
        let next = add_days(start, 1, zone);
        // Next midnight is EDT (UTC-4): only 23 hours later.
        assert_eq!(next, utc(2024, 3, 11, 4, 0));
    }

    #[test]
    fn test_gap_time_moves_forward() {
        let zone = chrono_tz::America::New_York;
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        // 02:30 does not exist; first valid wall time is 03:00 EDT.
        assert_eq!(from_local(zone, naive), utc(2024, 3, 10, 7, 0));
    }

    #[test_case(0, 2024, 6, 9 ; "sunday start")]
    #[test_case(1, 2024, 6, 10 ; "monday start")]
    #[test_case(6, 2024, 6, 15 ; "saturday start")]
    fn test_week_start_date(week_starts_on: u8, y: i32, m: u32, d: u32) {
        // 2024-06-15 is a Saturday.
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(
            week_start_date(date, week_starts_on),
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        );
    }

    #[test]
    fn test_start_of_month_and_year() {
        let zone = Tz::UTC;
        let date = utc(2024, 8, 17, 13, 45);
        assert_eq!(start_of_month(date, zone), utc(2024, 8, 1, 0, 0));
        assert_eq!(start_of_year(date, zone), utc(2024, 1, 1, 0, 0));
    }

    #[test_case(2024, 2, 29 ; "leap year clamps to 29th")]
    #[test_case(2023, 2, 28 ; "common year clamps to 28th")]
    fn test_add_months_clamps_day(year: i32, month: u32, day: u32) {
        let jan_31 = utc(year, 1, 31, 0, 0);
        assert_eq!(add_months(jan_31, 1, Tz::UTC), utc(year, month, day, 0, 0));
    }

    #[test]
    fn test_add_months_negative_and_across_years() {
        assert_eq!(add_months(utc(2024, 3, 31, 9, 0), -1, Tz::UTC), utc(2024, 2, 29, 9, 0));
        assert_eq!(add_months(utc(2024, 11, 15, 0, 0), 3, Tz::UTC), utc(2025, 2, 15, 0, 0));
        assert_eq!(add_months(utc(2024, 1, 15, 0, 0), -13, Tz::UTC), utc(2022, 12, 15, 0, 0));
    }

    #[test]
    fn test_add_years_from_leap_day() {
        assert_eq!(add_years(utc(2024, 2, 29, 0, 0), 1, Tz::UTC), utc(2025, 2, 28, 0, 0));
    }

    #[test]
    fn test_day_shift_at_range_edge() {
        let last = start_of_day(DateTime::<Utc>::MAX_UTC, Tz::UTC);
        assert_eq!(checked_add_days(last, 1, Tz::UTC), None);
        assert_eq!(add_days(last, 1, Tz::UTC), DateTime::<Utc>::MAX_UTC);
        assert_eq!(checked_add_days(last, -1, Tz::UTC), Some(last - Duration::days(1)));
        assert_eq!(checked_add_days(last, i64::MAX, Tz::UTC), None);
    }

    #[test]
    fn test_iso_week_info_year_boundary() {
        // 2021-01-01 belongs to ISO week 53 of 2020.
        let info = iso_week_info(utc(2021, 1, 1, 12, 0), Tz::UTC);
        assert_eq!(info, IsoWeekInfo { week: 53, week_year: 2020 });
        // 2024-12-30 belongs to ISO week 1 of 2025.
        let info = iso_week_info(utc(2024, 12, 30, 12, 0), Tz::UTC);
        assert_eq!(info, IsoWeekInfo { week: 1, week_year: 2025 });
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }
}
