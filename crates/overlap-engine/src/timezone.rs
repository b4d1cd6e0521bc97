//! Timezone resolution against an injected reference week.
//!
//! Nothing here reads the system clock. The caller supplies a
//! [`ReferenceWeek`], and every UTC offset for a computation is resolved
//! against that week, so results are reproducible and testable.
//!
//! # Known limitation
//!
//! A user's offset is resolved once per computation, at the reference week's
//! [`ReferenceWeek::resolution_date`]. If a DST transition falls inside the
//! reference week, the days on the other side of the transition are off by
//! the DST delta for that user.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{OverlapError, Result};

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 1_440;

/// Minutes in one week; the length of the weekly-minute axis.
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

// ── ReferenceWeek ───────────────────────────────────────────────────────────

/// The concrete calendar week a computation is anchored to.
///
/// Minute 0 of the weekly axis is Sunday 00:00 UTC of this week, matching the
/// weekday indexing used throughout the crate (0 = Sunday … 6 = Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceWeek {
    start: NaiveDate,
}

/// Days past the week start that must stay representable. A window joined
/// across the week end can reach up to one more week.
const REPRESENTABLE_DAYS: u64 = 14;

impl ReferenceWeek {
    /// The week (Sunday through Saturday) that contains `date`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlapError::InvalidReferenceWeek`] when the week, or the
    /// week after it, falls outside the calendar range chrono can represent.
    pub fn containing(date: NaiveDate) -> Result<Self> {
        let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
        date.checked_sub_days(back)
            .filter(|start| start.checked_add_days(Days::new(REPRESENTABLE_DAYS)).is_some())
            .map(|start| Self { start })
            .ok_or_else(|| {
                OverlapError::InvalidReferenceWeek(format!("{date} is outside the supported range"))
            })
    }

    /// The Sunday that opens this week.
    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    /// Sunday 00:00 UTC of this week.
    pub fn start_utc(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// The date offsets are resolved at (the Wednesday of the week).
    pub fn resolution_date(&self) -> NaiveDate {
        self.start.checked_add_days(Days::new(3)).unwrap_or(self.start)
    }

    /// The concrete instant at `minute_of_week` minutes past the week start.
    ///
    /// Saturates at the end of chrono's range for minutes beyond two weeks.
    pub fn instant_at(&self, minute_of_week: u32) -> DateTime<Utc> {
        self.start_utc()
            .checked_add_signed(Duration::minutes(i64::from(minute_of_week)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ── resolve_offset_minutes ──────────────────────────────────────────────────

/// Resolve an IANA timezone to its UTC offset in minutes on `reference_date`.
///
/// The offset is taken at 12:00 UTC on the reference date, which keeps the
/// answer well away from the early-morning local times at which DST
/// transitions happen in most zones.
///
/// # Errors
///
/// Returns [`OverlapError::InvalidTimezone`] if the name is not a known IANA
/// timezone.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use overlap_engine::timezone::resolve_offset_minutes;
///
/// let winter = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
/// assert_eq!(resolve_offset_minutes("America/New_York", winter).unwrap(), -300);
/// assert_eq!(resolve_offset_minutes("Asia/Kolkata", winter).unwrap(), 330);
/// ```
pub fn resolve_offset_minutes(timezone: &str, reference_date: NaiveDate) -> Result<i32> {
    let tz = parse_timezone(timezone)?;
    Ok(offset_on(&tz, reference_date))
}

/// Whether DST is in effect for `timezone` on `reference_date`.
///
/// DST is considered active when the offset on the reference date is larger
/// than the smaller of the January and July offsets for that year, which
/// works for both hemispheres.
pub fn is_dst_active(timezone: &str, reference_date: NaiveDate) -> Result<bool> {
    let tz = parse_timezone(timezone)?;
    Ok(dst_active_on(&tz, reference_date))
}

/// Format an offset in minutes as a string (e.g., "-05:00", "+05:30").
pub fn format_utc_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes >= 0 { "+" } else { "-" };
    let abs = offset_minutes.unsigned_abs();
    let hours = abs / 60;
    let minutes = abs % 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| OverlapError::InvalidTimezone(format!("'{}'", s)))
}

/// Offset of an already-parsed zone on `date`, in minutes.
pub(crate) fn offset_on(tz: &Tz, date: NaiveDate) -> i32 {
    offset_minutes_at(tz, reference_instant(date))
}

pub(crate) fn dst_active_on(tz: &Tz, date: NaiveDate) -> bool {
    let year = date.year();
    let standard = [(1, 1), (7, 1)]
        .into_iter()
        .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
        .map(|d| offset_on(tz, d))
        .min()
        .unwrap_or(0);

    offset_on(tz, date) > standard
}

fn reference_instant(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(date.and_time(NaiveTime::MIN) + Duration::hours(12)))
}

fn offset_minutes_at(tz: &Tz, instant: DateTime<Utc>) -> i32 {
    instant.with_timezone(tz).offset().fix().local_minus_utc() / 60
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── ReferenceWeek tests ─────────────────────────────────────────────

    #[test]
    fn test_week_containing_midweek_date_starts_on_sunday() {
        // Wed Jan 14 2026 → week starts Sun Jan 11
        let week = ReferenceWeek::containing(date(2026, 1, 14)).unwrap();
        assert_eq!(week.start_date(), date(2026, 1, 11));
        assert_eq!(week.resolution_date(), date(2026, 1, 14));
    }

    #[test]
    fn test_week_containing_sunday_is_that_sunday() {
        let week = ReferenceWeek::containing(date(2026, 1, 11)).unwrap();
        assert_eq!(week.start_date(), date(2026, 1, 11));
    }

    #[test]
    fn test_week_containing_saturday_rolls_back_six_days() {
        let week = ReferenceWeek::containing(date(2026, 1, 17)).unwrap();
        assert_eq!(week.start_date(), date(2026, 1, 11));
    }

    #[test]
    fn test_instant_at_maps_week_minutes() {
        let week = ReferenceWeek::containing(date(2026, 1, 14)).unwrap();
        // Monday 14:00 UTC = 1440 + 840
        let instant = week.instant_at(MINUTES_PER_DAY + 14 * 60);
        assert_eq!(instant.to_rfc3339(), "2026-01-12T14:00:00+00:00");
        assert_eq!(
            week.instant_at(MINUTES_PER_WEEK).to_rfc3339(),
            "2026-01-18T00:00:00+00:00"
        );
    }

    #[test]
    fn test_week_at_end_of_calendar_range_is_rejected() {
        let err = ReferenceWeek::containing(NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, OverlapError::InvalidReferenceWeek(_)), "got: {err}");

        let near_end = NaiveDate::MAX.checked_sub_days(Days::new(5)).unwrap();
        assert!(ReferenceWeek::containing(near_end).is_err());
    }

    #[test]
    fn test_week_far_from_range_edges_is_accepted() {
        let early = ReferenceWeek::containing(date(1, 1, 3)).unwrap();
        assert_eq!(early.start_date().weekday(), chrono::Weekday::Sun);
    }

    // ── resolve_offset_minutes tests ────────────────────────────────────

    #[test]
    fn test_resolve_new_york_winter_and_summer() {
        assert_eq!(
            resolve_offset_minutes("America/New_York", date(2026, 1, 14)).unwrap(),
            -300
        );
        assert_eq!(
            resolve_offset_minutes("America/New_York", date(2026, 7, 15)).unwrap(),
            -240
        );
    }

    #[test]
    fn test_resolve_half_and_quarter_hour_zones() {
        assert_eq!(
            resolve_offset_minutes("Asia/Kolkata", date(2026, 1, 14)).unwrap(),
            330
        );
        assert_eq!(
            resolve_offset_minutes("Asia/Kathmandu", date(2026, 1, 14)).unwrap(),
            345
        );
    }

    #[test]
    fn test_resolve_utc() {
        assert_eq!(resolve_offset_minutes("UTC", date(2026, 1, 14)).unwrap(), 0);
    }

    #[test]
    fn test_resolve_invalid_timezone_returns_error() {
        let result = resolve_offset_minutes("Invalid/Zone", date(2026, 1, 14));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    // ── is_dst_active tests ─────────────────────────────────────────────

    #[test]
    fn test_dst_active_northern_hemisphere() {
        assert!(is_dst_active("America/New_York", date(2026, 7, 15)).unwrap());
        assert!(!is_dst_active("America/New_York", date(2026, 12, 15)).unwrap());
    }

    #[test]
    fn test_dst_active_southern_hemisphere() {
        // Sydney observes DST in the southern summer
        assert!(is_dst_active("Australia/Sydney", date(2026, 1, 14)).unwrap());
        assert!(!is_dst_active("Australia/Sydney", date(2026, 7, 15)).unwrap());
    }

    #[test]
    fn test_dst_never_active_in_tokyo() {
        assert!(!is_dst_active("Asia/Tokyo", date(2026, 7, 15)).unwrap());
    }

    // ── format_utc_offset tests ─────────────────────────────────────────

    #[test]
    fn test_format_utc_offset() {
        assert_eq!(format_utc_offset(-300), "-05:00");
        assert_eq!(format_utc_offset(0), "+00:00");
        assert_eq!(format_utc_offset(330), "+05:30");
        assert_eq!(format_utc_offset(-570), "-09:30");
    }
}
