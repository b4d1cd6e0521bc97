//! Map abstract weekly cells onto the reference week and package the result.
//!
//! `start_hour_local` and `end_hour_local` are the **UTC** hour-of-day of the
//! window boundaries. Team members in different zones see the same numbers,
//! which is what lets a client compare one window against every member's
//! clock; converting to a member's own local hour is left to the client.

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::availability::{UserAvailability, WorkingSchedule};
use crate::rank::{minutes_to_hours, Ranking};
use crate::sweep::PartitionCell;
use crate::timezone::{format_utc_offset, ReferenceWeek};

/// One recurring window, pinned to its occurrence in the reference week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapWindow {
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub start_hour_local: u32,
    pub end_hour_local: u32,
    pub duration_hours: f64,
    pub participating_users: Vec<String>,
    pub day_of_week: u8,
}

impl OverlapWindow {
    /// Pin `cell` to the reference week. A cell ending past minute 10080
    /// ends on the Sunday after the reference week.
    pub fn from_cell(cell: &PartitionCell, week: &ReferenceWeek) -> Self {
        let start_utc = week.instant_at(cell.start);
        let end_utc = week.instant_at(cell.end);
        Self {
            start_utc,
            end_utc,
            start_hour_local: start_utc.hour(),
            end_hour_local: end_utc.hour(),
            duration_hours: minutes_to_hours(cell.duration_minutes()),
            participating_users: cell.participants.iter().cloned().collect(),
            day_of_week: cell.day_of_week(),
        }
    }
}

/// Display echo of one team member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTimezone {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub timezone: String,
    /// Offset in effect for the reference week (e.g., "-05:00").
    pub utc_offset: String,
    pub offset_minutes: i32,
    pub dst_active: bool,
    pub working_hours_start: u32,
    pub working_hours_end: u32,
    pub working_days: Vec<u8>,
}

impl UserTimezone {
    pub fn new(
        user: &UserAvailability,
        schedule: &WorkingSchedule,
        offset_minutes: i32,
        dst_active: bool,
    ) -> Self {
        Self {
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
            timezone: user.timezone.clone(),
            utc_offset: format_utc_offset(offset_minutes),
            offset_minutes,
            dst_active,
            working_hours_start: schedule.start_hour,
            working_hours_end: schedule.end_hour,
            working_days: schedule.days.iter().copied().collect(),
        }
    }
}

/// The complete answer to a "compute team overlap" request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamOverlapResult {
    pub user_timezones: Vec<UserTimezone>,
    pub overlap_windows: Vec<OverlapWindow>,
    pub best_meeting_times: Vec<OverlapWindow>,
    pub total_overlap_hours_per_week: f64,
    pub timezone_span_hours: u32,
}

/// Package a ranking into the wire result.
pub fn assemble(
    user_timezones: Vec<UserTimezone>,
    ranking: &Ranking,
    week: &ReferenceWeek,
) -> TeamOverlapResult {
    let to_windows = |cells: &[PartitionCell]| -> Vec<OverlapWindow> {
        cells
            .iter()
            .map(|cell| OverlapWindow::from_cell(cell, week))
            .collect()
    };

    TeamOverlapResult {
        user_timezones,
        overlap_windows: to_windows(ranking.overlap_windows.as_slice()),
        best_meeting_times: to_windows(ranking.best_meeting_times.as_slice()),
        total_overlap_hours_per_week: ranking.total_overlap_hours_per_week(),
        timezone_span_hours: ranking.timezone_span_hours,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week() -> ReferenceWeek {
        ReferenceWeek::containing(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()).unwrap()
    }

    fn cell(start: u32, end: u32, who: &[&str]) -> PartitionCell {
        PartitionCell {
            start,
            end,
            participants: who.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_window_from_monday_cell() {
        // Monday 14:00-17:00 UTC
        let monday = cell(1440 + 840, 1440 + 1020, &["b", "a"]);
        let window = OverlapWindow::from_cell(&monday, &week());
        assert_eq!(window.start_utc.to_rfc3339(), "2026-01-12T14:00:00+00:00");
        assert_eq!(window.end_utc.to_rfc3339(), "2026-01-12T17:00:00+00:00");
        assert_eq!(window.start_hour_local, 14);
        assert_eq!(window.end_hour_local, 17);
        assert_eq!(window.duration_hours, 3.0);
        assert_eq!(window.day_of_week, 1);
        assert_eq!(window.participating_users, vec!["a", "b"]);
    }

    #[test]
    fn test_window_ending_at_midnight_reads_hour_zero() {
        let midnight = cell(2 * 1440 + 1320, 3 * 1440, &["a", "b"]);
        let window = OverlapWindow::from_cell(&midnight, &week());
        assert_eq!(window.start_hour_local, 22);
        assert_eq!(window.end_hour_local, 0);
        assert_eq!(window.end_utc.to_rfc3339(), "2026-01-14T00:00:00+00:00");
    }

    #[test]
    fn test_window_across_week_end_lands_on_following_sunday() {
        // Saturday 17:00 UTC for 8 hours
        let saturday = cell(6 * 1440 + 1020, 7 * 1440 + 60, &["a", "b"]);
        let window = OverlapWindow::from_cell(&saturday, &week());
        assert_eq!(window.start_utc.to_rfc3339(), "2026-01-17T17:00:00+00:00");
        assert_eq!(window.end_utc.to_rfc3339(), "2026-01-18T01:00:00+00:00");
        assert_eq!(window.day_of_week, 6);
        assert_eq!(window.duration_hours, 8.0);
        assert_eq!((window.start_hour_local, window.end_hour_local), (17, 1));
    }

    #[test]
    fn test_window_with_half_hour_boundary() {
        let window = OverlapWindow::from_cell(&cell(1440 + 810, 1440 + 900, &["a", "b"]), &week());
        assert_eq!(window.start_hour_local, 13);
        assert_eq!(window.duration_hours, 1.5);
    }

    #[test]
    fn test_window_serializes_instants_as_rfc3339() {
        let window = OverlapWindow::from_cell(&cell(0, 60, &["a", "b"]), &week());
        let json = serde_json::to_value(&window).unwrap();
        assert_eq!(json["start_utc"], "2026-01-11T00:00:00Z");
        assert_eq!(json["day_of_week"], 0);
    }

    #[test]
    fn test_user_timezone_echo() {
        let user = UserAvailability::new("kim", "Asia/Kolkata", 10, 18, vec![5, 1, 1])
            .with_name("Kim")
            .with_avatar_url("https://example.com/kim.png");
        let schedule = user.validate().unwrap();
        let echo = UserTimezone::new(&user, &schedule, 330, false);
        assert_eq!(echo.utc_offset, "+05:30");
        assert_eq!(echo.working_days, vec![1, 5]);
        assert_eq!(echo.name.as_deref(), Some("Kim"));
    }
}
