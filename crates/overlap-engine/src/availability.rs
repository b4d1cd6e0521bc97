//! Per-user availability records and their validation.
//!
//! A [`UserAvailability`] is the raw record a roster provider hands over. It
//! is validated into a [`WorkingSchedule`] before any interval is built;
//! nothing downstream sees unvalidated hours, days, or timezone names.

use std::collections::BTreeSet;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};
use crate::timezone::{parse_timezone, MINUTES_PER_DAY};

/// One team member's recurring weekly availability, in local time.
///
/// Hours and weekday indices are signed so that out-of-range values reach
/// [`UserAvailability::validate`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAvailability {
    /// Opaque identifier, unique within a request.
    pub user_id: String,
    /// Display name, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar URL, echoed back untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// IANA timezone name (e.g., `"America/New_York"`).
    pub timezone: String,
    /// Local hour the working day starts, in `[0, 24)`.
    pub working_hours_start: i32,
    /// Local hour the working day ends, in `[0, 24)`. A value at or below
    /// the start wraps past local midnight; equal to the start means all day.
    pub working_hours_end: i32,
    /// Active weekdays, 0 = Sunday … 6 = Saturday.
    pub working_days: Vec<i32>,
}

impl UserAvailability {
    pub fn new(
        user_id: impl Into<String>,
        timezone: impl Into<String>,
        working_hours_start: i32,
        working_hours_end: i32,
        working_days: impl IntoIterator<Item = i32>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            avatar_url: None,
            timezone: timezone.into(),
            working_hours_start,
            working_hours_end,
            working_days: working_days.into_iter().collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Validate every field and produce the canonical [`WorkingSchedule`].
    ///
    /// # Errors
    ///
    /// - [`OverlapError::InvalidTimezone`] for an unknown IANA name
    /// - [`OverlapError::InvalidWorkingHours`] for a start or end outside `[0, 24)`
    /// - [`OverlapError::InvalidWorkingDays`] for an empty set or an index outside `[0, 6]`
    pub fn validate(&self) -> Result<WorkingSchedule> {
        let timezone = parse_timezone(&self.timezone)?;
        let start_hour =
            validate_hour(&self.user_id, "working_hours_start", self.working_hours_start)?;
        let end_hour =
            validate_hour(&self.user_id, "working_hours_end", self.working_hours_end)?;

        if self.working_days.is_empty() {
            return Err(OverlapError::InvalidWorkingDays(format!(
                "user '{}' has no working days",
                self.user_id
            )));
        }

        let mut days = BTreeSet::new();
        for &day in &self.working_days {
            let day = u8::try_from(day)
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| {
                    OverlapError::InvalidWorkingDays(format!(
                        "user '{}': weekday index {} is outside [0, 6]",
                        self.user_id, day
                    ))
                })?;
            days.insert(day);
        }

        Ok(WorkingSchedule {
            timezone,
            start_hour,
            end_hour,
            days,
        })
    }
}

fn validate_hour(user_id: &str, field: &str, hour: i32) -> Result<u32> {
    u32::try_from(hour)
        .ok()
        .filter(|h| *h < 24)
        .ok_or_else(|| {
            OverlapError::InvalidWorkingHours(format!(
                "user '{}': {} = {} is outside [0, 24)",
                user_id, field, hour
            ))
        })
}

// ── WorkingSchedule ─────────────────────────────────────────────────────────

/// A validated daily working window plus the weekdays it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSchedule {
    pub timezone: Tz,
    pub start_hour: u32,
    pub end_hour: u32,
    /// Deduplicated, ascending weekday indices.
    pub days: BTreeSet<u8>,
}

impl WorkingSchedule {
    /// A window whose start equals its end covers the whole day.
    pub fn is_all_day(&self) -> bool {
        self.start_hour == self.end_hour
    }

    /// Whether the window runs past local midnight into the next day.
    pub fn wraps_midnight(&self) -> bool {
        self.end_hour < self.start_hour
    }

    /// Working minutes contributed by one active day.
    pub fn daily_minutes(&self) -> u32 {
        if self.is_all_day() {
            MINUTES_PER_DAY
        } else if self.wraps_midnight() {
            (24 - self.start_hour + self.end_hour) * 60
        } else {
            (self.end_hour - self.start_hour) * 60
        }
    }

    /// Working minutes across the whole week.
    pub fn weekly_minutes(&self) -> u32 {
        self.daily_minutes() * self.days.len() as u32
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
