//! The team-overlap pipeline.
//!
//! [`compute_team_overlap`] is the one entry point most callers need. It
//! validates the whole roster up front, then runs the stages in order:
//! window building, the sweep, ranking, and response assembly. It is a pure
//! function of its inputs and the injected [`ReferenceWeek`]; nothing is
//! cached or shared between calls.

use std::collections::{BTreeMap, HashSet};

use crate::availability::{UserAvailability, WorkingSchedule};
use crate::error::{OverlapError, Result};
use crate::rank::{rank, TotalOverlapMode, DEFAULT_BEST_MEETING_LIMIT};
use crate::response::{assemble, TeamOverlapResult, UserTimezone};
use crate::roster::{RosterProvider, TeamSelector};
use crate::sweep::intersect;
use crate::timezone::{dst_active_on, offset_on, ReferenceWeek};
use crate::window::build_with_offset;

/// Configuration for one overlap computation.
///
/// There is no `Default`: the reference week must come from the caller so
/// that results never depend on when they were computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapOptions {
    /// Week used for DST resolution and for pinning windows to instants.
    pub reference_week: ReferenceWeek,
    /// Maximum number of best meeting times returned.
    pub best_meeting_limit: usize,
    /// Which cells feed `total_overlap_hours_per_week`.
    pub total_overlap_mode: TotalOverlapMode,
}

impl OverlapOptions {
    pub fn new(reference_week: ReferenceWeek) -> Self {
        Self {
            reference_week,
            best_meeting_limit: DEFAULT_BEST_MEETING_LIMIT,
            total_overlap_mode: TotalOverlapMode::default(),
        }
    }

    pub fn with_best_meeting_limit(mut self, limit: usize) -> Self {
        self.best_meeting_limit = limit;
        self
    }

    pub fn with_total_overlap_mode(mut self, mode: TotalOverlapMode) -> Self {
        self.total_overlap_mode = mode;
        self
    }
}

/// Compute the recurring weekly overlap for a team.
///
/// # Errors
///
/// - [`OverlapError::InsufficientUsers`] for fewer than two users
/// - [`OverlapError::DuplicateUser`] if a `user_id` repeats
/// - any validation error from [`UserAvailability::validate`]
///
/// Validation covers every record before any interval is built; one bad
/// record rejects the whole request.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use overlap_engine::{compute_team_overlap, OverlapOptions, ReferenceWeek, UserAvailability};
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
/// let week = ReferenceWeek::containing(date).unwrap();
/// let team = vec![
///     UserAvailability::new("ana", "America/New_York", 9, 17, vec![1, 2, 3, 4, 5]),
///     UserAvailability::new("ben", "Europe/London", 9, 17, vec![1, 2, 3, 4, 5]),
/// ];
///
/// let result = compute_team_overlap(&team, &OverlapOptions::new(week)).unwrap();
/// assert_eq!(result.total_overlap_hours_per_week, 15.0);
/// assert_eq!(result.timezone_span_hours, 5);
/// ```
pub fn compute_team_overlap(
    users: &[UserAvailability],
    options: &OverlapOptions,
) -> Result<TeamOverlapResult> {
    let _span = tracing::debug_span!("compute_team_overlap", users = users.len()).entered();

    if users.len() < 2 {
        return Err(OverlapError::InsufficientUsers(users.len()));
    }
    let schedules = validate_roster(users)?;

    let week = &options.reference_week;
    let resolution_date = week.resolution_date();

    let mut per_user = BTreeMap::new();
    let mut offsets = Vec::with_capacity(users.len());
    let mut user_timezones = Vec::with_capacity(users.len());

    for (user, schedule) in users.iter().zip(&schedules) {
        let offset = offset_on(&schedule.timezone, resolution_date);
        let intervals = build_with_offset(schedule, offset);
        tracing::debug!(
            user_id = %user.user_id,
            offset_minutes = offset,
            intervals = intervals.len(),
            "built weekly intervals"
        );

        per_user.insert(user.user_id.clone(), intervals);
        offsets.push(offset);
        user_timezones.push(UserTimezone::new(
            user,
            schedule,
            offset,
            dst_active_on(&schedule.timezone, resolution_date),
        ));
    }

    let cells = intersect(&per_user);
    let ranking = rank(&cells, users.len(), &offsets, options)?;
    tracing::debug!(
        overlap_windows = ranking.overlap_windows.len(),
        best_meeting_times = ranking.best_meeting_times.len(),
        total_overlap_minutes = ranking.total_overlap_minutes,
        "ranked overlap"
    );

    Ok(assemble(user_timezones, &ranking, week))
}

/// Resolve a team through `provider`, then compute its overlap.
///
/// Roster failures are propagated as-is and never retried.
pub fn compute_for_team<P>(
    provider: &P,
    selector: &TeamSelector,
    options: &OverlapOptions,
) -> Result<TeamOverlapResult>
where
    P: RosterProvider + ?Sized,
{
    let users = provider.resolve(selector)?;
    compute_team_overlap(&users, options)
}

fn validate_roster(users: &[UserAvailability]) -> Result<Vec<WorkingSchedule>> {
    let mut seen = HashSet::with_capacity(users.len());
    users
        .iter()
        .map(|user| {
            if !seen.insert(user.user_id.as_str()) {
                return Err(OverlapError::DuplicateUser(user.user_id.clone()));
            }
            user.validate()
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
