//! Rank partition cells into meeting windows and aggregate statistics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{OverlapError, Result};
use crate::overlap::OverlapOptions;
use crate::sweep::{wrap_week, PartitionCell};

/// How many best meeting times are returned unless configured otherwise.
pub const DEFAULT_BEST_MEETING_LIMIT: usize = 5;

/// Which cells count towards `total_overlap_hours_per_week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalOverlapMode {
    /// Only time when the whole team is available.
    #[default]
    FullTeam,
    /// Any time when at least two members are available.
    AnyPair,
}

/// Windows selected from a partition, plus the weekly aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// Every window with two or more participants, in week order.
    pub overlap_windows: Vec<PartitionCell>,
    /// Full-team windows, best first, truncated to the configured limit.
    pub best_meeting_times: Vec<PartitionCell>,
    pub total_overlap_minutes: u32,
    pub timezone_span_hours: u32,
}

impl Ranking {
    pub fn total_overlap_hours_per_week(&self) -> f64 {
        minutes_to_hours(self.total_overlap_minutes)
    }
}

/// Select overlap windows, rank the best meeting times, and aggregate.
///
/// The week is treated as circular (see [`wrap_week`]), so a window running
/// from Saturday night into Sunday morning is ranked as one window.
/// Best meeting times are the full-team windows ordered by duration
/// (longest first), then participant count, then weekday, then start time.
///
/// # Errors
///
/// Returns [`OverlapError::InsufficientUsers`] when `total_users < 2`.
pub fn rank(
    cells: &[PartitionCell],
    total_users: usize,
    offsets: &[i32],
    options: &OverlapOptions,
) -> Result<Ranking> {
    if total_users < 2 {
        return Err(OverlapError::InsufficientUsers(total_users));
    }

    let overlap_windows: Vec<PartitionCell> = wrap_week(cells)
        .into_iter()
        .filter(|cell| cell.participant_count() >= 2)
        .collect();

    let full_team: Vec<&PartitionCell> = overlap_windows
        .iter()
        .filter(|cell| cell.participant_count() == total_users)
        .collect();

    let total_overlap_minutes: u32 = match options.total_overlap_mode {
        TotalOverlapMode::FullTeam => full_team.iter().map(|cell| cell.duration_minutes()).sum(),
        TotalOverlapMode::AnyPair => overlap_windows
            .iter()
            .map(PartitionCell::duration_minutes)
            .sum(),
    };

    let mut best_meeting_times: Vec<PartitionCell> = full_team.into_iter().cloned().collect();
    best_meeting_times.sort_by(compare_meeting_windows);
    best_meeting_times.truncate(options.best_meeting_limit);

    Ok(Ranking {
        overlap_windows,
        best_meeting_times,
        total_overlap_minutes,
        timezone_span_hours: timezone_span_hours(offsets),
    })
}

fn compare_meeting_windows(a: &PartitionCell, b: &PartitionCell) -> Ordering {
    b.duration_minutes()
        .cmp(&a.duration_minutes())
        .then_with(|| b.participant_count().cmp(&a.participant_count()))
        .then_with(|| a.day_of_week().cmp(&b.day_of_week()))
        .then_with(|| a.start.cmp(&b.start))
}

/// Spread between the most positive and most negative offsets, in whole hours.
///
/// Clamped to 24: real offsets run from −12:00 to +14:00, a 26-hour spread
/// that is more than a full day apart on the clock.
pub fn timezone_span_hours(offsets: &[i32]) -> u32 {
    let (Some(min), Some(max)) = (offsets.iter().min(), offsets.iter().max()) else {
        return 0;
    };
    let hours = ((max - min) as f64 / 60.0).round() as u32;
    hours.min(24)
}

pub(crate) fn minutes_to_hours(minutes: u32) -> f64 {
    minutes as f64 / 60.0
}

// ── Tests ───────────────────────────────────────────────────────────────────
