//! Convert local working windows into UTC intervals on the weekly axis.
//!
//! Every interval produced here is a simple half-open `[start, end)` range of
//! minutes inside a single UTC day, so the sweep never has to reason about
//! midnight or the Saturday→Sunday week wrap.

use serde::Serialize;

use crate::availability::{UserAvailability, WorkingSchedule};
use crate::error::Result;
use crate::timezone::{offset_on, ReferenceWeek, MINUTES_PER_DAY, MINUTES_PER_WEEK};

/// A non-wrapping UTC interval on the weekly-minute axis.
///
/// Invariant: `start < end`, and both lie within UTC day `day_of_week`
/// (`end` may equal the following day's first minute).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WeeklyInterval {
    pub day_of_week: u8,
    pub start: u32,
    pub end: u32,
}

impl WeeklyInterval {
    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }
}

/// Validate `user`, resolve their offset against `week`, and build their
/// UTC intervals.
///
/// # Errors
///
/// Propagates any validation error from [`UserAvailability::validate`].
pub fn build(user: &UserAvailability, week: &ReferenceWeek) -> Result<Vec<WeeklyInterval>> {
    let schedule = user.validate()?;
    let offset = offset_on(&schedule.timezone, week.resolution_date());
    Ok(build_with_offset(&schedule, offset))
}

/// Build UTC intervals for an already-validated schedule at a fixed offset.
///
/// The output is sorted by start, with a user's touching pieces inside the
/// same UTC day coalesced into one interval.
pub fn build_with_offset(schedule: &WorkingSchedule, offset_minutes: i32) -> Vec<WeeklyInterval> {
    let week = MINUTES_PER_WEEK as i64;
    let mut pieces = Vec::new();

    for &day in &schedule.days {
        for (local_start, length) in local_ranges(schedule, day) {
            let utc_start = (local_start - offset_minutes as i64).rem_euclid(week) as u32;
            split_at_day_boundaries(utc_start, length, &mut pieces);
        }
    }

    coalesce(pieces)
}

/// Local `(minute_of_week, length)` ranges for one active day.
///
/// A wrapping window contributes its post-midnight tail to the next day; for
/// Saturday that lands at minute 10080, which the caller folds back to 0.
fn local_ranges(schedule: &WorkingSchedule, day: u8) -> Vec<(i64, u32)> {
    let day_start = day as i64 * MINUTES_PER_DAY as i64;
    let start = schedule.start_hour * 60;
    let end = schedule.end_hour * 60;

    if schedule.is_all_day() {
        return vec![(day_start, MINUTES_PER_DAY)];
    }
    if !schedule.wraps_midnight() {
        return vec![(day_start + start as i64, end - start)];
    }

    let mut ranges = vec![(day_start + start as i64, MINUTES_PER_DAY - start)];
    if end > 0 {
        ranges.push((day_start + MINUTES_PER_DAY as i64, end));
    }
    ranges
}

/// Cut `[start, start + length)` at every UTC midnight, folding the week wrap
/// back to minute 0.
fn split_at_day_boundaries(mut start: u32, mut length: u32, out: &mut Vec<WeeklyInterval>) {
    while length > 0 {
        let day_end = (start / MINUTES_PER_DAY + 1) * MINUTES_PER_DAY;
        let take = length.min(day_end - start);
        out.push(WeeklyInterval {
            day_of_week: (start / MINUTES_PER_DAY) as u8,
            start,
            end: start + take,
        });
        length -= take;
        start = if day_end == MINUTES_PER_WEEK { 0 } else { day_end };
    }
}

fn coalesce(mut pieces: Vec<WeeklyInterval>) -> Vec<WeeklyInterval> {
    pieces.sort();
    let mut merged: Vec<WeeklyInterval> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        match merged.last_mut() {
            Some(last) if last.day_of_week == piece.day_of_week && piece.start <= last.end => {
                last.end = last.end.max(piece.end);
            }
            _ => merged.push(piece),
        }
    }
    merged
}

// ── Tests ───────────────────────────────────────────────────────────────────
