//! Sweep-line intersection of every user's weekly intervals.
//!
//! Produces an exact partition of the week: consecutive [`PartitionCell`]s
//! cover `[0, 10080)` with no gaps or overlaps, and each cell carries the set
//! of users available for its whole span. Neighbouring cells always differ in
//! their participant sets.
//!
//! Intervals are half-open. At a shared boundary minute all closes are
//! processed before any opens, so a user whose interval ends exactly when
//! another's starts is never counted as overlapping them.
//!
//! The partition itself stops at minute 10080. Schedules repeat weekly, so
//! [`wrap_week`] rejoins a window that runs from Saturday night into Sunday
//! morning before anything is ranked.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::timezone::{MINUTES_PER_DAY, MINUTES_PER_WEEK};
use crate::window::WeeklyInterval;

/// A maximal span of the week during which the available set is constant.
///
/// Inside a partition `end <= 10080`. A cell returned by [`wrap_week`] may end
/// past 10080, meaning it continues into the following week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionCell {
    pub start: u32,
    pub end: u32,
    pub participants: BTreeSet<String>,
}

impl PartitionCell {
    pub fn duration_minutes(&self) -> u32 {
        self.end - self.start
    }

    /// UTC weekday (0 = Sunday) on which the cell starts.
    pub fn day_of_week(&self) -> u8 {
        (self.start / MINUTES_PER_DAY) as u8
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

/// Boundary kinds. Declaration order makes `Close` sort before `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Boundary {
    Close,
    Open,
}

/// Partition the week by who is available, from per-user UTC intervals.
///
/// Runs in O(E log E) for E interval endpoints. The result always sums to
/// exactly one week; see [`partition_is_exact`].
pub fn intersect(per_user: &BTreeMap<String, Vec<WeeklyInterval>>) -> Vec<PartitionCell> {
    let mut events: Vec<(u32, Boundary, &str)> = per_user
        .iter()
        .flat_map(|(user, intervals)| {
            intervals.iter().flat_map(move |iv| {
                [
                    (iv.start, Boundary::Open, user.as_str()),
                    (iv.end, Boundary::Close, user.as_str()),
                ]
            })
        })
        .collect();
    events.sort_unstable();

    // Per-user counts tolerate a user contributing touching intervals.
    let mut active: BTreeMap<&str, usize> = BTreeMap::new();
    let mut cells: Vec<PartitionCell> = Vec::new();
    let mut cursor = 0;
    let mut idx = 0;

    while idx < events.len() {
        let minute = events[idx].0;
        if minute > cursor {
            push_cell(&mut cells, cursor, minute, &active);
            cursor = minute;
        }

        while idx < events.len() && events[idx].0 == minute {
            let (_, boundary, user) = events[idx];
            match boundary {
                Boundary::Close => {
                    if let Some(count) = active.get_mut(user) {
                        *count -= 1;
                        if *count == 0 {
                            active.remove(user);
                        }
                    }
                }
                Boundary::Open => *active.entry(user).or_insert(0) += 1,
            }
            idx += 1;
        }
    }

    if cursor < MINUTES_PER_WEEK {
        push_cell(&mut cells, cursor, MINUTES_PER_WEEK, &active);
    }

    tracing::debug!(
        users = per_user.len(),
        events = events.len(),
        cells = cells.len(),
        "swept weekly intervals"
    );

    if !partition_is_exact(&cells) {
        tracing::error!(cells = ?cells, "sweep produced an inexact partition of the week");
        debug_assert!(false, "sweep produced an inexact partition of the week");
    }

    cells
}

/// Treat the week as circular: join the last cell and the first cell when
/// they carry the same participants.
///
/// The joined cell keeps the last cell's start and ends `first.end` minutes
/// into the following week. It is placed last, so the result stays in week
/// order. Input that is not an exact partition is returned unchanged.
pub fn wrap_week(cells: &[PartitionCell]) -> Vec<PartitionCell> {
    let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
        return Vec::new();
    };
    if cells.len() < 2 || !partition_is_exact(cells) || first.participants != last.participants {
        return cells.to_vec();
    }

    let mut wrapped = cells[1..cells.len() - 1].to_vec();
    wrapped.push(PartitionCell {
        start: last.start,
        end: MINUTES_PER_WEEK + first.end,
        participants: last.participants.clone(),
    });
    wrapped
}

/// Close `[start, end)` with the current participant set, extending the
/// previous cell instead when nobody joined or left at `start`.
fn push_cell(
    cells: &mut Vec<PartitionCell>,
    start: u32,
    end: u32,
    active: &BTreeMap<&str, usize>,
) {
    let participants: BTreeSet<String> = active.keys().map(|user| user.to_string()).collect();

    if let Some(last) = cells.last_mut() {
        if last.end == start && last.participants == participants {
            last.end = end;
            return;
        }
    }

    cells.push(PartitionCell {
        start,
        end,
        participants,
    });
}

/// Whether `cells` tile `[0, 10080)` exactly, in order, with non-empty spans.
pub fn partition_is_exact(cells: &[PartitionCell]) -> bool {
    let mut expected_start = 0;
    for cell in cells {
        if cell.start != expected_start || cell.end <= cell.start {
            return false;
        }
        expected_start = cell.end;
    }
    expected_start == MINUTES_PER_WEEK
}

// ── Tests ───────────────────────────────────────────────────────────────────
