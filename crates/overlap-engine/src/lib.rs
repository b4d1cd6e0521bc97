//! # overlap-engine
//!
//! Deterministic team timezone-overlap computation.
//!
//! Given each team member's IANA timezone, daily working hours, and working
//! weekdays, the engine finds the recurring weekly windows when members are
//! at work together, ranks the best windows for synchronous meetings, and
//! reports weekly totals. All inputs are explicit (including the reference
//! week used for DST), so identical inputs always yield identical results.
//!
//! ## Modules
//!
//! - [`timezone`] — IANA name + reference date → UTC offset; the [`ReferenceWeek`] anchor
//! - [`availability`] — Raw per-user records and their validation
//! - [`window`] — Local working windows → non-wrapping UTC intervals on the weekly axis
//! - [`sweep`] — Sweep-line partition of the week by who is available
//! - [`rank`] — Best meeting times and weekly aggregates
//! - [`response`] — Pin cells to concrete instants and package the result
//! - [`overlap`] — The end-to-end pipeline and its options
//! - [`roster`] — Team selectors and roster providers
//! - [`timezones`] — Catalogue of timezones for pickers
//! - [`error`] — Error types

pub mod availability;
pub mod error;
pub mod overlap;
pub mod rank;
pub mod response;
pub mod roster;
pub mod sweep;
pub mod timezone;
pub mod timezones;
pub mod window;

pub use availability::{UserAvailability, WorkingSchedule};
pub use error::OverlapError;
pub use overlap::{compute_for_team, compute_team_overlap, OverlapOptions};
pub use rank::{rank, Ranking, TotalOverlapMode, DEFAULT_BEST_MEETING_LIMIT};
pub use response::{OverlapWindow, TeamOverlapResult, UserTimezone};
pub use roster::{RosterProvider, StaticRoster, TeamSelector};
pub use sweep::{intersect, wrap_week, PartitionCell};
pub use timezone::{
    format_utc_offset, is_dst_active, resolve_offset_minutes, ReferenceWeek, MINUTES_PER_DAY,
    MINUTES_PER_WEEK,
};
pub use timezones::{supported_timezones, TimezoneOption};
pub use window::{build, build_with_offset, WeeklyInterval};
