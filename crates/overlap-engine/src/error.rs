//! Error types for overlap-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlapError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Invalid working days: {0}")]
    InvalidWorkingDays(String),

    #[error("Insufficient users: overlap needs at least 2, got {0}")]
    InsufficientUsers(usize),

    #[error("Duplicate user: '{0}' appears more than once")]
    DuplicateUser(String),

    #[error("Invalid reference week: {0}")]
    InvalidReferenceWeek(String),

    #[error("Roster resolution failed: {0}")]
    RosterResolution(String),
}

pub type Result<T> = std::result::Result<T, OverlapError>;
