//! The catalogue of timezones offered to timezone pickers.
//!
//! Static reference data: IANA names with display labels. Offsets are not
//! stored; they are resolved against a caller-supplied date so the catalogue
//! stays correct across DST.

use chrono::NaiveDate;
use serde::Serialize;

use crate::timezone::{format_utc_offset, offset_on, parse_timezone};

/// One selectable timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimezoneOption {
    /// IANA name, suitable for `UserAvailability::timezone`.
    pub value: String,
    pub label: String,
    /// Offset on the reference date (e.g., "-05:00").
    pub utc_offset: String,
}

const CATALOGUE: &[(&str, &str)] = &[
    ("Pacific/Honolulu", "Hawaii"),
    ("America/Anchorage", "Alaska"),
    ("America/Los_Angeles", "Pacific Time (US & Canada)"),
    ("America/Denver", "Mountain Time (US & Canada)"),
    ("America/Phoenix", "Arizona"),
    ("America/Chicago", "Central Time (US & Canada)"),
    ("America/Mexico_City", "Mexico City"),
    ("America/New_York", "Eastern Time (US & Canada)"),
    ("America/Bogota", "Bogota"),
    ("America/Halifax", "Atlantic Time (Canada)"),
    ("America/Sao_Paulo", "Brasilia"),
    ("America/Argentina/Buenos_Aires", "Buenos Aires"),
    ("Atlantic/Azores", "Azores"),
    ("UTC", "Coordinated Universal Time"),
    ("Europe/London", "London, Dublin, Lisbon"),
    ("Africa/Lagos", "West Central Africa"),
    ("Europe/Berlin", "Berlin, Amsterdam, Rome, Vienna"),
    ("Europe/Paris", "Paris, Brussels, Madrid"),
    ("Africa/Cairo", "Cairo"),
    ("Africa/Johannesburg", "Johannesburg"),
    ("Europe/Helsinki", "Helsinki, Kyiv, Riga"),
    ("Europe/Istanbul", "Istanbul"),
    ("Europe/Moscow", "Moscow, St. Petersburg"),
    ("Africa/Nairobi", "Nairobi"),
    ("Asia/Dubai", "Abu Dhabi, Muscat"),
    ("Asia/Karachi", "Islamabad, Karachi"),
    ("Asia/Kolkata", "Chennai, Kolkata, Mumbai, New Delhi"),
    ("Asia/Kathmandu", "Kathmandu"),
    ("Asia/Dhaka", "Dhaka"),
    ("Asia/Bangkok", "Bangkok, Hanoi, Jakarta"),
    ("Asia/Singapore", "Singapore, Kuala Lumpur"),
    ("Asia/Shanghai", "Beijing, Shanghai, Hong Kong"),
    ("Australia/Perth", "Perth"),
    ("Asia/Tokyo", "Tokyo, Osaka"),
    ("Asia/Seoul", "Seoul"),
    ("Australia/Adelaide", "Adelaide"),
    ("Australia/Brisbane", "Brisbane"),
    ("Australia/Sydney", "Sydney, Melbourne, Canberra"),
    ("Pacific/Auckland", "Auckland, Wellington"),
];

/// The supported timezones with offsets resolved on `reference_date`, sorted
/// by offset then label.
pub fn supported_timezones(reference_date: NaiveDate) -> Vec<TimezoneOption> {
    let mut options: Vec<(i32, TimezoneOption)> = CATALOGUE
        .iter()
        .filter_map(|&(name, label)| {
            let tz = parse_timezone(name).ok()?;
            let offset = offset_on(&tz, reference_date);
            Some((
                offset,
                TimezoneOption {
                    value: name.to_string(),
                    label: label.to_string(),
                    utc_offset: format_utc_offset(offset),
                },
            ))
        })
        .collect();

    options.sort_by(|(a_offset, a), (b_offset, b)| {
        a_offset.cmp(b_offset).then_with(|| a.label.cmp(&b.label))
    });
    options.into_iter().map(|(_, option)| option).collect()
}

// ── Tests ───────────────────────────────────────────────────────────────────
