//! API version type and parsing
//!
//! Versions are identified by the calendar day an API change shipped and are
//! written in ISO form, e.g. `2024-01-01`.

use crate::error::VersionError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// API version identified by a calendar date
///
/// Equality, hashing and ordering follow the date, so two versions built from
/// the same day are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    date: NaiveDate,
}

impl Version {
    /// Create a version from year, month and day
    ///
    /// Fails with [`VersionError::InvalidDate`] for days that do not exist.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, VersionError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from_date)
            .ok_or_else(|| VersionError::InvalidDate(format!("{year}-{month}-{day}")))
    }

    /// Create a version from an existing date
    pub fn from_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// The date identifying this version
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Canonical `YYYY-MM-DD` form
    pub fn canonical(&self) -> String {
        self.date.format(CANONICAL_FORMAT).to_string()
    }

    /// Whether this version was released after `other`
    pub fn is_after(&self, other: &Version) -> bool {
        self.date > other.date
    }

    /// Whether this version was released before `other`
    pub fn is_before(&self, other: &Version) -> bool {
        self.date < other.date
    }
}

impl From<NaiveDate> for Version {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format(CANONICAL_FORMAT))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_iso_date(s.trim())
            .map(Self::from_date)
            .ok_or_else(|| VersionError::InvalidDate(s.to_string()))
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.canonical()
    }
}

/// Strict `YYYY-MM-DD`: four digit year, zero padded month and day
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }

    let digits_only = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 7)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_only {
        return None;
    }

    let year = s[0..4].parse().ok()?;
    let month = s[5..7].parse().ok()?;
    let day = s[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
