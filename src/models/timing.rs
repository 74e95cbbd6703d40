//! Timing slot model.
//!
//! A timing slot is one duty window `[from, to)`. Instants are stored in UTC
//! and serialized as RFC 3339 strings; labels for display are rendered in a
//! caller-chosen time zone.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date label format, e.g. `2025-03-14`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Clock label format, e.g. `09:30 AM`.
pub const CLOCK_FORMAT: &str = "%I:%M %p";

/// A duty window.
///
/// Half-open interval: includes `from`, excludes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimingSlot {
    /// Window start (inclusive).
    pub from: DateTime<Utc>,
    /// Window end (exclusive).
    pub to: DateTime<Utc>,
}

impl TimingSlot {
    /// Creates a new timing slot.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Whether `from < to`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.from < self.to
    }

    /// Length of this window.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    /// Calendar date of the window start, rendered in `tz`.
    pub fn date_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.from.with_timezone(tz).format(DATE_FORMAT).to_string()
    }

    /// `hh:mm AM - hh:mm PM` label of the window, rendered in `tz`.
    pub fn time_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} - {}",
            self.from.with_timezone(tz).format(CLOCK_FORMAT),
            self.to.with_timezone(tz).format(CLOCK_FORMAT)
        )
    }
}
