//! Session timestamps
//!
//! Keeps the wall-clock value exactly as written (for hour-of-day) plus the
//! offset when one was given (for durations). Naive values count as UTC
//! when computing instants; no timezone normalization is applied.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTime {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl SessionTime {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::aware(dt));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
                return Some(Self::aware(dt));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(local) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(Self { local, offset: None });
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|local| Self { local, offset: None })
    }

    fn aware(dt: DateTime<FixedOffset>) -> Self {
        Self {
            local: dt.naive_local(),
            offset: Some(*dt.offset()),
        }
    }

    /// Hour as written in the record
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    /// Seconds east of UTC; naive values count as UTC
    fn offset_seconds(&self) -> i64 {
        self.offset.map_or(0, |o| i64::from(o.local_minus_utc()))
    }

    /// Signed seconds from `self` to `end`.
    ///
    /// Taken from the wall-clock difference minus the offset difference, so
    /// every pair `parse` accepts (including 5+ digit years) stays in range.
    pub fn seconds_until(&self, end: &SessionTime) -> f64 {
        let wall = end.local.signed_duration_since(self.local);
        let offsets = (end.offset_seconds() - self.offset_seconds()) as f64;
        wall.num_seconds() as f64 + f64::from(wall.subsec_nanos()) / 1e9 - offsets
    }
}
