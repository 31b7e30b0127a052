// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YMD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// The date shapes legacy documents are known to carry. Everything that
/// compares, buckets, or formats a transaction date must go through
/// [`normalize`]; nothing else in the crate interprets these variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Store-native timestamp blob, e.g. `{"seconds":1704067200,"nanoseconds":0}`.
    Timestamp { seconds: i64, nanoseconds: u32 },
    /// Numeric epoch in milliseconds (JavaScript `Date.now()` convention).
    Epoch(i64),
    /// `YYYY-MM-DD`, an ISO datetime, or a stringified epoch.
    Text(String),
}

impl RawDate {
    /// Reconstruct a `RawDate` from the raw text column. Timestamp blobs are
    /// stored as their JSON serialization; bare digits are epoch millis.
    pub fn parse(raw: &str) -> RawDate {
        let t = raw.trim();
        if t.starts_with('{') {
            if let Ok(rd) = serde_json::from_str::<RawDate>(t) {
                return rd;
            }
        }
        if let Ok(n) = t.parse::<i64>() {
            return RawDate::Epoch(n);
        }
        RawDate::Text(t.to_string())
    }

    /// Serialize for the raw text column. Inverse of [`RawDate::parse`] for
    /// every variant.
    pub fn to_column(&self) -> String {
        match self {
            RawDate::Timestamp { .. } => serde_json::to_string(self).unwrap_or_default(),
            RawDate::Epoch(ms) => ms.to_string(),
            RawDate::Text(s) => s.clone(),
        }
    }
}

impl From<NaiveDate> for RawDate {
    fn from(d: NaiveDate) -> Self {
        RawDate::Text(d.format("%Y-%m-%d").to_string())
    }
}

/// Coerce any tolerated date shape into a concrete datetime, or `None` when
/// the value cannot be interpreted. Never panics.
///
/// A plain `YYYY-MM-DD` string maps to **noon** on that calendar day rather
/// than midnight, so a later UTC-minus offset conversion cannot roll the
/// value into the adjacent day.
pub fn normalize(raw: &RawDate) -> Option<NaiveDateTime> {
    match raw {
        RawDate::Timestamp {
            seconds,
            nanoseconds,
        } => DateTime::from_timestamp(*seconds, *nanoseconds).map(|dt| dt.naive_utc()),
        RawDate::Epoch(ms) => DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc()),
        RawDate::Text(s) => {
            let t = s.trim();
            if YMD_RE.is_match(t) {
                return NaiveDate::parse_from_str(t, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(12, 0, 0));
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
                return Some(dt.naive_utc());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(dt);
            }
            if let Ok(n) = t.parse::<i64>() {
                return DateTime::from_timestamp_millis(n).map(|dt| dt.naive_utc());
            }
            None
        }
    }
}

/// Calendar-day view of [`normalize`].
pub fn normalize_to_date(raw: &RawDate) -> Option<NaiveDate> {
    normalize(raw).map(|dt| dt.date())
}

/// Render a normalized date back to the `YYYY-MM-DD` form date inputs use.
pub fn format_date_for_input(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}
