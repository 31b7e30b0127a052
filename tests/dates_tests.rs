// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Timelike};

use plata::dates::{self, RawDate};

#[test]
fn ymd_string_lands_at_noon() {
    let dt = dates::normalize(&RawDate::Text("2024-03-05".into())).unwrap();
    assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(dt.hour(), 12);
    assert_eq!(dt.minute(), 0);
}

#[test]
fn ymd_round_trips_through_format() {
    let dt = dates::normalize(&RawDate::Text("2024-03-05".into())).unwrap();
    assert_eq!(dates::format_date_for_input(dt), "2024-03-05");
}

#[test]
fn timestamp_blob_normalizes() {
    // 2024-01-15T00:00:00Z
    let raw = RawDate::Timestamp {
        seconds: 1705276800,
        nanoseconds: 0,
    };
    let dt = dates::normalize(&raw).unwrap();
    assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[test]
fn epoch_is_milliseconds() {
    let dt = dates::normalize(&RawDate::Epoch(1705276800000)).unwrap();
    assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[test]
fn iso_datetime_string_normalizes() {
    let dt = dates::normalize(&RawDate::Text("2024-01-15T09:30:00Z".into())).unwrap();
    assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(dt.hour(), 9);
    // Without an offset suffix too.
    let dt2 = dates::normalize(&RawDate::Text("2024-01-15T09:30:00".into())).unwrap();
    assert_eq!(dt2.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[test]
fn numeric_string_is_epoch_millis() {
    let dt = dates::normalize(&RawDate::Text("1705276800000".into())).unwrap();
    assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[test]
fn garbage_is_invalid_not_a_panic() {
    assert!(dates::normalize(&RawDate::Text("not-a-date".into())).is_none());
    assert!(dates::normalize(&RawDate::Text("".into())).is_none());
    assert!(dates::normalize(&RawDate::Text("2024-13-45".into())).is_none());
}

#[test]
fn raw_column_round_trips_every_variant() {
    let blob = RawDate::Timestamp {
        seconds: 1705276800,
        nanoseconds: 500,
    };
    assert_eq!(RawDate::parse(&blob.to_column()), blob);

    let epoch = RawDate::Epoch(1705276800000);
    assert_eq!(RawDate::parse(&epoch.to_column()), epoch);

    let text = RawDate::Text("2024-03-05".into());
    assert_eq!(RawDate::parse(&text.to_column()), text);
}

#[test]
fn from_naive_date_matches_input_format() {
    let raw = RawDate::from(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(raw, RawDate::Text("2024-03-05".into()));
}
