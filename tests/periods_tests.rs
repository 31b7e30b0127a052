// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use plata::periods::{self, Period};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn this_month_spans_the_calendar_month() {
    let w = periods::resolve(Period::ThisMonth, 2024, None, d(2024, 8, 15));
    assert_eq!(w.start, d(2024, 8, 1));
    assert_eq!(w.end, d(2024, 8, 31));
}

#[test]
fn last_month_crosses_the_year_boundary() {
    let w = periods::resolve(Period::LastMonth, 2024, None, d(2024, 1, 10));
    assert_eq!(w.start, d(2023, 12, 1));
    assert_eq!(w.end, d(2023, 12, 31));
}

#[test]
fn last_three_months_includes_the_current_one() {
    let w = periods::resolve(Period::Last3Months, 2024, None, d(2024, 1, 10));
    assert_eq!(w.start, d(2023, 11, 1));
    assert_eq!(w.end, d(2024, 1, 31));
}

#[test]
fn last_six_months_spans_six_calendar_months() {
    let w = periods::resolve(Period::Last6Months, 2024, None, d(2024, 8, 15));
    assert_eq!(w.start, d(2024, 3, 1));
    assert_eq!(w.end, d(2024, 8, 31));
}

#[test]
fn this_year_honors_the_year_argument() {
    let w = periods::resolve(Period::ThisYear, 2023, None, d(2024, 8, 15));
    assert_eq!(w.start, d(2023, 1, 1));
    assert_eq!(w.end, d(2023, 12, 31));
}

#[test]
fn custom_narrows_to_the_month_with_leap_handling() {
    let w = periods::resolve(Period::Custom, 2024, Some(2), d(2024, 8, 15));
    assert_eq!(w.start, d(2024, 2, 1));
    assert_eq!(w.end, d(2024, 2, 29));
    let w2 = periods::resolve(Period::Custom, 2023, Some(2), d(2024, 8, 15));
    assert_eq!(w2.end, d(2023, 2, 28));
}

#[test]
fn relative_periods_ignore_the_year_argument() {
    // Shipped behavior: the year only matters for thisYear/custom.
    let today = d(2024, 8, 15);
    let w1 = periods::resolve(Period::ThisMonth, 1999, None, today);
    let w2 = periods::resolve(Period::ThisMonth, 2024, None, today);
    assert_eq!(w1, w2);
    let w3 = periods::resolve(Period::Last6Months, 1999, None, today);
    assert_eq!(w3.start, d(2024, 3, 1));
}

#[test]
fn windows_are_always_well_formed() {
    let periods = [
        Period::ThisMonth,
        Period::LastMonth,
        Period::Last3Months,
        Period::Last6Months,
        Period::ThisYear,
        Period::Custom,
    ];
    for p in periods {
        for today in [d(2024, 1, 1), d(2024, 12, 31), d(2023, 2, 28)] {
            let w = periods::resolve(p, 2024, Some(7), today);
            assert!(w.start <= w.end, "{:?} produced {:?}", p, w);
        }
    }
}

#[test]
fn period_keys_parse_as_the_dashboards_spell_them() {
    assert_eq!(Period::parse("thisMonth"), Some(Period::ThisMonth));
    assert_eq!(Period::parse("last3Months"), Some(Period::Last3Months));
    assert_eq!(Period::parse("thisYear"), Some(Period::ThisYear));
    assert_eq!(Period::parse("bogus"), None);
}
