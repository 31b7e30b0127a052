// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};

/// A named date-window selector for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    ThisMonth,
    LastMonth,
    Last3Months,
    Last6Months,
    ThisYear,
    Custom,
}

impl Period {
    /// Period keys as the original dashboards spell them. Unknown keys are
    /// `None`; the CLI boundary maps those to a full-year window.
    pub fn parse(s: &str) -> Option<Period> {
        match s {
            "thisMonth" => Some(Period::ThisMonth),
            "lastMonth" => Some(Period::LastMonth),
            "last3Months" => Some(Period::Last3Months),
            "last6Months" => Some(Period::Last6Months),
            "thisYear" => Some(Period::ThisYear),
            "custom" => Some(Period::Custom),
            _ => None,
        }
    }

    /// `thisYear` and `custom` filter by calendar-year (and month) equality
    /// instead of day-level window containment.
    pub fn is_year_anchored(&self) -> bool {
        matches!(self, Period::ThisYear | Period::Custom)
    }
}

/// A concrete inclusive date window, `start <= end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn month_start(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

pub fn month_end(year: i32, month: u32) -> NaiveDate {
    let last_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    };
    NaiveDate::from_ymd_opt(year, month, last_day).unwrap_or_default()
}

/// Shift `(year, month)` back by `months`, staying on month granularity.
fn months_back(year: i32, month: u32, months: i32) -> (i32, u32) {
    let idx = year * 12 + month as i32 - 1 - months;
    (idx.div_euclid(12), (idx.rem_euclid(12) + 1) as u32)
}

/// Map a period selection to a concrete window.
///
/// The relative periods (`thisMonth` through `last6Months`) anchor to
/// `today` and ignore `year` entirely, while `thisYear`/`custom` honor it.
/// That asymmetry matches the shipped dashboards; do not "fix" it here
/// without product sign-off.
pub fn resolve(period: Period, year: i32, month: Option<u32>, today: NaiveDate) -> DateWindow {
    match period {
        Period::ThisMonth => DateWindow {
            start: month_start(today.year(), today.month()),
            end: month_end(today.year(), today.month()),
        },
        Period::LastMonth => {
            let (y, m) = months_back(today.year(), today.month(), 1);
            DateWindow {
                start: month_start(y, m),
                end: month_end(y, m),
            }
        }
        Period::Last3Months => {
            let (y, m) = months_back(today.year(), today.month(), 2);
            DateWindow {
                start: month_start(y, m),
                end: month_end(today.year(), today.month()),
            }
        }
        Period::Last6Months => {
            let (y, m) = months_back(today.year(), today.month(), 5);
            DateWindow {
                start: month_start(y, m),
                end: month_end(today.year(), today.month()),
            }
        }
        Period::ThisYear => DateWindow {
            start: month_start(year, 1),
            end: month_end(year, 12),
        },
        Period::Custom => {
            let m = month.unwrap_or(1).clamp(1, 12);
            DateWindow {
                start: month_start(year, m),
                end: month_end(year, m),
            }
        }
    }
}
