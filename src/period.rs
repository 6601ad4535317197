// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown period type '{0}' (use weekly|biweekly|monthly|bimonthly)")]
pub struct ParsePeriodTypeError(String);

/// Cadence of the user's accounting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Biweekly => "biweekly",
            PeriodType::Monthly => "monthly",
            PeriodType::Bimonthly => "bimonthly",
        };
        f.write_str(s)
    }
}

impl FromStr for PeriodType {
    type Err = ParsePeriodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(PeriodType::Weekly),
            "biweekly" => Ok(PeriodType::Biweekly),
            "monthly" => Ok(PeriodType::Monthly),
            "bimonthly" => Ok(PeriodType::Bimonthly),
            other => Err(ParsePeriodTypeError(other.to_string())),
        }
    }
}

/// A resolved accounting window. Bounds are calendar dates, inclusive on
/// both ends; a transaction dated exactly on a boundary day belongs to the
/// period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Presentational only, never used for logic.
    pub label: String,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Days left in the period counting today, zero once the period is over.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        ((self.end - today).num_days() + 1).max(0)
    }
}

/// Resolve the accounting period containing `today`.
///
/// - Weekly: the ISO week (Monday-Sunday).
/// - Biweekly: [1st, 15th] or [16th, last day] of the month.
/// - Monthly: starts on `start_day` (clamped to month length); if today's
///   day precedes it, the period began in the prior month.
/// - Bimonthly: two calendar months anchored to Jan/Mar/May/...
pub fn resolve_period(kind: PeriodType, start_day: u32, today: NaiveDate) -> Period {
    match kind {
        PeriodType::Weekly => {
            let week = today.week(Weekday::Mon);
            make_period(week.first_day(), week.last_day())
        }
        PeriodType::Biweekly => {
            let (y, m) = (today.year(), today.month());
            if today.day() <= 15 {
                make_period(clamped_date(y, m, 1), clamped_date(y, m, 15))
            } else {
                make_period(clamped_date(y, m, 16), clamped_date(y, m, days_in_month(y, m)))
            }
        }
        PeriodType::Monthly => {
            let this_start = clamped_date(today.year(), today.month(), start_day);
            let start = if today.day() < this_start.day() {
                let (py, pm) = prev_month(today.year(), today.month());
                clamped_date(py, pm, start_day)
            } else {
                this_start
            };
            make_period(start, cycle_end(start, 1, start_day))
        }
        PeriodType::Bimonthly => {
            // Anchor months are the odd-numbered ones: Jan, Mar, May, ...
            let anchor = (today.month0() / 2) * 2 + 1;
            let mut start = clamped_date(today.year(), anchor, start_day);
            if today < start {
                let (py, pm) = if anchor == 1 {
                    (today.year() - 1, 11)
                } else {
                    (today.year(), anchor - 2)
                };
                start = clamped_date(py, pm, start_day);
            }
            make_period(start, cycle_end(start, 2, start_day))
        }
    }
}

fn make_period(start: NaiveDate, end: NaiveDate) -> Period {
    Period {
        start,
        end,
        label: label_for(start, end),
    }
}

fn label_for(start: NaiveDate, end: NaiveDate) -> String {
    if start.day() == 1
        && start.year() == end.year()
        && start.month() == end.month()
        && end.day() == days_in_month(end.year(), end.month())
    {
        start.format("%B %Y").to_string()
    } else if start.year() == end.year() {
        format!("{} – {}", start.format("%b %-d"), end.format("%b %-d, %Y"))
    } else {
        format!("{} – {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y"))
    }
}

/// Last day of the cycle starting at `start`: the day before the next
/// cycle's clamped start day. Clamping must happen after stepping, not
/// before, or cycles anchored in a short month leave uncovered days at
/// the end of the following longer month.
fn cycle_end(start: NaiveDate, months: u32, start_day: u32) -> NaiveDate {
    let next = start.checked_add_months(Months::new(months)).unwrap_or(start);
    clamped_date(next.year(), next.month(), start_day)
        .pred_opt()
        .unwrap_or(start)
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Date with `day` clamped to the month's actual length, so a start day of
/// 31 lands on Feb 28/29, Apr 30, and so on.
pub fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(days_in_month(year, month));
    // Always valid after clamping.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 1).unwrap())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
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
    }
}
