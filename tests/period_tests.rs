// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::period::{PeriodType, resolve_period};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn monthly_mid_cycle_starts_in_prior_month() {
    // Start day 15, asked on the 10th: the cycle began on Feb 15.
    let p = resolve_period(PeriodType::Monthly, 15, d(2024, 3, 10));
    assert_eq!(p.start, d(2024, 2, 15));
    assert_eq!(p.end, d(2024, 3, 14));
}

#[test]
fn monthly_on_start_day_begins_new_cycle() {
    let p = resolve_period(PeriodType::Monthly, 15, d(2024, 3, 15));
    assert_eq!(p.start, d(2024, 3, 15));
    assert_eq!(p.end, d(2024, 4, 14));
}

#[test]
fn monthly_start_day_clamps_to_month_length() {
    // Day 31 requested mid-February: cycle anchored on Jan 31.
    let p = resolve_period(PeriodType::Monthly, 31, d(2024, 2, 15));
    assert_eq!(p.start, d(2024, 1, 31));
    assert_eq!(p.end, d(2024, 2, 28));
}

#[test]
fn monthly_periods_are_contiguous() {
    // Walk day by day across a leap year and into the next non-leap one;
    // every date must land in a cycle, and cycles must tile with no gap.
    for start_day in [1, 15, 28, 29, 30, 31] {
        let mut day = d(2024, 1, 1);
        while day < d(2025, 4, 1) {
            let p = resolve_period(PeriodType::Monthly, start_day, day);
            assert!(
                p.contains(day),
                "start day {}: {} outside {}..{}",
                start_day,
                day,
                p.start,
                p.end
            );
            let after = p.end.succ_opt().unwrap();
            let next = resolve_period(PeriodType::Monthly, start_day, after);
            assert_eq!(next.start, after, "gap after {} for start day {}", p.end, start_day);
            day = after;
        }
    }
}

#[test]
fn monthly_late_month_dates_stay_in_the_clamped_cycle() {
    // Start day 31 clamps to Feb 28 in 2025; the tail of March still
    // belongs to that cycle, which runs to the day before Mar 31.
    for day in 28..=30 {
        let p = resolve_period(PeriodType::Monthly, 31, d(2025, 3, day));
        assert_eq!(p.start, d(2025, 2, 28));
        assert_eq!(p.end, d(2025, 3, 30));
    }
    let p = resolve_period(PeriodType::Monthly, 31, d(2025, 3, 31));
    assert_eq!(p.start, d(2025, 3, 31));
    assert_eq!(p.end, d(2025, 4, 29));
}

#[test]
fn weekly_is_iso_monday_to_sunday() {
    // 2024-03-13 is a Wednesday.
    let p = resolve_period(PeriodType::Weekly, 1, d(2024, 3, 13));
    assert_eq!(p.start, d(2024, 3, 11));
    assert_eq!(p.end, d(2024, 3, 17));
}

#[test]
fn biweekly_splits_month_at_the_15th() {
    let first = resolve_period(PeriodType::Biweekly, 1, d(2024, 3, 15));
    assert_eq!(first.start, d(2024, 3, 1));
    assert_eq!(first.end, d(2024, 3, 15));

    let second = resolve_period(PeriodType::Biweekly, 1, d(2024, 3, 16));
    assert_eq!(second.start, d(2024, 3, 16));
    assert_eq!(second.end, d(2024, 3, 31));
}

#[test]
fn bimonthly_anchors_to_odd_months() {
    // February belongs to the Jan-Feb window.
    let p = resolve_period(PeriodType::Bimonthly, 1, d(2024, 2, 10));
    assert_eq!(p.start, d(2024, 1, 1));
    assert_eq!(p.end, d(2024, 2, 29));
}

#[test]
fn bimonthly_steps_back_before_the_anchor_day() {
    // Jan 5 precedes the Jan 15 anchor, so the window began Nov 15.
    let p = resolve_period(PeriodType::Bimonthly, 15, d(2024, 1, 5));
    assert_eq!(p.start, d(2023, 11, 15));
    assert_eq!(p.end, d(2024, 1, 14));
}

#[test]
fn bimonthly_runs_to_the_day_before_the_next_anchor() {
    // The Nov anchor clamps 31 to Nov 30; the window still covers every
    // day up to the Jan 31 anchor.
    let p = resolve_period(PeriodType::Bimonthly, 31, d(2025, 1, 30));
    assert_eq!(p.start, d(2024, 11, 30));
    assert_eq!(p.end, d(2025, 1, 30));
}

#[test]
fn all_cadences_contain_today_and_have_expected_lengths() {
    let samples = [
        d(2024, 1, 1),
        d(2024, 2, 14),
        d(2024, 2, 29),
        d(2024, 3, 16),
        d(2024, 7, 31),
        d(2023, 12, 31),
        d(2025, 2, 28),
    ];
    let cases = [
        (PeriodType::Weekly, 7..=7),
        (PeriodType::Biweekly, 13..=16),
        (PeriodType::Monthly, 28..=31),
        (PeriodType::Bimonthly, 59..=62),
    ];
    for (kind, len_range) in cases {
        for start_day in [1, 15, 28, 31] {
            for today in samples {
                let p = resolve_period(kind, start_day, today);
                assert!(p.start <= p.end, "{:?} {} {}", kind, start_day, today);
                assert!(
                    p.contains(today),
                    "{:?} start_day={} today={} period={}..{}",
                    kind,
                    start_day,
                    today,
                    p.start,
                    p.end
                );
                let len = (p.end - p.start).num_days() + 1;
                assert!(
                    len_range.contains(&len),
                    "{:?} start_day={} today={} length {}",
                    kind,
                    start_day,
                    today,
                    len
                );
            }
        }
    }
}

#[test]
fn contains_is_inclusive_on_both_boundaries() {
    let p = resolve_period(PeriodType::Monthly, 15, d(2024, 3, 10));
    assert!(p.contains(p.start));
    assert!(p.contains(p.end));
    assert!(!p.contains(p.start.pred_opt().unwrap()));
    assert!(!p.contains(p.end.succ_opt().unwrap()));
}

#[test]
fn days_left_counts_today_and_floors_at_zero() {
    let p = resolve_period(PeriodType::Monthly, 1, d(2024, 3, 10));
    assert_eq!(p.end, d(2024, 3, 31));
    assert_eq!(p.days_left(d(2024, 3, 10)), 22);
    assert_eq!(p.days_left(p.end), 1);
    assert_eq!(p.days_left(d(2024, 4, 5)), 0);
}

#[test]
fn full_calendar_month_gets_a_month_label() {
    let p = resolve_period(PeriodType::Monthly, 1, d(2024, 3, 10));
    assert_eq!(p.label, "March 2024");
}
