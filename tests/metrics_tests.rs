// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::metrics;
use pocketbook::models::{Budget, FinancialGoal, Transaction};
use pocketbook::period::{PeriodType, resolve_period};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(date: NaiveDate, amount: &str, category: &str) -> Transaction {
    Transaction {
        id: 0,
        date,
        amount: dec(amount),
        category: category.to_string(),
        description: String::new(),
        account_id: None,
        is_fixed: false,
    }
}

fn budget(category: &str, limit: &str) -> Budget {
    Budget {
        id: 0,
        category: category.to_string(),
        limit_amount: dec(limit),
        color: None,
    }
}

// March 2024, whole calendar month.
fn march() -> pocketbook::period::Period {
    resolve_period(PeriodType::Monthly, 1, d(2024, 3, 10))
}

#[test]
fn summary_splits_income_and_expense_by_sign() {
    let txs = vec![
        tx(d(2024, 3, 1), "-1000", "Salary"),
        tx(d(2024, 3, 5), "300", "Rent"),
        tx(d(2024, 3, 9), "100", "Food"),
        tx(d(2024, 2, 20), "999", "Food"), // out of period
    ];
    let s = metrics::period_summary(&txs, &march());
    assert_eq!(s.income, dec("1000"));
    assert_eq!(s.expense, dec("400"));
    assert_eq!(s.net, dec("600"));
    assert_eq!(s.savings_rate, dec("60"));
}

#[test]
fn savings_rate_is_zero_without_income() {
    let txs = vec![tx(d(2024, 3, 5), "50", "Food")];
    let s = metrics::period_summary(&txs, &march());
    assert_eq!(s.savings_rate, Decimal::ZERO);
    assert_eq!(s.net, dec("-50"));
}

#[test]
fn transfer_markers_count_toward_neither_side() {
    let txs = vec![
        tx(d(2024, 3, 5), "0", "Transfer"),
        tx(d(2024, 3, 6), "100", "Food"),
    ];
    let s = metrics::period_summary(&txs, &march());
    assert_eq!(s.income, Decimal::ZERO);
    assert_eq!(s.expense, dec("100"));
}

#[test]
fn boundary_days_are_included() {
    let p = march();
    let txs = vec![tx(p.start, "10", "Food"), tx(p.end, "20", "Food")];
    let s = metrics::period_summary(&txs, &p);
    assert_eq!(s.expense, dec("30"));
}

#[test]
fn budget_spent_matches_category() {
    let txs = vec![tx(d(2024, 3, 5), "100", "Food")];
    let budgets = vec![budget("Food", "200")];
    let statuses = metrics::budget_statuses(&txs, &budgets, &march());
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].spent, dec("100"));
    assert_eq!(statuses[0].remaining, dec("100"));
    assert_eq!(statuses[0].utilization_pct, dec("50"));
    assert!(metrics::unbudgeted_spend(&txs, &budgets, &march()).is_empty());
}

#[test]
fn category_matching_ignores_case_and_whitespace() {
    let txs = vec![tx(d(2024, 3, 5), "40", "  food ")];
    let budgets = vec![budget("Food", "200")];
    let statuses = metrics::budget_statuses(&txs, &budgets, &march());
    assert_eq!(statuses[0].spent, dec("40"));
    assert!(metrics::unbudgeted_spend(&txs, &budgets, &march()).is_empty());
}

#[test]
fn utilization_guards_a_non_positive_limit() {
    let txs = vec![tx(d(2024, 3, 5), "40", "Food")];
    let budgets = vec![budget("Food", "0")];
    let statuses = metrics::budget_statuses(&txs, &budgets, &march());
    assert_eq!(statuses[0].utilization_pct, Decimal::ZERO);
}

#[test]
fn budgeted_plus_unbudgeted_partitions_total_expense() {
    let txs = vec![
        tx(d(2024, 3, 1), "120", "Food"),
        tx(d(2024, 3, 2), "80", "food"),
        tx(d(2024, 3, 3), "60", "Taxi"),
        tx(d(2024, 3, 4), "45.50", "Games"),
        tx(d(2024, 3, 5), "12.25", "Taxi"),
        tx(d(2024, 3, 6), "-500", "Salary"),
        tx(d(2024, 2, 28), "77", "Food"),
    ];
    let budgets = vec![budget("Food", "300"), budget("Rent", "900")];
    let p = march();

    let s = metrics::period_summary(&txs, &p);
    let spent: Decimal = metrics::budget_statuses(&txs, &budgets, &p)
        .iter()
        .map(|b| b.spent)
        .sum();
    let leaked: Decimal = metrics::unbudgeted_spend(&txs, &budgets, &p)
        .iter()
        .map(|l| l.spent)
        .sum();
    assert_eq!(spent + leaked, s.expense);
}

#[test]
fn leaks_are_grouped_and_sorted_descending() {
    let txs = vec![
        tx(d(2024, 3, 1), "10", "Taxi"),
        tx(d(2024, 3, 2), "25", "Games"),
        tx(d(2024, 3, 3), "30", "taxi"),
    ];
    let leaks = metrics::unbudgeted_spend(&txs, &[], &march());
    assert_eq!(leaks.len(), 2);
    assert_eq!(leaks[0].category, "Taxi");
    assert_eq!(leaks[0].spent, dec("40"));
    assert_eq!(leaks[1].category, "Games");
    assert_eq!(leaks[1].spent, dec("25"));
}

#[test]
fn breakdown_sorts_descending_and_skips_income() {
    let txs = vec![
        tx(d(2024, 3, 1), "10", "Taxi"),
        tx(d(2024, 3, 2), "200", "Rent"),
        tx(d(2024, 3, 3), "-50", "Salary"),
    ];
    let slices = metrics::category_breakdown(&txs, &march());
    let names: Vec<&str> = slices.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, ["Rent", "Taxi"]);
}

#[test]
fn goal_contribution_is_linear_ceiling_division() {
    let goal = FinancialGoal {
        id: 0,
        name: "Trip".into(),
        target_amount: dec("1200"),
        current_amount: Decimal::ZERO,
        deadline: d(2024, 7, 15),
    };
    // Exactly six months out.
    assert_eq!(goal.months_remaining(d(2024, 1, 15)), 6);
    assert_eq!(goal.monthly_contribution(d(2024, 1, 15)), dec("200"));
}

#[test]
fn goal_contribution_rounds_up() {
    let goal = FinancialGoal {
        id: 0,
        name: "Laptop".into(),
        target_amount: dec("1000"),
        current_amount: Decimal::ZERO,
        deadline: d(2024, 7, 15),
    };
    // 1000 / 6 = 166.66..., rounded up to whole units.
    assert_eq!(goal.monthly_contribution(d(2024, 1, 15)), dec("167"));
}

#[test]
fn met_or_overdue_goals_do_not_divide_by_zero() {
    let met = FinancialGoal {
        id: 0,
        name: "Done".into(),
        target_amount: dec("100"),
        current_amount: dec("150"),
        deadline: d(2024, 7, 15),
    };
    assert_eq!(met.monthly_contribution(d(2024, 1, 15)), Decimal::ZERO);

    let overdue = FinancialGoal {
        id: 0,
        name: "Late".into(),
        target_amount: dec("100"),
        current_amount: Decimal::ZERO,
        deadline: d(2024, 1, 10),
    };
    // Past deadline: everything still owed this month.
    assert_eq!(overdue.monthly_contribution(d(2024, 1, 15)), dec("100"));
}

#[test]
fn safe_to_spend_subtracts_goal_contributions() {
    let goals = vec![
        FinancialGoal {
            id: 0,
            name: "Trip".into(),
            target_amount: dec("1200"),
            current_amount: Decimal::ZERO,
            deadline: d(2024, 7, 15),
        },
        FinancialGoal {
            id: 1,
            name: "Fund".into(),
            target_amount: dec("600"),
            current_amount: dec("300"),
            deadline: d(2024, 4, 15),
        },
    ];
    // 200 + ceil(300/3)=100 committed out of 3000.
    let safe = metrics::safe_to_spend(dec("3000"), &goals, d(2024, 1, 15));
    assert_eq!(safe, dec("2700"));
}

#[test]
fn cashflow_fills_empty_months_with_zero_bars() {
    let txs = vec![
        tx(d(2024, 3, 5), "100", "Food"),
        tx(d(2024, 1, 10), "-500", "Salary"),
        tx(d(2023, 9, 1), "999", "Old"), // outside the window
    ];
    let bars = metrics::cashflow_series(&txs, 6, d(2024, 3, 15));
    assert_eq!(bars.len(), 6);
    assert_eq!(bars[0].month, "2023-10");
    assert_eq!(bars[5].month, "2024-03");
    assert_eq!(bars[3].income, dec("500")); // 2024-01
    assert_eq!(bars[5].expense, dec("100"));
    assert_eq!(bars[1].income, Decimal::ZERO);
    assert_eq!(bars[1].expense, Decimal::ZERO);
}
