// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Budget, FinancialGoal, Transaction};
use crate::period::Period;

/// Derived income/expense totals for one period. Every function in this
/// module is a stateless fold over already-loaded rows; nothing here reads
/// storage or mutates anything.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// net / income * 100, zero when there is no income.
    pub savings_rate: Decimal,
}

pub fn period_summary(txs: &[Transaction], period: &Period) -> PeriodSummary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for t in txs.iter().filter(|t| period.contains(t.date)) {
        if t.amount < Decimal::ZERO {
            income += -t.amount;
        } else if t.amount > Decimal::ZERO {
            expense += t.amount;
        }
        // Zero amounts are transfer markers and count toward neither side.
    }
    let net = income - expense;
    let savings_rate = if income.is_zero() {
        Decimal::ZERO
    } else {
        net / income * Decimal::ONE_HUNDRED
    };
    PeriodSummary {
        income,
        expense,
        net,
        savings_rate,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub limit_amount: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    /// spent / limit * 100, zero when the limit is not positive.
    pub utilization_pct: Decimal,
    pub color: Option<String>,
}

pub fn budget_statuses(txs: &[Transaction], budgets: &[Budget], period: &Period) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| {
            let spent: Decimal = txs
                .iter()
                .filter(|t| {
                    period.contains(t.date)
                        && t.amount > Decimal::ZERO
                        && same_category(&t.category, &b.category)
                })
                .map(|t| t.amount)
                .sum();
            let utilization_pct = if b.limit_amount <= Decimal::ZERO {
                Decimal::ZERO
            } else {
                spent / b.limit_amount * Decimal::ONE_HUNDRED
            };
            BudgetStatus {
                category: b.category.clone(),
                limit_amount: b.limit_amount,
                spent,
                remaining: b.limit_amount - spent,
                utilization_pct,
                color: b.color.clone(),
            }
        })
        .collect()
}

/// In-period expense in a category with no budget entry.
#[derive(Debug, Clone, Serialize)]
pub struct Leak {
    pub category: String,
    pub spent: Decimal,
}

/// In-period expenses whose category has no matching budget, grouped per
/// category and sorted by size descending. Together with the per-budget
/// spent totals this partitions the period's expense exactly.
pub fn unbudgeted_spend(txs: &[Transaction], budgets: &[Budget], period: &Period) -> Vec<Leak> {
    let mut groups: BTreeMap<String, (String, Decimal)> = BTreeMap::new();
    for t in txs.iter().filter(|t| period.contains(t.date) && t.amount > Decimal::ZERO) {
        if budgets.iter().any(|b| same_category(&b.category, &t.category)) {
            continue;
        }
        let key = t.category.trim().to_ascii_lowercase();
        let entry = groups
            .entry(key)
            .or_insert_with(|| (t.category.trim().to_string(), Decimal::ZERO));
        entry.1 += t.amount;
    }
    let mut leaks: Vec<Leak> = groups
        .into_values()
        .map(|(category, spent)| Leak { category, spent })
        .collect();
    leaks.sort_by(|a, b| b.spent.cmp(&a.spent).then(a.category.cmp(&b.category)));
    leaks
}

/// Discretionary ceiling: the monthly limit minus what the savings goals
/// claim this month. Distinct from the raw monthly limit.
pub fn safe_to_spend(monthly_limit: Decimal, goals: &[FinancialGoal], today: NaiveDate) -> Decimal {
    let committed: Decimal = goals.iter().map(|g| g.monthly_contribution(today)).sum();
    monthly_limit - committed
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySlice {
    pub category: String,
    pub total: Decimal,
}

/// Per-category expense totals for the period, largest first. Categories
/// with a zero total are excluded from the breakdown.
pub fn category_breakdown(txs: &[Transaction], period: &Period) -> Vec<CategorySlice> {
    let mut groups: BTreeMap<String, (String, Decimal)> = BTreeMap::new();
    for t in txs.iter().filter(|t| period.contains(t.date) && t.amount > Decimal::ZERO) {
        let key = t.category.trim().to_ascii_lowercase();
        let entry = groups
            .entry(key)
            .or_insert_with(|| (t.category.trim().to_string(), Decimal::ZERO));
        entry.1 += t.amount;
    }
    let mut slices: Vec<CategorySlice> = groups
        .into_values()
        .filter(|(_, total)| !total.is_zero())
        .map(|(category, total)| CategorySlice { category, total })
        .collect();
    slices.sort_by(|a, b| b.total.cmp(&a.total).then(a.category.cmp(&b.category)));
    slices
}

#[derive(Debug, Clone, Serialize)]
pub struct CashflowBar {
    /// Calendar month, YYYY-MM.
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income/expense bars for the last `months` calendar months ending with
/// the month containing `today`, oldest first. Months without transactions
/// appear as zero bars so charts keep a fixed width.
pub fn cashflow_series(txs: &[Transaction], months: u32, today: NaiveDate) -> Vec<CashflowBar> {
    let months = months.max(1);
    let mut keys = Vec::with_capacity(months as usize);
    for back in (0..months).rev() {
        let d = today.checked_sub_months(Months::new(back)).unwrap_or(today);
        keys.push(format!("{:04}-{:02}", d.year(), d.month()));
    }
    let mut map: BTreeMap<&str, (Decimal, Decimal)> = keys
        .iter()
        .map(|k| (k.as_str(), (Decimal::ZERO, Decimal::ZERO)))
        .collect();
    for t in txs {
        let key = format!("{:04}-{:02}", t.date.year(), t.date.month());
        if let Some(entry) = map.get_mut(key.as_str()) {
            if t.amount < Decimal::ZERO {
                entry.0 += -t.amount;
            } else if t.amount > Decimal::ZERO {
                entry.1 += t.amount;
            }
        }
    }
    keys.iter()
        .map(|k| {
            let (income, expense) = map[k.as_str()];
            CashflowBar {
                month: k.clone(),
                income,
                expense,
            }
        })
        .collect()
}

fn same_category(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
