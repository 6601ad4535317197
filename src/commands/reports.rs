// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::metrics;
use crate::period::Period;
use crate::profile;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("leaks", sub)) => leaks(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct Overview {
    pub period: Period,
    pub days_left: i64,
    pub currency: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub monthly_limit: Decimal,
    pub safe_to_spend: Decimal,
}

/// The period dashboard: income/expense/net and savings rate for the
/// active period, plus the safe-to-spend ceiling (monthly limit minus what
/// the savings goals claim).
pub fn overview_report(conn: &Connection, today: NaiveDate) -> Result<Overview> {
    let p = profile::load(conn)?;
    let period = p.active_period(today);
    let txs = db::load_transactions(conn)?;
    let goals = db::load_goals(conn)?;
    let summary = metrics::period_summary(&txs, &period);
    let safe = metrics::safe_to_spend(p.monthly_limit, &goals, today);
    Ok(Overview {
        days_left: period.days_left(today),
        period,
        currency: p.currency,
        income: summary.income,
        expense: summary.expense,
        net: summary.net,
        savings_rate: summary.savings_rate,
        monthly_limit: p.monthly_limit,
        safe_to_spend: safe,
    })
}

fn as_of(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let o = overview_report(conn, as_of(sub)?)?;
    if !maybe_print_json(json_flag, jsonl_flag, &o)? {
        let rows = vec![
            vec!["Period".to_string(), o.period.label.clone()],
            vec![
                "Dates".to_string(),
                format!("{} – {}", o.period.start, o.period.end),
            ],
            vec!["Days left".to_string(), o.days_left.to_string()],
            vec!["Income".to_string(), fmt_money(&o.income, &o.currency)],
            vec!["Expense".to_string(), fmt_money(&o.expense, &o.currency)],
            vec!["Net".to_string(), fmt_money(&o.net, &o.currency)],
            vec!["Savings rate".to_string(), format!("{:.1}%", o.savings_rate)],
            vec![
                "Monthly limit".to_string(),
                fmt_money(&o.monthly_limit, &o.currency),
            ],
            vec![
                "Safe to spend".to_string(),
                fmt_money(&o.safe_to_spend, &o.currency),
            ],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: u32 = *sub.get_one::<u32>("months").unwrap_or(&6);
    let txs = db::load_transactions(conn)?;
    let bars = metrics::cashflow_series(&txs, months, as_of(sub)?);
    if !maybe_print_json(json_flag, jsonl_flag, &bars)? {
        let rows: Vec<Vec<String>> = bars
            .iter()
            .map(|b| {
                vec![
                    b.month.clone(),
                    format!("{:.2}", b.income),
                    format!("{:.2}", b.expense),
                    format!("{:.2}", b.income - b.expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = as_of(sub)?;
    let p = profile::load(conn)?;
    let period = p.active_period(today);
    let txs = db::load_transactions(conn)?;
    let slices = metrics::category_breakdown(&txs, &period);
    if !maybe_print_json(json_flag, jsonl_flag, &slices)? {
        println!("Period: {}", period.label);
        let rows: Vec<Vec<String>> = slices
            .iter()
            .map(|s| vec![s.category.clone(), format!("{:.2}", s.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}

fn leaks(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = as_of(sub)?;
    let p = profile::load(conn)?;
    let period = p.active_period(today);
    let txs = db::load_transactions(conn)?;
    let budgets = db::load_budgets(conn)?;
    let leaks = metrics::unbudgeted_spend(&txs, &budgets, &period);
    if !maybe_print_json(json_flag, jsonl_flag, &leaks)? {
        if leaks.is_empty() {
            println!("No unbudgeted spending in {}", period.label);
        } else {
            let rows: Vec<Vec<String>> = leaks
                .iter()
                .map(|l| vec![l.category.clone(), format!("{:.2}", l.spent)])
                .collect();
            println!("{}", pretty_table(&["Category", "Spent"], rows));
        }
    }
    Ok(())
}
