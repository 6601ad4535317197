// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use serde::Serialize;

use crate::db;
use crate::metrics::{self, BudgetStatus, Leak};
use crate::period::Period;
use crate::profile;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let category = sub.get_one::<String>("category").unwrap().trim();
            conn.execute("DELETE FROM budgets WHERE category=?1", params![category])?;
            println!("Removed budget for '{}'", category);
        }
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub.get_one::<String>("category").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let color = sub.get_one::<String>("color").map(|s| s.trim().to_string());
    // One budget per category; the NOCASE unique index makes "Food" and
    // "food" the same envelope.
    conn.execute(
        "INSERT INTO budgets(category, limit_amount, color) VALUES (?1,?2,?3)
         ON CONFLICT(category) DO UPDATE SET
             limit_amount=excluded.limit_amount,
             color=COALESCE(excluded.color, budgets.color)",
        params![category, amount.to_string(), color],
    )?;
    println!("Budget set: {} = {}", category, amount);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budgets = db::load_budgets(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        let rows: Vec<Vec<String>> = budgets
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    b.limit_amount.to_string(),
                    b.color.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Limit", "Color"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
pub struct StatusReport {
    pub period: Period,
    pub budgets: Vec<BudgetStatus>,
    pub unbudgeted: Vec<Leak>,
}

/// Budget utilization plus the unbudgeted "leak" bucket for the period
/// containing `today`. Spent totals are always recomputed from the
/// transaction rows, never stored.
pub fn status_report(conn: &Connection, today: NaiveDate) -> Result<StatusReport> {
    let p = profile::load(conn)?;
    let period = p.active_period(today);
    let txs = db::load_transactions(conn)?;
    let budgets = db::load_budgets(conn)?;
    Ok(StatusReport {
        budgets: metrics::budget_statuses(&txs, &budgets, &period),
        unbudgeted: metrics::unbudgeted_spend(&txs, &budgets, &period),
        period,
    })
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let report = status_report(conn, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &report)? {
        println!("Period: {} ({} – {})", report.period.label, report.period.start, report.period.end);
        let rows: Vec<Vec<String>> = report
            .budgets
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    format!("{:.2}", b.limit_amount),
                    format!("{:.2}", b.spent),
                    format!("{:.2}", b.remaining),
                    format!("{:.1}%", b.utilization_pct),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Remaining", "Used"], rows)
        );
        if !report.unbudgeted.is_empty() {
            let rows: Vec<Vec<String>> = report
                .unbudgeted
                .iter()
                .map(|l| vec![l.category.clone(), format!("{:.2}", l.spent)])
                .collect();
            println!("Unbudgeted spending:");
            println!("{}", pretty_table(&["Category", "Spent"], rows));
        }
    }
    Ok(())
}
