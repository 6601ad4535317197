// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::db;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let new_total = contribute(conn, name, amount)?;
            println!("Goal '{}' now at {}", name, new_total);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            conn.execute("DELETE FROM goals WHERE name=?1", params![name])?;
            println!("Removed goal '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    let deadline = parse_date(sub.get_one::<String>("deadline").unwrap())?;
    let current = match sub.get_one::<String>("current") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    conn.execute(
        "INSERT INTO goals(name, target_amount, current_amount, deadline) VALUES (?1,?2,?3,?4)",
        params![name, target.to_string(), current.to_string(), deadline.to_string()],
    )?;
    println!("Added goal '{}': {} by {}", name, target, deadline);
    Ok(())
}

/// Add progress toward a goal. Returns the new saved total.
pub fn contribute(conn: &Connection, name: &str, amount: Decimal) -> Result<Decimal> {
    let current_s: String = conn
        .query_row(
            "SELECT current_amount FROM goals WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .with_context(|| format!("Goal '{}' not found", name))?;
    let new_total = parse_decimal(&current_s)? + amount;
    conn.execute(
        "UPDATE goals SET current_amount=?1 WHERE name=?2",
        params![new_total.to_string(), name],
    )?;
    Ok(new_total)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let goals = db::load_goals(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &goals)? {
        let rows: Vec<Vec<String>> = goals
            .iter()
            .map(|g| {
                vec![
                    g.name.clone(),
                    format!("{:.2}", g.current_amount),
                    format!("{:.2}", g.target_amount),
                    g.deadline.to_string(),
                    g.months_remaining(today).to_string(),
                    format!("{:.2}", g.monthly_contribution(today)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Goal", "Saved", "Target", "Deadline", "Months Left", "Monthly"],
                rows,
            )
        );
    }
    Ok(())
}
