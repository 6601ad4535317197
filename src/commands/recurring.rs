// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::commands::transactions::{self, NewTransaction};
use crate::db;
use crate::models::{Frequency, RecurringItem};
use crate::utils::{id_for_account, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            conn.execute("DELETE FROM recurring WHERE name=?1", params![name])?;
            println!("Removed recurring item '{}'", name);
        }
        Some(("due", sub)) => due_cmd(conn, sub)?,
        Some(("post", sub)) => post_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim();
    let frequency: Frequency = sub.get_one::<String>("frequency").unwrap().parse()?;
    let next_date = parse_date(sub.get_one::<String>("next_date").unwrap())?;
    let is_variable = sub.get_flag("variable");
    conn.execute(
        "INSERT INTO recurring(name, amount, category, frequency, next_date, is_variable)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            name,
            amount.to_string(),
            category,
            frequency.to_string(),
            next_date.to_string(),
            is_variable as i64
        ],
    )?;
    println!("Added recurring '{}' ({}, next on {})", name, frequency, next_date);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let items = db::load_recurring(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        print_items(&items);
    }
    Ok(())
}

/// Items due on or before `as_of`.
pub fn due(conn: &Connection, as_of: NaiveDate) -> Result<Vec<RecurringItem>> {
    Ok(db::load_recurring(conn)?
        .into_iter()
        .filter(|i| i.next_date <= as_of)
        .collect())
}

fn due_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let as_of = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let items = due(conn, as_of)?;
    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        if items.is_empty() {
            println!("Nothing due on or before {}", as_of);
        } else {
            print_items(&items);
        }
    }
    Ok(())
}

fn print_items(items: &[RecurringItem]) {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|i| {
            vec![
                i.name.clone(),
                format!("{:.2}", i.amount),
                i.category.clone(),
                i.frequency.to_string(),
                i.next_date.to_string(),
                if i.is_variable { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Amount", "Category", "Frequency", "Next", "Variable"], rows)
    );
}

/// Post a recurring item as a real transaction and advance its schedule.
/// Variable items have no trustworthy stored amount, so the caller must
/// confirm one.
pub fn post(
    conn: &mut Connection,
    name: &str,
    amount_override: Option<Decimal>,
    date_override: Option<NaiveDate>,
    account_id: Option<i64>,
) -> Result<i64> {
    let item = db::load_recurring(conn)?
        .into_iter()
        .find(|i| i.name == name)
        .with_context(|| format!("Recurring item '{}' not found", name))?;
    if item.is_variable && amount_override.is_none() {
        return Err(anyhow!(
            "'{}' is a variable item; pass --amount to confirm the actual amount",
            name
        ));
    }
    let amount = amount_override.unwrap_or(item.amount);
    let date = date_override.unwrap_or(item.next_date);

    // One transaction for both writes: the posted row and the schedule
    // advance land together or not at all, so a failed post can be
    // retried without double-posting.
    let dbtx = conn.transaction()?;
    let id = transactions::insert_with_balance(
        &dbtx,
        &NewTransaction {
            date,
            amount,
            category: item.category.clone(),
            description: item.name.clone(),
            account_id,
            is_fixed: !item.is_variable,
        },
    )?;
    let next = item.frequency.advance(item.next_date);
    dbtx.execute(
        "UPDATE recurring SET next_date=?1 WHERE id=?2",
        params![next.to_string(), item.id],
    )?;
    dbtx.commit()?;
    Ok(id)
}

fn post_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let amount_override = sub
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let date_override = sub
        .get_one::<String>("date")
        .map(|s| parse_date(s))
        .transpose()?;
    let account_id = match sub.get_one::<String>("account") {
        Some(acct) => Some(id_for_account(conn, acct.trim())?),
        None => db::default_account(conn)?.map(|a| a.id),
    };
    let id = post(conn, &name, amount_override, date_override, account_id)?;
    println!("Posted '{}' as transaction {}", name, id);
    Ok(())
}
