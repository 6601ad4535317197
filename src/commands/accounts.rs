// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::db;
use crate::models::AccountType;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("set-default", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            set_default(conn, name)?;
            println!("Default account is now '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            conn.execute("DELETE FROM accounts WHERE name=?1", params![name])?;
            println!("Removed account '{}'", name);
        }
        Some(("transfer", sub)) => transfer_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let r#type: AccountType = sub.get_one::<String>("type").unwrap().parse()?;
    let balance = match sub.get_one::<String>("balance") {
        Some(s) => parse_decimal(s)?,
        None => Decimal::ZERO,
    };
    let credit_limit = sub
        .get_one::<String>("credit_limit")
        .map(|s| parse_decimal(s))
        .transpose()?;
    conn.execute(
        "INSERT INTO accounts(name, type, balance, opening_balance, credit_limit, is_default)
         VALUES (?1,?2,?3,?3,?4,0)",
        params![
            name,
            r#type.to_string(),
            balance.to_string(),
            credit_limit.map(|d| d.to_string())
        ],
    )?;
    if sub.get_flag("default") {
        set_default(conn, name)?;
    }
    println!("Added account '{}' ({}, opening balance {})", name, r#type, balance);
    Ok(())
}

pub fn set_default(conn: &Connection, name: &str) -> Result<()> {
    let id = id_for_account(conn, name)?;
    conn.execute("UPDATE accounts SET is_default=0 WHERE is_default=1", [])?;
    conn.execute("UPDATE accounts SET is_default=1 WHERE id=?1", params![id])?;
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let accounts = db::load_accounts(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &accounts)? {
        let profile = crate::profile::load(conn)?;
        let rows: Vec<Vec<String>> = accounts
            .iter()
            .map(|a| {
                let balance_col = if a.r#type.is_debt() {
                    format!("{} owed", fmt_money(&a.balance, &profile.currency))
                } else {
                    fmt_money(&a.balance, &profile.currency)
                };
                vec![
                    a.name.clone(),
                    a.r#type.to_string(),
                    balance_col,
                    a.credit_limit
                        .map(|l| fmt_money(&l, &profile.currency))
                        .unwrap_or_default(),
                    if a.is_default { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Name", "Type", "Balance", "Credit Limit", "Default"], rows)
        );
    }
    Ok(())
}

/// Move money between two accounts atomically. Each side gets a zero-amount
/// marker transaction so account histories show the event without skewing
/// income/expense folds.
pub fn transfer(
    conn: &mut Connection,
    from_name: &str,
    to_name: &str,
    amount: Decimal,
    date: NaiveDate,
    note: Option<&str>,
) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Transfer amount must be positive, got {}", amount));
    }
    let dbtx = conn.transaction()?;
    let from_id = id_for_account(&dbtx, from_name)?;
    let to_id = id_for_account(&dbtx, to_name)?;
    if from_id == to_id {
        return Err(anyhow!("Cannot transfer '{}' to itself", from_name));
    }

    // Outgoing side behaves like an expense, incoming like income. Both
    // columns shift so replaying the ledger still reproduces the balance.
    apply_transfer_side(&dbtx, from_id, amount)?;
    apply_transfer_side(&dbtx, to_id, -amount)?;

    let description = match note {
        Some(n) => n.to_string(),
        None => format!("Transfer {} -> {}", from_name, to_name),
    };
    for account_id in [from_id, to_id] {
        dbtx.execute(
            "INSERT INTO transactions(date, amount, category, description, account_id, is_fixed)
             VALUES (?1, '0', 'Transfer', ?2, ?3, 0)",
            params![date.to_string(), description, account_id],
        )?;
    }
    dbtx.commit()?;
    Ok(())
}

fn apply_transfer_side(conn: &Connection, account_id: i64, amount: Decimal) -> Result<()> {
    let acct = db::get_account(conn, account_id)?;
    let delta = acct.r#type.balance_delta(amount);
    let opening_s: String = conn.query_row(
        "SELECT opening_balance FROM accounts WHERE id=?1",
        params![account_id],
        |r| r.get(0),
    )?;
    let opening = parse_decimal(&opening_s)? + delta;
    conn.execute(
        "UPDATE accounts SET balance=?1, opening_balance=?2 WHERE id=?3",
        params![(acct.balance + delta).to_string(), opening.to_string(), account_id],
    )?;
    Ok(())
}

fn transfer_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = sub.get_one::<String>("from").unwrap().trim().to_string();
    let to = sub.get_one::<String>("to").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.trim());
    transfer(conn, &from, &to, amount, date, note)?;
    println!("Transferred {} from '{}' to '{}' on {}", amount, from, to, date);
    Ok(())
}
