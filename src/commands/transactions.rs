// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub account_id: Option<i64>,
    pub is_fixed: bool,
}

/// Insert a transaction and apply its balance delta to the linked account,
/// atomically. The inverse of `remove`: record-then-remove leaves every
/// balance unchanged.
pub fn record(conn: &mut Connection, tx: &NewTransaction) -> Result<i64> {
    let dbtx = conn.transaction()?;
    let id = insert_with_balance(&dbtx, tx)?;
    dbtx.commit()?;
    Ok(id)
}

/// Row-level insert + balance application for callers that already hold an
/// open SQLite transaction (bulk import).
pub fn insert_with_balance(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    if let Some(account_id) = tx.account_id {
        apply_balance(conn, account_id, tx.amount)?;
    }
    conn.execute(
        "INSERT INTO transactions(date, amount, category, description, account_id, is_fixed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            tx.date.to_string(),
            tx.amount.to_string(),
            tx.category,
            tx.description,
            tx.account_id,
            tx.is_fixed as i64
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete a transaction, reversing its effect on the linked account balance.
pub fn remove(conn: &mut Connection, id: i64) -> Result<()> {
    let dbtx = conn.transaction()?;
    let (amount_s, account_id): (String, Option<i64>) = dbtx
        .query_row(
            "SELECT amount, account_id FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .with_context(|| format!("Transaction {} not found", id))?;
    let amount = parse_decimal(&amount_s)?;
    if let Some(account_id) = account_id {
        apply_balance(&dbtx, account_id, -amount)?;
    }
    dbtx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    dbtx.commit()?;
    Ok(())
}

pub struct TxChanges {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<Option<i64>>,
}

/// Edit a transaction: the old balance delta is reversed, then the new one
/// applied, so balances always track the stored rows.
pub fn update(conn: &mut Connection, id: i64, changes: &TxChanges) -> Result<()> {
    let dbtx = conn.transaction()?;
    let (date_s, amount_s, category, description, account_id): (
        String,
        String,
        String,
        String,
        Option<i64>,
    ) = dbtx
        .query_row(
            "SELECT date, amount, category, description, account_id FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?)),
        )
        .with_context(|| format!("Transaction {} not found", id))?;
    let old_amount = parse_decimal(&amount_s)?;

    let new_date = changes.date.unwrap_or(parse_date(&date_s)?);
    let new_amount = changes.amount.unwrap_or(old_amount);
    let new_category = changes.category.clone().unwrap_or(category);
    let new_description = changes.description.clone().unwrap_or(description);
    let new_account_id = changes.account_id.unwrap_or(account_id);

    if let Some(acct) = account_id {
        apply_balance(&dbtx, acct, -old_amount)?;
    }
    if let Some(acct) = new_account_id {
        apply_balance(&dbtx, acct, new_amount)?;
    }
    dbtx.execute(
        "UPDATE transactions SET date=?1, amount=?2, category=?3, description=?4, account_id=?5
         WHERE id=?6",
        params![
            new_date.to_string(),
            new_amount.to_string(),
            new_category,
            new_description,
            new_account_id,
            id
        ],
    )?;
    dbtx.commit()?;
    Ok(())
}

/// Shift an account balance by the delta a signed transaction amount
/// implies for that account's type. Call with the negated amount to undo.
pub fn apply_balance(conn: &Connection, account_id: i64, amount: Decimal) -> Result<()> {
    let acct = db::get_account(conn, account_id)?;
    let new_balance = acct.balance + acct.r#type.balance_delta(amount);
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![new_balance.to_string(), account_id],
    )?;
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => Some(id_for_account(conn, name.trim())?),
        None => db::default_account(conn)?.map(|a| a.id),
    };
    let is_fixed = sub.get_flag("fixed");

    let id = record(
        conn,
        &NewTransaction {
            date,
            amount,
            category: category.clone(),
            description,
            account_id,
            is_fixed,
        },
    )?;
    let kind = if amount < Decimal::ZERO { "income" } else { "expense" };
    println!("Recorded {} #{}: {} / {} on {}", kind, id, amount, category, date);
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => Some(Some(id_for_account(conn, name.trim())?)),
        None => None,
    };
    let changes = TxChanges {
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        category: sub.get_one::<String>("category").map(|s| s.trim().to_string()),
        description: sub.get_one::<String>("description").map(|s| s.trim().to_string()),
        account_id,
    };
    update(conn, id, &changes)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    remove(conn, id)?;
    println!("Removed transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub account: String,
    pub is_fixed: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.amount, t.category, t.description, a.name, t.is_fixed
         FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND t.category=? COLLATE NOCASE");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let account: Option<String> = r.get(5)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            amount: r.get(2)?,
            category: r.get(3)?,
            description: r.get(4)?,
            account: account.unwrap_or_default(),
            is_fixed: r.get::<_, i64>(6)? != 0,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let profile = crate::profile::load(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                let amount = r
                    .amount
                    .parse::<Decimal>()
                    .map(|d| fmt_money(&d, &profile.currency))
                    .unwrap_or_else(|_| r.amount.clone());
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    amount,
                    r.category.clone(),
                    r.description.clone(),
                    r.account.clone(),
                    if r.is_fixed { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Amount", "Category", "Description", "Account", "Fixed"],
                rows,
            )
        );
    }
    Ok(())
}
