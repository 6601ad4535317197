// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

use crate::models::{Account, Budget, FinancialGoal, RecurringItem, Transaction};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("dev.pocketbook", "Pocketbook", "pocketbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("pocketbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        type TEXT NOT NULL CHECK(type IN ('cash','debit','credit','investment','loan')),
        balance TEXT NOT NULL DEFAULT '0',
        -- opening balance plus transfer adjustments: the part of the balance
        -- not derivable by replaying the transaction rows
        opening_balance TEXT NOT NULL DEFAULT '0',
        credit_limit TEXT,
        is_default INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount TEXT NOT NULL, -- signed: positive = expense, negative = income
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        account_id INTEGER,
        is_fixed INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL COLLATE NOCASE UNIQUE,
        limit_amount TEXT NOT NULL,
        color TEXT
    );

    CREATE TABLE IF NOT EXISTS goals(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        target_amount TEXT NOT NULL,
        current_amount TEXT NOT NULL DEFAULT '0',
        deadline TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS recurring(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        frequency TEXT NOT NULL CHECK(frequency IN ('weekly','biweekly','monthly','yearly')),
        next_date TEXT NOT NULL,
        is_variable INTEGER NOT NULL DEFAULT 0
    );
    "#,
    )?;
    Ok(())
}

fn parse_dec(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' in database", what, s))
}

fn parse_day(s: &str, what: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid {} '{}' in database", what, s))
}

pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, category, description, account_id, is_fixed
         FROM transactions ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        out.push(Transaction {
            id: r.get(0)?,
            date: parse_day(&date_s, "transaction date")?,
            amount: parse_dec(&amount_s, "transaction amount")?,
            category: r.get(3)?,
            description: r.get(4)?,
            account_id: r.get(5)?,
            is_fixed: r.get::<_, i64>(6)? != 0,
        });
    }
    Ok(out)
}

pub fn load_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt =
        conn.prepare("SELECT id, category, limit_amount, color FROM budgets ORDER BY category")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let limit_s: String = r.get(2)?;
        out.push(Budget {
            id: r.get(0)?,
            category: r.get(1)?,
            limit_amount: parse_dec(&limit_s, "budget limit")?,
            color: r.get(3)?,
        });
    }
    Ok(out)
}

pub fn load_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, balance, credit_limit, is_default FROM accounts ORDER BY name",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(account_from_row(r)?);
    }
    Ok(out)
}

pub fn get_account(conn: &Connection, id: i64) -> Result<Account> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, balance, credit_limit, is_default FROM accounts WHERE id=?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    let r = rows
        .next()?
        .with_context(|| format!("Account id {} not found", id))?;
    account_from_row(r)
}

pub fn default_account(conn: &Connection) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, balance, credit_limit, is_default
         FROM accounts WHERE is_default=1 LIMIT 1",
    )?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(r) => Ok(Some(account_from_row(r)?)),
        None => Ok(None),
    }
}

fn account_from_row(r: &rusqlite::Row<'_>) -> Result<Account> {
    let type_s: String = r.get(2)?;
    let balance_s: String = r.get(3)?;
    let credit_limit_s: Option<String> = r.get(4)?;
    Ok(Account {
        id: r.get(0)?,
        name: r.get(1)?,
        r#type: type_s.parse()?,
        balance: parse_dec(&balance_s, "account balance")?,
        credit_limit: credit_limit_s
            .map(|s| parse_dec(&s, "credit limit"))
            .transpose()?,
        is_default: r.get::<_, i64>(5)? != 0,
    })
}

pub fn load_goals(conn: &Connection) -> Result<Vec<FinancialGoal>> {
    let mut stmt = conn
        .prepare("SELECT id, name, target_amount, current_amount, deadline FROM goals ORDER BY deadline, name")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let target_s: String = r.get(2)?;
        let current_s: String = r.get(3)?;
        let deadline_s: String = r.get(4)?;
        out.push(FinancialGoal {
            id: r.get(0)?,
            name: r.get(1)?,
            target_amount: parse_dec(&target_s, "goal target")?,
            current_amount: parse_dec(&current_s, "goal progress")?,
            deadline: parse_day(&deadline_s, "goal deadline")?,
        });
    }
    Ok(out)
}

pub fn load_recurring(conn: &Connection) -> Result<Vec<RecurringItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, amount, category, frequency, next_date, is_variable
         FROM recurring ORDER BY next_date, name",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount_s: String = r.get(2)?;
        let freq_s: String = r.get(4)?;
        let next_s: String = r.get(5)?;
        out.push(RecurringItem {
            id: r.get(0)?,
            name: r.get(1)?,
            amount: parse_dec(&amount_s, "recurring amount")?,
            category: r.get(3)?,
            frequency: freq_s.parse()?,
            next_date: parse_day(&next_s, "recurring next date")?,
            is_variable: r.get::<_, i64>(6)? != 0,
        });
    }
    Ok(out)
}
