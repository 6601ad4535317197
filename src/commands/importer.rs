// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::collections::{HashMap, hash_map::Entry};

use crate::commands::transactions::{NewTransaction, insert_with_balance};
use crate::utils::{parse_date, parse_decimal};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// CSV columns: date, amount, category, description, account, is_fixed.
/// The whole file lands in one SQLite transaction; a bad row aborts the
/// import with nothing applied.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("file").unwrap().trim();
    let fallback_account = sub.get_one::<String>("account").map(|s| s.trim().to_string());
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut account_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for result in rdr.records() {
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim().to_string();
        let amount_raw = rec.get(1).context("amount missing")?.trim().to_string();
        let category = rec.get(2).context("category missing")?.trim().to_string();
        let description = rec.get(3).unwrap_or("").trim().to_string();
        let account = rec
            .get(4)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .or_else(|| fallback_account.clone());
        let is_fixed = rec
            .get(5)
            .map(|s| matches!(s.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid transaction date '{}'", date_raw))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' for {}", amount_raw, category))?;

        let account_id = match account {
            Some(name) => Some(match account_cache.entry(name.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let id: i64 = tx
                        .query_row(
                            "SELECT id FROM accounts WHERE name=?1",
                            params![&name],
                            |r| r.get(0),
                        )
                        .with_context(|| format!("Account '{}' not found", name))?;
                    *entry.insert(id)
                }
            }),
            None => None,
        };

        insert_with_balance(
            &tx,
            &NewTransaction {
                date,
                amount,
                category,
                description,
                account_id,
                is_fixed,
            },
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", imported, path);
    Ok(())
}
