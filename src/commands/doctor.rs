// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::db;
use crate::utils::{parse_decimal, pretty_table};

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = run_checks(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Consistency checks over the ledger. The stored account balance is a
/// denormalized running total; replaying the transaction history against
/// the opening balance must reproduce it exactly when all mutations went
/// through the commands.
pub fn run_checks(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let today = chrono::Utc::now().date_naive();

    // 1) Balance drift
    for acct in db::load_accounts(conn)? {
        let opening_s: String = conn.query_row(
            "SELECT opening_balance FROM accounts WHERE id=?1",
            params![acct.id],
            |r| r.get(0),
        )?;
        let mut expected = parse_decimal(&opening_s)?;
        let mut stmt =
            conn.prepare("SELECT amount FROM transactions WHERE account_id=?1")?;
        let mut cur = stmt.query(params![acct.id])?;
        while let Some(r) = cur.next()? {
            let amount_s: String = r.get(0)?;
            expected += acct.r#type.balance_delta(parse_decimal(&amount_s)?);
        }
        if expected != acct.balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "{}: stored {} but ledger replay gives {}",
                    acct.name, acct.balance, expected
                ),
            ]);
        }
    }

    // 2) Recurring items past due
    for item in db::load_recurring(conn)? {
        if item.next_date < today {
            rows.push(vec![
                "recurring_overdue".into(),
                format!("{}: due {} not yet posted", item.name, item.next_date),
            ]);
        }
    }

    // 3) Goals past deadline and unmet
    for goal in db::load_goals(conn)? {
        if goal.deadline < today && goal.current_amount < goal.target_amount {
            rows.push(vec![
                "goal_expired".into(),
                format!(
                    "{}: deadline {} passed at {} of {}",
                    goal.name, goal.deadline, goal.current_amount, goal.target_amount
                ),
            ]);
        }
    }

    // 4) Credit accounts over their limit
    for acct in db::load_accounts(conn)? {
        if let Some(limit) = acct.credit_limit {
            if acct.r#type.is_debt() && acct.balance > limit && limit > Decimal::ZERO {
                rows.push(vec![
                    "over_credit_limit".into(),
                    format!("{}: owes {} against limit {}", acct.name, acct.balance, limit),
                ]);
            }
        }
    }

    Ok(rows)
}
