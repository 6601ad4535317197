// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::commands::transactions::{self, NewTransaction};
use pocketbook::commands::{accounts, doctor};
use pocketbook::db;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(name, type, balance, opening_balance, is_default)
            VALUES ('Wallet', 'cash', '500', '500', 1);
        INSERT INTO accounts(name, type, balance, opening_balance)
            VALUES ('Savings', 'debit', '2000', '2000');
        INSERT INTO accounts(name, type, balance, opening_balance, credit_limit)
            VALUES ('Visa', 'credit', '100', '100', '1000');
        "#,
    )
    .unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn balance(conn: &Connection, name: &str) -> Decimal {
    db::load_accounts(conn)
        .unwrap()
        .into_iter()
        .find(|a| a.name == name)
        .unwrap()
        .balance
}

#[test]
fn transfer_moves_balance_between_asset_accounts() {
    let mut conn = setup();
    accounts::transfer(&mut conn, "Savings", "Wallet", dec("300"), d("2024-03-05"), None).unwrap();
    assert_eq!(balance(&conn, "Savings"), dec("1700"));
    assert_eq!(balance(&conn, "Wallet"), dec("800"));
}

#[test]
fn transfer_to_credit_account_pays_down_debt() {
    let mut conn = setup();
    accounts::transfer(&mut conn, "Wallet", "Visa", dec("100"), d("2024-03-05"), None).unwrap();
    assert_eq!(balance(&conn, "Wallet"), dec("400"));
    assert_eq!(balance(&conn, "Visa"), Decimal::ZERO);
}

#[test]
fn transfer_leaves_zero_amount_markers_on_both_sides() {
    let mut conn = setup();
    accounts::transfer(&mut conn, "Savings", "Wallet", dec("300"), d("2024-03-05"), Some("topup"))
        .unwrap();
    let txs = db::load_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 2);
    for t in &txs {
        assert_eq!(t.amount, Decimal::ZERO);
        assert_eq!(t.category, "Transfer");
        assert_eq!(t.description, "topup");
    }
}

#[test]
fn transfer_rejects_non_positive_amounts_and_self_transfer() {
    let mut conn = setup();
    assert!(accounts::transfer(&mut conn, "Wallet", "Savings", dec("0"), d("2024-03-05"), None).is_err());
    assert!(accounts::transfer(&mut conn, "Wallet", "Wallet", dec("10"), d("2024-03-05"), None).is_err());
    // Nothing changed.
    assert_eq!(balance(&conn, "Wallet"), dec("500"));
    assert_eq!(balance(&conn, "Savings"), dec("2000"));
}

#[test]
fn doctor_is_quiet_on_a_ledger_maintained_through_commands() {
    let mut conn = setup();
    transactions::record(
        &mut conn,
        &NewTransaction {
            date: d("2024-03-05"),
            amount: dec("120"),
            category: "Food".into(),
            description: String::new(),
            account_id: Some(1),
            is_fixed: false,
        },
    )
    .unwrap();
    accounts::transfer(&mut conn, "Savings", "Wallet", dec("300"), d("2024-03-06"), None).unwrap();

    let issues = doctor::run_checks(&conn).unwrap();
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[test]
fn doctor_flags_hand_edited_balances() {
    let conn = setup();
    conn.execute("UPDATE accounts SET balance='9999' WHERE name='Wallet'", [])
        .unwrap();
    let issues = doctor::run_checks(&conn).unwrap();
    assert!(issues.iter().any(|r| r[0] == "balance_drift" && r[1].contains("Wallet")));
}

#[test]
fn doctor_flags_credit_over_limit() {
    let conn = setup();
    conn.execute(
        "UPDATE accounts SET balance='1500', opening_balance='1500' WHERE name='Visa'",
        [],
    )
    .unwrap();
    let issues = doctor::run_checks(&conn).unwrap();
    assert!(issues.iter().any(|r| r[0] == "over_credit_limit"));
}
