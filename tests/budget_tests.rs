// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::commands::budgets;
use pocketbook::period::PeriodType;
use pocketbook::{cli, db, profile};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    let p = profile::Profile {
        monthly_limit: "2000".parse().unwrap(),
        period_type: PeriodType::Monthly,
        period_start_day: 1,
        ..profile::Profile::default()
    };
    profile::save(&conn, &p).unwrap();
    conn
}

fn run_budget(conn: &Connection, args: &[&str]) {
    let mut full = vec!["pocketbook", "budget"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    let (_, budget_m) = matches.subcommand().unwrap();
    budgets::handle(conn, budget_m).unwrap();
}

fn add_tx(conn: &Connection, date: &str, amount: &str, category: &str) {
    conn.execute(
        "INSERT INTO transactions(date, amount, category) VALUES (?1, ?2, ?3)",
        rusqlite::params![date, amount, category],
    )
    .unwrap();
}

#[test]
fn set_upserts_one_budget_per_category_ignoring_case() {
    let conn = setup();
    run_budget(&conn, &["set", "Food", "200"]);
    run_budget(&conn, &["set", "food", "300"]);

    let budgets = db::load_budgets(&conn).unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].limit_amount, Decimal::from(300));
}

#[test]
fn set_keeps_color_when_not_repassed() {
    let conn = setup();
    run_budget(&conn, &["set", "Food", "200", "--color", "#ff0000"]);
    run_budget(&conn, &["set", "Food", "250"]);

    let budgets = db::load_budgets(&conn).unwrap();
    assert_eq!(budgets[0].color.as_deref(), Some("#ff0000"));
    assert_eq!(budgets[0].limit_amount, Decimal::from(250));
}

#[test]
fn status_recomputes_spent_from_period_transactions() {
    let conn = setup();
    run_budget(&conn, &["set", "Food", "200"]);
    add_tx(&conn, "2024-03-05", "100", "Food");
    add_tx(&conn, "2024-02-27", "75", "Food"); // prior period
    add_tx(&conn, "2024-03-09", "42", "Taxi"); // unbudgeted

    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let report = budgets::status_report(&conn, today).unwrap();
    assert_eq!(report.period.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    assert_eq!(report.budgets.len(), 1);
    assert_eq!(report.budgets[0].spent, Decimal::from(100));
    assert_eq!(report.budgets[0].remaining, Decimal::from(100));

    assert_eq!(report.unbudgeted.len(), 1);
    assert_eq!(report.unbudgeted[0].category, "Taxi");
    assert_eq!(report.unbudgeted[0].spent, Decimal::from(42));
}

#[test]
fn status_follows_the_profile_cadence() {
    let conn = setup();
    let mut p = profile::load(&conn).unwrap();
    p.period_type = PeriodType::Monthly;
    p.period_start_day = 15;
    profile::save(&conn, &p).unwrap();

    run_budget(&conn, &["set", "Food", "200"]);
    add_tx(&conn, "2024-02-20", "60", "Food"); // inside Feb 15 - Mar 14
    add_tx(&conn, "2024-02-10", "40", "Food"); // before the cycle began

    let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let report = budgets::status_report(&conn, today).unwrap();
    assert_eq!(report.period.start, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    assert_eq!(report.budgets[0].spent, Decimal::from(60));
}

#[test]
fn profile_rejects_out_of_range_start_day() {
    let conn = setup();
    let mut p = profile::load(&conn).unwrap();
    p.period_start_day = 32;
    assert!(profile::save(&conn, &p).is_err());
}

#[test]
fn profile_round_trips_and_merges_over_defaults() {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();

    // Nothing stored yet: defaults apply.
    let fresh = profile::load(&conn).unwrap();
    assert_eq!(fresh.currency, "USD");
    assert_eq!(fresh.period_type, PeriodType::Monthly);
    assert_eq!(fresh.period_start_day, 1);

    // A partial write still loads: stored keys win, the rest stay default.
    conn.execute(
        "INSERT INTO settings(key, value) VALUES ('period_type', 'biweekly')",
        [],
    )
    .unwrap();
    let partial = profile::load(&conn).unwrap();
    assert_eq!(partial.period_type, PeriodType::Biweekly);
    assert_eq!(partial.currency, "USD");

    let saved = profile::Profile {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        currency: "EUR".into(),
        monthly_limit: "1500".parse().unwrap(),
        period_type: PeriodType::Bimonthly,
        period_start_day: 15,
    };
    profile::save(&conn, &saved).unwrap();
    assert_eq!(profile::load(&conn).unwrap(), saved);
}
