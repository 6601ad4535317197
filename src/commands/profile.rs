// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::profile;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let p = profile::load(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &p)? {
        let rows = vec![
            vec!["Name".to_string(), p.name.clone()],
            vec!["Email".to_string(), p.email.clone()],
            vec!["Currency".to_string(), p.currency.clone()],
            vec!["Monthly limit".to_string(), p.monthly_limit.to_string()],
            vec!["Period type".to_string(), p.period_type.to_string()],
            vec!["Period start day".to_string(), p.period_start_day.to_string()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut p = profile::load(conn)?;
    if let Some(v) = sub.get_one::<String>("name") {
        p.name = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("email") {
        p.email = v.trim().to_string();
    }
    if let Some(v) = sub.get_one::<String>("currency") {
        p.currency = v.trim().to_uppercase();
    }
    if let Some(v) = sub.get_one::<String>("monthly_limit") {
        p.monthly_limit = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<String>("period_type") {
        p.period_type = v.parse()?;
    }
    if let Some(v) = sub.get_one::<u32>("period_start_day") {
        p.period_start_day = *v;
    }
    profile::save(conn, &p)?;
    println!("Profile updated ({} period, start day {})", p.period_type, p.period_start_day);
    Ok(())
}
