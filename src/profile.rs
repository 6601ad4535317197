// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::{Period, PeriodType, resolve_period};

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("period start day {0} out of range (1-31)")]
    StartDayOutOfRange(u32),
}

/// The user profile, backed by the settings table. One explicit load/save
/// pair; stored values win over defaults on load, so a partially-written
/// profile still resolves to something usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub currency: String,
    /// Spending ceiling per period; safe-to-spend subtracts goal
    /// contributions from this.
    pub monthly_limit: Decimal,
    pub period_type: PeriodType,
    pub period_start_day: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: String::new(),
            email: String::new(),
            currency: "USD".to_string(),
            monthly_limit: Decimal::ZERO,
            period_type: PeriodType::Monthly,
            period_start_day: 1,
        }
    }
}

impl Profile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.period_start_day < 1 || self.period_start_day > 31 {
            return Err(ProfileError::StartDayOutOfRange(self.period_start_day));
        }
        Ok(())
    }

    pub fn active_period(&self, today: NaiveDate) -> Period {
        resolve_period(self.period_type, self.period_start_day, today)
    }
}

pub fn load(conn: &Connection) -> Result<Profile> {
    let mut p = Profile::default();
    if let Some(v) = get(conn, "name")? {
        p.name = v;
    }
    if let Some(v) = get(conn, "email")? {
        p.email = v;
    }
    if let Some(v) = get(conn, "currency")? {
        p.currency = v;
    }
    if let Some(v) = get(conn, "monthly_limit")? {
        p.monthly_limit = v
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored monthly_limit '{}'", v))?;
    }
    if let Some(v) = get(conn, "period_type")? {
        p.period_type = v.parse()?;
    }
    if let Some(v) = get(conn, "period_start_day")? {
        p.period_start_day = v
            .parse::<u32>()
            .with_context(|| format!("Invalid stored period_start_day '{}'", v))?;
    }
    Ok(p)
}

pub fn save(conn: &Connection, profile: &Profile) -> Result<()> {
    profile.validate()?;
    set(conn, "name", &profile.name)?;
    set(conn, "email", &profile.email)?;
    set(conn, "currency", &profile.currency)?;
    set(conn, "monthly_limit", &profile.monthly_limit.to_string())?;
    set(conn, "period_type", &profile.period_type.to_string())?;
    set(conn, "period_start_day", &profile.period_start_day.to_string())?;
    Ok(())
}

fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| r.get(0))
        .optional()?;
    Ok(v)
}

fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
