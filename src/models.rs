// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown account type '{0}' (use cash|debit|credit|investment|loan)")]
    UnknownAccountType(String),
    #[error("unknown frequency '{0}' (use weekly|biweekly|monthly|yearly)")]
    UnknownFrequency(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Debit,
    Credit,
    Investment,
    Loan,
}

impl AccountType {
    /// Credit and loan balances track owed debt rather than held assets.
    pub fn is_debt(&self) -> bool {
        matches!(self, AccountType::Credit | AccountType::Loan)
    }

    /// Balance change caused by recording a transaction with the given
    /// signed amount (positive = expense, negative = income). The inverse
    /// delta must be applied when the transaction is deleted.
    pub fn balance_delta(&self, amount: Decimal) -> Decimal {
        if self.is_debt() { amount } else { -amount }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountType::Cash => "cash",
            AccountType::Debit => "debit",
            AccountType::Credit => "credit",
            AccountType::Investment => "investment",
            AccountType::Loan => "loan",
        };
        f.write_str(s)
    }
}

impl FromStr for AccountType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(AccountType::Cash),
            "debit" => Ok(AccountType::Debit),
            "credit" => Ok(AccountType::Credit),
            "investment" => Ok(AccountType::Investment),
            "loan" => Ok(AccountType::Loan),
            other => Err(ModelError::UnknownAccountType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub balance: Decimal,
    pub credit_limit: Option<Decimal>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    /// Signed: positive = expense, negative = income, zero = transfer marker.
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub account_id: Option<i64>,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub limit_amount: Decimal,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
}

impl FinancialGoal {
    /// Whole months from `today` until the deadline, zero if past.
    pub fn months_remaining(&self, today: NaiveDate) -> i64 {
        if self.deadline <= today {
            return 0;
        }
        let mut months = (self.deadline.year() as i64 - today.year() as i64) * 12
            + (self.deadline.month() as i64 - today.month() as i64);
        if self.deadline.day() < today.day() {
            months -= 1;
        }
        months.max(0)
    }

    /// Required contribution per month to hit the target by the deadline:
    /// ceil((target - current) / months remaining), months floored at one.
    pub fn monthly_contribution(&self, today: NaiveDate) -> Decimal {
        let remaining = self.target_amount - self.current_amount;
        if remaining <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let months = self.months_remaining(today).max(1);
        (remaining / Decimal::from(months)).ceil()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Next occurrence after `date`. Monthly/yearly steps clamp the day to
    /// the target month's length (Jan 31 -> Feb 28/29).
    pub fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Weekly => date.checked_add_days(Days::new(7)).unwrap_or(date),
            Frequency::Biweekly => date.checked_add_days(Days::new(14)).unwrap_or(date),
            Frequency::Monthly => date.checked_add_months(Months::new(1)).unwrap_or(date),
            Frequency::Yearly => date.checked_add_months(Months::new(12)).unwrap_or(date),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(ModelError::UnknownFrequency(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: i64,
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub frequency: Frequency,
    pub next_date: NaiveDate,
    /// Variable items need the actual amount confirmed before posting.
    pub is_variable: bool,
}
