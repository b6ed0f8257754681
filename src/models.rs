// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ACCOUNT_KIND: &str = "account";
pub const TRANSACTION_KIND: &str = "transaction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
}

/// Every label the parser accepts. Bank exports use the capitalised plural forms.
const TYPE_ALIASES: &[(&str, TransactionType)] = &[
    ("expense", TransactionType::Expense),
    ("Expenses", TransactionType::Expense),
    ("income", TransactionType::Income),
    ("Income", TransactionType::Income),
    ("transfer", TransactionType::Transfer),
    ("Transfer", TransactionType::Transfer),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown transaction type '{label}', expected one of expense, income, transfer")]
pub struct ParseTransactionTypeError {
    pub label: String,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Income => "income",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Whether the type moves value out of a source account into a counterpart.
    pub fn requires_counterpart(&self) -> bool {
        !matches!(self, TransactionType::Income)
    }
}

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TYPE_ALIASES
            .iter()
            .find(|(label, _)| *label == s)
            .map(|(_, t)| *t)
            .ok_or_else(|| ParseTransactionTypeError {
                label: s.to_string(),
            })
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub balance: Decimal,
    pub currency: String,
    pub is_category: bool,
    pub icon: Option<String>,
}

impl Account {
    pub(crate) const COLUMNS: &'static str =
        "id, name, description, balance, currency, is_category, icon";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Account {
            id: r.get(0)?,
            name: r.get(1)?,
            description: r.get(2)?,
            balance: decimal_at(r, 3)?,
            currency: r.get(4)?,
            is_category: r.get(5)?,
            icon: r.get(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub description: Option<String>,
    pub currency: String,
    pub is_category: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub r#type: TransactionType,
    pub datetime: NaiveDateTime,
    pub src_account_id: Option<i64>,
    pub dest_account_id: Option<i64>,
    /// Value in source account currency.
    pub value_src: Decimal,
    pub currency_src: String,
    /// Value in destination account currency.
    pub value_dest: Decimal,
    pub currency_dest: String,
    pub r#where: Option<String>,
    pub description: Option<String>,
}

impl Transaction {
    pub(crate) const COLUMNS: &'static str = "t.id, t.type, t.datetime, t.src_account_id, \
         t.dest_account_id, t.value_src, t.currency_src, t.value_dest, t.currency_dest, \
         t.location, t.description";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Transaction {
            id: r.get(0)?,
            r#type: r.get(1)?,
            datetime: r.get(2)?,
            src_account_id: r.get(3)?,
            dest_account_id: r.get(4)?,
            value_src: decimal_at(r, 5)?,
            currency_src: r.get(6)?,
            value_dest: decimal_at(r, 7)?,
            currency_dest: r.get(8)?,
            r#where: r.get(9)?,
            description: r.get(10)?,
        })
    }
}

/// A transaction as submitted to the ledger, before account references are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub r#type: TransactionType,
    pub datetime: NaiveDateTime,
    pub value_src: Decimal,
    pub currency_src: String,
    pub value_dest: Decimal,
    pub currency_dest: String,
    pub r#where: Option<String>,
    pub description: Option<String>,
}

/// A stored transaction together with the display names of its linked accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub src_account_name: Option<String>,
    pub dest_account_name: Option<String>,
}

impl LinkedTransaction {
    pub(crate) const SELECT: &'static str = "SELECT t.id, t.type, t.datetime, t.src_account_id, \
         t.dest_account_id, t.value_src, t.currency_src, t.value_dest, t.currency_dest, \
         t.location, t.description, s.name, d.name \
         FROM transactions t \
         LEFT JOIN accounts s ON t.src_account_id = s.id \
         LEFT JOIN accounts d ON t.dest_account_id = d.id";

    pub(crate) fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(LinkedTransaction {
            transaction: Transaction::from_row(r)?,
            src_account_name: r.get(11)?,
            dest_account_name: r.get(12)?,
        })
    }
}

/// The value-moving part of a transaction, shared by submitted and stored ones.
pub trait Movement {
    fn transaction_type(&self) -> TransactionType;
    fn value_src(&self) -> Decimal;
    fn currency_src(&self) -> &str;
    fn value_dest(&self) -> Decimal;
    fn currency_dest(&self) -> &str;
}

impl Movement for NewTransaction {
    fn transaction_type(&self) -> TransactionType {
        self.r#type
    }
    fn value_src(&self) -> Decimal {
        self.value_src
    }
    fn currency_src(&self) -> &str {
        &self.currency_src
    }
    fn value_dest(&self) -> Decimal {
        self.value_dest
    }
    fn currency_dest(&self) -> &str {
        &self.currency_dest
    }
}

impl Movement for Transaction {
    fn transaction_type(&self) -> TransactionType {
        self.r#type
    }
    fn value_src(&self) -> Decimal {
        self.value_src
    }
    fn currency_src(&self) -> &str {
        &self.currency_src
    }
    fn value_dest(&self) -> Decimal {
        self.value_dest
    }
    fn currency_dest(&self) -> &str {
        &self.currency_dest
    }
}

/// Anything a unit of work can create, update or delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Account(Account),
    Transaction(LinkedTransaction),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Account(_) => ACCOUNT_KIND,
            Entity::Transaction(_) => TRANSACTION_KIND,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Entity::Account(a) => a.id,
            Entity::Transaction(t) => t.transaction.id,
        }
    }

    /// Resolves a projected field name such as `src_account.name`.
    pub fn field_value(&self, field: &str) -> Option<String> {
        match self {
            Entity::Account(a) => match field {
                "name" => Some(a.name.clone()),
                "description" => a.description.clone(),
                "currency" => Some(a.currency.clone()),
                _ => None,
            },
            Entity::Transaction(t) => match field {
                "description" => t.transaction.description.clone(),
                "where" => t.transaction.r#where.clone(),
                "src_account.name" => t.src_account_name.clone(),
                "dest_account.name" => t.dest_account_name.clone(),
                _ => None,
            },
        }
    }

    pub(crate) fn same_as(&self, other: &Entity) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }
}

pub(crate) fn decimal_at(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
