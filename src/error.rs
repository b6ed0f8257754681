// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TransactionType;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which declared currency of a transaction failed the policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyField {
    Source,
    Destination,
}

impl fmt::Display for CurrencyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyField::Source => f.write_str("source"),
            CurrencyField::Destination => f.write_str("destination"),
        }
    }
}

/// Which value of a transaction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    ValueSrc,
    ValueDest,
}

impl fmt::Display for ValueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueField::ValueSrc => f.write_str("value_src"),
            ValueField::ValueDest => f.write_str("value_dest"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Incorrect currency at {field}: {actual}, expected {expected}")]
    CurrencyMismatch {
        field: CurrencyField,
        expected: String,
        actual: String,
    },
    #[error("No counterpart account provided for {transaction_type} transaction")]
    MissingCounterpart { transaction_type: TransactionType },
    #[error("Counterpart of {transaction_type} transaction must differ from account [{account_id}]")]
    SameAccount {
        account_id: i64,
        transaction_type: TransactionType,
    },
    #[error("Account [{account_id}] did not issue transaction [{transaction_id}]:[{transaction_type}]")]
    NotParticipant {
        account_id: i64,
        transaction_id: i64,
        transaction_type: TransactionType,
    },
    #[error("Amount must not be negative for {field}: {value}")]
    NegativeAmount { field: ValueField, value: Decimal },
    #[error("Numeric overflow updating balance of account [{account_id}]")]
    Overflow { account_id: i64 },
    #[error("Account [{0}] not found")]
    AccountNotFound(String),
    #[error("Transaction [{0}] not found")]
    TransactionNotFound(i64),
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
    #[error("Invalid currency code '{0}', expected 3 to 5 letters")]
    InvalidCurrency(String),
    #[error("Entity kind '{0}' is not searchable")]
    UnknownKind(String),
    #[error("Field '{field}' is not indexed for kind '{kind}'")]
    UnknownField { kind: String, field: String },
    #[error("Search index unavailable for {kinds:?}: {reason}")]
    IndexUnavailable { kinds: Vec<String>, reason: String },
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn currency_mismatch(field: CurrencyField, expected: &str, actual: &str) -> Self {
        Self::CurrencyMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn account_not_found(id: i64) -> Self {
        Self::AccountNotFound(id.to_string())
    }
}
