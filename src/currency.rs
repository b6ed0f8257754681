// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{CurrencyField, LedgerError};
use crate::models::{Account, Movement, TransactionType};
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3,5}$").expect("valid regex"));

/// Normalises a currency code typed by a user: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> Result<String, LedgerError> {
    let code = code.trim().to_uppercase();
    if CODE_RE.is_match(&code) {
        Ok(code)
    } else {
        Err(LedgerError::InvalidCurrency(code))
    }
}

/// Checks the declared currencies of a transaction against the accounts it touches.
///
/// `own` is the account issuing the call: the receiver for an income, the source for an
/// expense or transfer. Codes are compared exactly; no conversion takes place, so
/// `value_src` and `value_dest` may differ for a cross-currency transfer.
pub fn validate<M: Movement + ?Sized>(
    movement: &M,
    own: &Account,
    counterpart: Option<&Account>,
) -> Result<(), LedgerError> {
    match movement.transaction_type() {
        TransactionType::Income => {
            if movement.currency_dest() != own.currency {
                return Err(LedgerError::currency_mismatch(
                    CurrencyField::Destination,
                    &own.currency,
                    movement.currency_dest(),
                ));
            }
        }
        t @ (TransactionType::Expense | TransactionType::Transfer) => {
            let counterpart = counterpart
                .ok_or(LedgerError::MissingCounterpart { transaction_type: t })?;
            if movement.currency_dest() != counterpart.currency {
                return Err(LedgerError::currency_mismatch(
                    CurrencyField::Destination,
                    &counterpart.currency,
                    movement.currency_dest(),
                ));
            }
            if movement.currency_src() != own.currency {
                return Err(LedgerError::currency_mismatch(
                    CurrencyField::Source,
                    &own.currency,
                    movement.currency_src(),
                ));
            }
        }
    }
    Ok(())
}
