// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance rules for transactions.
//!
//! | type     | own account   | counterpart   |
//! |----------|---------------|---------------|
//! | income   | `+value_dest` | none          |
//! | expense  | `-value_src`  | `+value_dest` |
//! | transfer | `-value_src`  | `+value_dest` |
//!
//! The own account is the receiver of an income and the source of an expense or
//! transfer. Removing a transaction applies the exact negation.

use crate::currency;
use crate::error::{LedgerError, ValueField};
use crate::models::{Account, LinkedTransaction, Movement, NewTransaction, Transaction, TransactionType};
use crate::store::{self, UnitOfWork};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

#[derive(Clone, Copy)]
enum Direction {
    Apply,
    Reverse,
}

fn check_values<M: Movement + ?Sized>(movement: &M) -> Result<(), LedgerError> {
    if movement.value_src() < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount {
            field: ValueField::ValueSrc,
            value: movement.value_src(),
        });
    }
    if movement.value_dest() < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount {
            field: ValueField::ValueDest,
            value: movement.value_dest(),
        });
    }
    Ok(())
}

fn shifted(account: &Account, delta: Decimal) -> Result<Decimal, LedgerError> {
    account
        .balance
        .checked_add(delta)
        .ok_or(LedgerError::Overflow {
            account_id: account.id,
        })
}

fn post<M: Movement + ?Sized>(
    movement: &M,
    own: &mut Account,
    counterpart: Option<&mut Account>,
    direction: Direction,
) -> Result<(), LedgerError> {
    currency::validate(movement, own, counterpart.as_deref())?;
    check_values(movement)?;
    let sign = match direction {
        Direction::Apply => Decimal::ONE,
        Direction::Reverse => Decimal::NEGATIVE_ONE,
    };
    match movement.transaction_type() {
        TransactionType::Income => {
            own.balance = shifted(own, sign * movement.value_dest())?;
        }
        t @ (TransactionType::Expense | TransactionType::Transfer) => {
            let counterpart =
                counterpart.ok_or(LedgerError::MissingCounterpart { transaction_type: t })?;
            // Both balances are computed before either is written.
            let own_balance = shifted(own, -sign * movement.value_src())?;
            let counterpart_balance = shifted(counterpart, sign * movement.value_dest())?;
            own.balance = own_balance;
            counterpart.balance = counterpart_balance;
        }
    }
    Ok(())
}

/// Applies a transaction to in-memory balances. On error neither account changes.
pub fn apply<M: Movement + ?Sized>(
    movement: &M,
    own: &mut Account,
    counterpart: Option<&mut Account>,
) -> Result<(), LedgerError> {
    post(movement, own, counterpart, Direction::Apply)
}

/// Undoes [`apply`]. On error neither account changes.
pub fn reverse<M: Movement + ?Sized>(
    movement: &M,
    own: &mut Account,
    counterpart: Option<&mut Account>,
) -> Result<(), LedgerError> {
    post(movement, own, counterpart, Direction::Reverse)
}

/// Records `new` inside `uow`: validates it, moves the balances and inserts the row.
///
/// For an income `own_id` is the receiving account and `counterpart_id` is ignored;
/// otherwise `own_id` is the source and `counterpart_id` the destination.
pub fn add_transaction(
    uow: &mut UnitOfWork<'_>,
    new: &NewTransaction,
    own_id: i64,
    counterpart_id: Option<i64>,
) -> Result<LinkedTransaction, LedgerError> {
    let mut own = uow.account(own_id)?;
    let mut counterpart = match (new.r#type, counterpart_id) {
        (TransactionType::Income, _) => None,
        (t, Some(id)) if id == own_id => {
            return Err(LedgerError::SameAccount {
                account_id: own_id,
                transaction_type: t,
            });
        }
        (_, Some(id)) => Some(uow.account(id)?),
        (_, None) => None,
    };

    apply(new, &mut own, counterpart.as_mut())?;

    uow.save_balance(&own)?;
    if let Some(c) = &counterpart {
        uow.save_balance(c)?;
    }
    let linked = match new.r#type {
        TransactionType::Income => uow.insert_transaction(new, None, Some(&own))?,
        _ => uow.insert_transaction(new, Some(&own), counterpart.as_ref())?,
    };
    info!(
        "Transaction [{}]:[{}] recorded for account [{}]",
        linked.transaction.id, new.r#type, own_id
    );
    Ok(linked)
}

/// Removes a stored transaction inside `uow`, reversing its effect. The counterpart is
/// taken from the transaction itself; `own_id` must be the account that issued it.
pub fn remove_transaction(
    uow: &mut UnitOfWork<'_>,
    transaction_id: i64,
    own_id: i64,
) -> Result<(), LedgerError> {
    let linked = uow.linked_transaction(transaction_id)?;
    let t = &linked.transaction;
    let issuer = match t.r#type {
        TransactionType::Income => t.dest_account_id,
        _ => t.src_account_id,
    };
    if issuer != Some(own_id) {
        return Err(LedgerError::NotParticipant {
            account_id: own_id,
            transaction_id,
            transaction_type: t.r#type,
        });
    }

    let mut own = uow.account(own_id)?;
    let mut counterpart = match t.r#type {
        TransactionType::Income => None,
        _ => t.dest_account_id.map(|id| uow.account(id)).transpose()?,
    };

    reverse(t, &mut own, counterpart.as_mut())?;

    uow.save_balance(&own)?;
    if let Some(c) = &counterpart {
        uow.save_balance(c)?;
    }
    let kind = t.r#type;
    uow.delete_transaction(linked)?;
    info!(
        "Transaction [{}]:[{}] removed from account [{}]",
        transaction_id, kind, own_id
    );
    Ok(())
}

/// Midnight on the first day of the month before the one containing `today`.
pub fn window_start(today: NaiveDate) -> NaiveDateTime {
    let first_of_month = today - Duration::days(today.day0() as i64);
    let last_of_previous = first_of_month - Duration::days(1);
    let first_of_previous = last_of_previous - Duration::days(last_of_previous.day0() as i64);
    first_of_previous.and_time(NaiveTime::MIN)
}

/// Signed effect of `transactions` on `account_id`: incoming `value_dest` added,
/// outgoing `value_src` subtracted.
pub fn movement_for(account_id: i64, transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |mut acc, t| {
        if t.dest_account_id == Some(account_id) {
            acc += t.value_dest;
        }
        if t.src_account_id == Some(account_id) {
            acc -= t.value_src;
        }
        acc
    })
}

pub fn transactions_for_window(
    conn: &Connection,
    account_id: i64,
    today: NaiveDate,
) -> Result<Vec<Transaction>, LedgerError> {
    store::load_account(conn, account_id)?;
    store::transactions_since(conn, account_id, window_start(today))
}

pub fn net_movement_for_window(
    conn: &Connection,
    account_id: i64,
    today: NaiveDate,
) -> Result<Decimal, LedgerError> {
    let transactions = transactions_for_window(conn, account_id, today)?;
    Ok(movement_for(account_id, &transactions))
}

/// Balance recomputed from every transaction of the account, for reconciliation
/// against the stored one.
pub fn derived_balance(conn: &Connection, account_id: i64) -> Result<Decimal, LedgerError> {
    let transactions = store::transactions_touching(conn, account_id)?;
    Ok(movement_for(account_id, &transactions))
}
