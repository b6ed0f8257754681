// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{account, books};
use fundtrail::currency;
use fundtrail::error::LedgerError;
use fundtrail::icon;
use fundtrail::models::{NewAccount, TransactionType};

#[test]
fn type_labels_parse_through_alias_table() {
    assert_eq!("expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
    assert_eq!("Expenses".parse::<TransactionType>(), Ok(TransactionType::Expense));
    assert_eq!("income".parse::<TransactionType>(), Ok(TransactionType::Income));
    assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
    assert_eq!("Transfer".parse::<TransactionType>(), Ok(TransactionType::Transfer));

    let err = "EXPENSE".parse::<TransactionType>().unwrap_err();
    assert_eq!(err.label, "EXPENSE");
    assert!("".parse::<TransactionType>().is_err());
}

#[test]
fn type_labels_display_canonically() {
    assert_eq!(TransactionType::Expense.to_string(), "expense");
    assert_eq!(
        serde_json::to_string(&TransactionType::Transfer).unwrap(),
        "\"transfer\""
    );
    assert!(!TransactionType::Income.requires_counterpart());
    assert!(TransactionType::Expense.requires_counterpart());
}

#[test]
fn currency_codes_are_normalised() {
    assert_eq!(currency::normalize_code(" eur ").unwrap(), "EUR");
    assert_eq!(currency::normalize_code("usdt").unwrap(), "USDT");
    assert!(matches!(
        currency::normalize_code("E1R"),
        Err(LedgerError::InvalidCurrency(_))
    ));
    assert!(currency::normalize_code("EURODOLLAR").is_err());
}

#[test]
fn account_creation_validates_input() {
    let mut books = books();
    let err = books
        .create_account(NewAccount {
            name: "   ".into(),
            description: None,
            currency: "EUR".into(),
            is_category: false,
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAccount(_)));

    let a = account(&mut books, "  Wallet ", "chf");
    assert_eq!(a.name, "Wallet");
    assert_eq!(a.currency, "CHF");
    assert!(a.balance.is_zero());

    // names are unique
    assert!(matches!(
        books.create_account(NewAccount {
            name: "Wallet".into(),
            description: None,
            currency: "CHF".into(),
            is_category: false,
        }),
        Err(LedgerError::Store(_))
    ));
}

#[test]
fn icon_is_stable_for_a_name() {
    let one = icon::icon_reference("  Alice ", 50);
    let two = icon::icon_reference("alice", 50);
    assert_eq!(one, two);
    assert!(one.starts_with("https://www.gravatar.com/avatar/"));
    assert!(one.ends_with("?d=identicon&s=50"));
    let hash = one
        .trim_start_matches("https://www.gravatar.com/avatar/")
        .split('?')
        .next()
        .unwrap();
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(one, icon::icon_reference("bob", 50));
}

#[test]
fn account_icon_is_generated_once_and_kept() {
    let mut books = books();
    let a = account(&mut books, "Groceries", "EUR");
    assert!(a.icon.is_none());

    let first = books.icon(a.id).unwrap();
    assert_eq!(first, icon::icon_reference("Groceries", icon::DEFAULT_ICON_SIZE));
    assert_eq!(books.account(a.id).unwrap().icon, Some(first.clone()));
    assert_eq!(books.icon(a.id).unwrap(), first);
}

#[test]
fn removing_an_account_in_use_fails() {
    let mut books = books();
    let a = account(&mut books, "Checking", "EUR");
    let spare = account(&mut books, "Spare", "EUR");
    books
        .add_transaction(
            common::tx(TransactionType::Income, "2024-03-01", "1", "EUR", "EUR", "x"),
            a.id,
            None,
        )
        .unwrap();

    assert!(books.remove_account(a.id).is_err());
    books.remove_account(spare.id).unwrap();
    assert!(matches!(
        books.account(spare.id),
        Err(LedgerError::AccountNotFound(_))
    ));
}
