// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{account, books, category, dec, tx};
use fundtrail::books::Books;
use fundtrail::commands::transactions::{self, Draft};
use fundtrail::index::MemoryIndex;
use fundtrail::models::TransactionType;
use fundtrail::{cli, commands};

fn setup() -> Books<MemoryIndex> {
    let mut books = books();
    let a = account(&mut books, "A1", "USD");
    let cat = category(&mut books, "Cat1", "USD");
    for i in 1..=3 {
        books
            .add_transaction(
                tx(
                    TransactionType::Expense,
                    &format!("2025-01-0{}", i),
                    "10",
                    "USD",
                    "USD",
                    "P",
                ),
                a.id,
                Some(cat.id),
            )
            .unwrap();
    }
    books
}

#[test]
fn list_limit_respected() {
    let books = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["fundtrail", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(books.connection(), list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].datetime, "2025-01-03 12:00:00");
            assert_eq!(rows[0].from, "A1");
            assert_eq!(rows[0].to, "Cat1");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_account_on_either_side() {
    let mut books = setup();
    let other = account(&mut books, "Other", "USD");
    books
        .add_transaction(
            tx(TransactionType::Income, "2025-01-05", "1", "USD", "USD", "gift"),
            other.id,
            None,
        )
        .unwrap();

    let matches = cli::build_cli().get_matches_from(["fundtrail", "tx", "list", "--account", "Cat1"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert_eq!(transactions::query_rows(books.connection(), list_m).unwrap().len(), 3);

    let matches = cli::build_cli().get_matches_from(["fundtrail", "tx", "list", "--account", "Other"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(books.connection(), list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].from, "");
    assert_eq!(rows[0].to, "Other");
}

#[test]
fn tx_add_and_rm_through_cli() {
    let mut books = setup();
    let matches = cli::build_cli().get_matches_from([
        "fundtrail",
        "tx",
        "add",
        "--type",
        "Expenses",
        "--account",
        "A1",
        "--to",
        "Cat1",
        "--value",
        "2.5",
        "--date",
        "2025-01-09",
        "--where",
        "Kiosk",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    commands::transactions::handle(&mut books, tx_m).unwrap();
    let a1 = books.account_by_name("A1").unwrap();
    assert_eq!(a1.balance, dec("-32.5"));

    let matches = cli::build_cli().get_matches_from(["fundtrail", "tx", "rm", "4", "--account", "A1"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    commands::transactions::handle(&mut books, tx_m).unwrap();
    assert_eq!(books.account_by_name("A1").unwrap().balance, dec("-30"));
    assert_eq!(books.account_by_name("Cat1").unwrap().balance, dec("30"));
}

#[test]
fn draft_defaults_follow_accounts() {
    let mut books = setup();
    account(&mut books, "Yen", "JPY");

    let pending = Draft {
        r#type: "transfer".into(),
        account: "A1".into(),
        counterpart: Some("Yen".into()),
        value_src: dec("10"),
        ..Draft::default()
    }
    .resolve(&books)
    .unwrap();
    assert_eq!(pending.transaction.currency_src, "USD");
    assert_eq!(pending.transaction.currency_dest, "JPY");
    assert_eq!(pending.transaction.value_dest, dec("10"));
    assert!(pending.counterpart_id.is_some());

    let income = Draft {
        r#type: "Income".into(),
        account: "Yen".into(),
        counterpart: Some("A1".into()),
        value_src: dec("500"),
        ..Draft::default()
    }
    .resolve(&books)
    .unwrap();
    assert_eq!(income.transaction.currency_dest, "JPY");
    assert_eq!(income.counterpart_id, None);
}
