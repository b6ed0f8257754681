// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use fundtrail::books::Books;
use fundtrail::db;
use fundtrail::index::{IndexProvider, MemoryIndex};
use fundtrail::models::{Account, NewAccount, NewTransaction, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

pub fn books() -> Books<MemoryIndex> {
    Books::new(conn(), MemoryIndex::new())
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn at(date: &str) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn account<I: IndexProvider>(books: &mut Books<I>, name: &str, ccy: &str) -> Account {
    books
        .create_account(NewAccount {
            name: name.to_string(),
            description: None,
            currency: ccy.to_string(),
            is_category: false,
        })
        .unwrap()
}

pub fn category<I: IndexProvider>(books: &mut Books<I>, name: &str, ccy: &str) -> Account {
    books
        .create_account(NewAccount {
            name: name.to_string(),
            description: None,
            currency: ccy.to_string(),
            is_category: true,
        })
        .unwrap()
}

pub fn tx(
    kind: TransactionType,
    date: &str,
    value: &str,
    ccy_src: &str,
    ccy_dest: &str,
    description: &str,
) -> NewTransaction {
    NewTransaction {
        r#type: kind,
        datetime: at(date),
        value_src: dec(value),
        currency_src: ccy_src.to_string(),
        value_dest: dec(value),
        currency_dest: ccy_dest.to_string(),
        r#where: None,
        description: Some(description.to_string()),
    }
}
