// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::{Books, PendingTransaction};
use crate::index::IndexProvider;
use crate::models::{Account, LinkedTransaction, NewTransaction, TransactionType};
use crate::utils::{maybe_print_json, parse_datetime, parse_decimal, pretty_table, required};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, params_from_iter};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<I: IndexProvider>(books: &mut Books<I>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(books, sub)?,
        Some(("rm", sub)) => remove(books, sub)?,
        Some(("list", sub)) => list(books.connection(), sub)?,
        _ => {}
    }
    Ok(())
}

/// A transaction as typed by a user or read from a file, with accounts named and
/// optional parts not yet defaulted.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub r#type: String,
    pub datetime: Option<NaiveDateTime>,
    pub account: String,
    pub counterpart: Option<String>,
    pub value_src: Decimal,
    pub value_dest: Option<Decimal>,
    pub currency_src: Option<String>,
    pub currency_dest: Option<String>,
    pub r#where: Option<String>,
    pub description: Option<String>,
}

impl Draft {
    /// Resolves account names and fills defaults: currencies from the accounts,
    /// `value_dest` from `value_src`, the time from the local clock.
    pub fn resolve<I: IndexProvider>(&self, books: &Books<I>) -> Result<PendingTransaction> {
        let r#type: TransactionType = self.r#type.trim().parse()?;
        let own = books
            .account_by_name(self.account.trim())
            .with_context(|| format!("Account '{}' not found", self.account.trim()))?;
        let counterpart: Option<Account> = match (r#type, self.counterpart.as_deref()) {
            (TransactionType::Income, _) | (_, None) => None,
            (_, Some(name)) => Some(
                books
                    .account_by_name(name.trim())
                    .with_context(|| format!("Account '{}' not found", name.trim()))?,
            ),
        };

        let (default_src, default_dest) = match (r#type, &counterpart) {
            (TransactionType::Income, _) => (own.currency.clone(), own.currency.clone()),
            (_, Some(c)) => (own.currency.clone(), c.currency.clone()),
            (_, None) => (own.currency.clone(), own.currency.clone()),
        };
        let transaction = NewTransaction {
            r#type,
            datetime: self
                .datetime
                .unwrap_or_else(|| Local::now().naive_local()),
            value_src: self.value_src,
            currency_src: self.currency_src.clone().unwrap_or(default_src),
            value_dest: self.value_dest.unwrap_or(self.value_src),
            currency_dest: self.currency_dest.clone().unwrap_or(default_dest),
            r#where: self.r#where.clone(),
            description: self.description.clone(),
        };
        Ok(PendingTransaction {
            transaction,
            account_id: own.id,
            counterpart_id: counterpart.map(|c| c.id),
        })
    }
}

fn add<I: IndexProvider>(books: &mut Books<I>, sub: &clap::ArgMatches) -> Result<()> {
    let draft = Draft {
        r#type: required(sub, "type")?.to_string(),
        datetime: sub
            .get_one::<String>("date")
            .map(|d| parse_datetime(d))
            .transpose()?,
        account: required(sub, "account")?.to_string(),
        counterpart: sub.get_one::<String>("to").cloned(),
        value_src: parse_decimal(required(sub, "value")?)?,
        value_dest: sub
            .get_one::<String>("value-dest")
            .map(|v| parse_decimal(v))
            .transpose()?,
        currency_src: sub
            .get_one::<String>("currency-src")
            .map(|c| c.trim().to_uppercase()),
        currency_dest: sub
            .get_one::<String>("currency-dest")
            .map(|c| c.trim().to_uppercase()),
        r#where: sub.get_one::<String>("where").cloned(),
        description: sub.get_one::<String>("description").cloned(),
    };
    let pending = draft.resolve(books)?;
    let t = books.add_transaction(
        pending.transaction,
        pending.account_id,
        pending.counterpart_id,
    )?;
    println!(
        "Recorded {} [{}] of {} {} on {}",
        t.r#type, t.id, t.value_src, t.currency_src, t.datetime
    );
    Ok(())
}

fn remove<I: IndexProvider>(books: &mut Books<I>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .context("Missing transaction id")?;
    let account = books.account_by_name(required(sub, "account")?)?;
    books.remove_transaction(id, account.id)?;
    println!("Removed transaction [{}]", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", transaction_table(&data));
    }
    Ok(())
}

pub(crate) fn transaction_table(data: &[TransactionRow]) -> comfy_table::Table {
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.datetime.clone(),
                r.r#type.clone(),
                r.from.clone(),
                r.to.clone(),
                format!("{} {}", r.value_src, r.currency_src),
                format!("{} {}", r.value_dest, r.currency_dest),
                r.r#where.clone(),
                r.description.clone(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Id",
            "Datetime",
            "Type",
            "From",
            "To",
            "Sent",
            "Received",
            "Where",
            "Description",
        ],
        rows,
    )
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub datetime: String,
    pub r#type: String,
    pub from: String,
    pub to: String,
    pub value_src: String,
    pub currency_src: String,
    pub value_dest: String,
    pub currency_dest: String,
    pub r#where: String,
    pub description: String,
}

impl From<LinkedTransaction> for TransactionRow {
    fn from(l: LinkedTransaction) -> Self {
        let t = l.transaction;
        TransactionRow {
            id: t.id,
            datetime: t.datetime.to_string(),
            r#type: t.r#type.to_string(),
            from: l.src_account_name.unwrap_or_default(),
            to: l.dest_account_name.unwrap_or_default(),
            value_src: t.value_src.to_string(),
            currency_src: t.currency_src,
            value_dest: t.value_dest.to_string(),
            currency_dest: t.currency_dest,
            r#where: t.r#where.unwrap_or_default(),
            description: t.description.unwrap_or_default(),
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = format!("{} WHERE 1=1", LinkedTransaction::SELECT);
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND (s.name=? OR d.name=?)");
        params_vec.push(acct.into());
        params_vec.push(acct.into());
    }
    sql.push_str(" ORDER BY t.datetime DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params_vec.iter()), LinkedTransaction::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows.into_iter().map(TransactionRow::from).collect())
}
