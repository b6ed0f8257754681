// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::Books;
use crate::commands::transactions::{TransactionRow, transaction_table};
use crate::index::IndexProvider;
use crate::models::TRANSACTION_KIND;
use crate::search;
use crate::utils::{maybe_print_json, required};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub expression: String,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub results: Vec<TransactionRow>,
}

pub fn run<I: IndexProvider>(books: &Books<I>, sub: &clap::ArgMatches) -> Result<SearchOutput> {
    let expression = required(sub, "expression")?.to_string();
    let page = sub.get_one::<usize>("page").copied().unwrap_or(1).max(1);
    let per_page = sub
        .get_one::<usize>("per-page")
        .copied()
        .unwrap_or(20)
        .max(1);
    let fields: Vec<&str> = sub
        .get_many::<String>("field")
        .map(|v| v.map(String::as_str).collect())
        .unwrap_or_default();
    let only = (!fields.is_empty()).then_some(fields.as_slice());

    let hits = books.search_fields(TRANSACTION_KIND, &expression, page, per_page, only)?;
    let rows = search::resolve_transactions(books.connection(), &hits)?;
    Ok(SearchOutput {
        expression,
        page,
        per_page,
        total: hits.total,
        results: rows.into_iter().map(TransactionRow::from).collect(),
    })
}

pub fn handle<I: IndexProvider>(books: &Books<I>, sub: &clap::ArgMatches) -> Result<()> {
    let out = run(books, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &out)? {
        return Ok(());
    }
    if out.total == 0 {
        println!("No transactions match '{}'", out.expression);
        return Ok(());
    }
    println!("{}", transaction_table(&out.results));
    let pages = out.total.div_ceil(out.per_page);
    println!(
        "Page {}/{} ({} matches)",
        out.page, pages, out.total
    );
    Ok(())
}
