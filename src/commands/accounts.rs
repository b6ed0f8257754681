// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::Books;
use crate::index::IndexProvider;
use crate::models::NewAccount;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, required};
use anyhow::{Context, Result};
use chrono::Local;

pub fn handle<I: IndexProvider>(books: &mut Books<I>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let currency = required(sub, "currency")?;
            let account = books.create_account(NewAccount {
                name: name.to_string(),
                description: sub.get_one::<String>("description").cloned(),
                currency: currency.to_string(),
                is_category: sub.get_flag("category"),
            })?;
            let kind = if account.is_category { "category" } else { "account" };
            println!(
                "Added {} '{}' ({})",
                kind, account.name, account.currency
            );
        }
        Some(("list", sub)) => {
            let accounts = books.accounts()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            if a.is_category { "category" } else { "account" }.to_string(),
                            fmt_money(&a.balance, &a.currency),
                            a.description.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Kind", "Balance", "Description"], rows)
                );
            }
        }
        Some(("show", sub)) => show(books, sub)?,
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let account = books.account_by_name(name)?;
            books
                .remove_account(account.id)
                .with_context(|| format!("Account '{}' still has transactions", name))?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

fn show<I: IndexProvider>(books: &mut Books<I>, sub: &clap::ArgMatches) -> Result<()> {
    let account = books.account_by_name(required(sub, "name")?)?;
    let today = match sub.get_one::<String>("today") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let icon = books.icon(account.id)?;
    let transactions = books.transactions_for_window(account.id, today)?;
    let net = books.net_movement_for_window(account.id, today)?;

    println!("{} [{}]", account.name, account.id);
    println!("Balance:  {}", fmt_money(&account.balance, &account.currency));
    println!("Window:   {}", fmt_money(&net, &account.currency));
    println!("Icon:     {}", icon);
    let rows = transactions
        .iter()
        .map(|t| {
            let signed = if t.src_account_id == Some(account.id) {
                -t.value_src
            } else {
                t.value_dest
            };
            vec![
                t.id.to_string(),
                t.datetime.to_string(),
                t.r#type.to_string(),
                signed.to_string(),
                t.r#where.clone().unwrap_or_default(),
                t.description.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Datetime", "Type", "Amount", "Where", "Description"],
            rows
        )
    );
    Ok(())
}
