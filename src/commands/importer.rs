// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::Books;
use crate::commands::transactions::Draft;
use crate::index::IndexProvider;
use crate::utils::{parse_datetime, parse_decimal, required};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

pub fn handle<I: IndexProvider>(books: &mut Books<I>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = required(sub, "path")?.trim();
            let n = import_transactions(books, Path::new(path))?;
            println!("Imported {} transaction(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn optional(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn draft_from(rec: &StringRecord, line: u64) -> Result<Draft> {
    let kind = rec
        .get(0)
        .with_context(|| format!("Line {}: type missing", line))?
        .trim()
        .to_string();
    let datetime = optional(rec, 1)
        .map(|d| parse_datetime(&d))
        .transpose()
        .with_context(|| format!("Line {}: bad datetime", line))?;
    let account = optional(rec, 2).with_context(|| format!("Line {}: account missing", line))?;
    let value_raw = rec
        .get(4)
        .with_context(|| format!("Line {}: value_src missing", line))?
        .trim();
    let value_src = parse_decimal(value_raw)
        .with_context(|| format!("Line {}: invalid value_src '{}'", line, value_raw))?;
    let value_dest = optional(rec, 6)
        .map(|v| parse_decimal(&v))
        .transpose()
        .with_context(|| format!("Line {}: invalid value_dest", line))?;
    Ok(Draft {
        r#type: kind,
        datetime,
        account,
        counterpart: optional(rec, 3),
        value_src,
        value_dest,
        currency_src: optional(rec, 5).map(|c| c.to_uppercase()),
        currency_dest: optional(rec, 7).map(|c| c.to_uppercase()),
        r#where: optional(rec, 8),
        description: optional(rec, 9),
    })
}

/// Imports a CSV of transactions as one unit of work: a bad row leaves the ledger as it
/// was. Columns are `type,datetime,account,counterpart,value_src,currency_src,value_dest,
/// currency_dest,where,description`.
pub fn import_transactions<I: IndexProvider>(books: &mut Books<I>, path: &Path) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let mut batch = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        // header is line 1
        let line = i as u64 + 2;
        let draft = draft_from(&rec, line)?;
        let pending = draft
            .resolve(books)
            .with_context(|| format!("Line {}", line))?;
        batch.push(pending);
    }
    let added = books
        .add_transactions(&batch)
        .with_context(|| format!("Import of {} rolled back", path.display()))?;
    Ok(added.len())
}
