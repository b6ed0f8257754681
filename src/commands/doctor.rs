// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::Books;
use crate::index::IndexProvider;
use crate::utils::pretty_table;
use anyhow::Result;

/// Issues found in the ledger as (issue, detail) pairs.
pub fn diagnose<I: IndexProvider>(books: &Books<I>) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();

    // Stored balances must equal the sum of their transactions
    for account in books.accounts()? {
        let derived = books.derived_balance(account.id)?;
        if derived != account.balance {
            issues.push((
                "balance_drift".to_string(),
                format!(
                    "{}: stored {} derived {} {}",
                    account.name, account.balance, derived, account.currency
                ),
            ));
        }
    }

    for (kind, since) in books.stale_kinds()? {
        issues.push((
            "stale_index".to_string(),
            format!("{} since {}, run `fundtrail reindex --kind {}`", kind, since, kind),
        ));
    }
    Ok(issues)
}

pub fn handle<I: IndexProvider>(books: &Books<I>) -> Result<()> {
    let issues = diagnose(books)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(i, d)| vec![i, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
