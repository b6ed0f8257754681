// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::books::Books;
use crate::index::IndexProvider;
use anyhow::Result;

pub fn handle<I: IndexProvider>(books: &mut Books<I>, sub: &clap::ArgMatches) -> Result<()> {
    let kinds: Vec<String> = match sub.get_one::<String>("kind") {
        Some(kind) => vec![kind.trim().to_string()],
        None => books
            .registry()
            .descriptors()
            .iter()
            .map(|d| d.kind.to_string())
            .collect(),
    };
    for kind in kinds {
        let n = books.reindex(&kind)?;
        println!("Reindexed {} {} document(s)", n, kind);
    }
    Ok(())
}
