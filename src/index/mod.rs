// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The full-text index the ledger keeps in step with its committed transactions.

pub mod fts;
pub mod memory;

pub use fts::FtsIndex;
pub use memory::MemoryIndex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index is unavailable: {0}")]
    Unavailable(String),
    #[error("no index for kind '{0}'")]
    UnknownKind(String),
    #[error("index has no field '{field}' for kind '{kind}'")]
    UnknownField { kind: String, field: String },
    #[error(transparent)]
    Backend(#[from] rusqlite::Error),
}

/// What the engine needs from a search index.
///
/// Ids are the record-store ids of the entities. `query` pages are 1-based and return
/// the ids of the page in relevance order together with the total match count.
pub trait IndexProvider {
    fn add_or_update(&self, kind: &str, id: i64, fields: &[(String, String)])
    -> Result<(), IndexError>;

    fn remove(&self, kind: &str, id: i64) -> Result<(), IndexError>;

    fn query(
        &self,
        kind: &str,
        expression: &str,
        page: usize,
        per_page: usize,
        fields: Option<&[&str]>,
    ) -> Result<(Vec<i64>, usize), IndexError>;

    /// Drops every document of `kind`. Used by full rebuilds.
    fn clear(&self, kind: &str) -> Result<(), IndexError>;
}

/// Lower-cased alphanumeric terms of a free-text expression.
pub(crate) fn terms(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// `(offset, limit)` of a 1-based page. An offset past `usize::MAX` saturates, which
/// yields an empty page.
pub(crate) fn page_bounds(page: usize, per_page: usize) -> (usize, usize) {
    let page = page.max(1);
    let per_page = per_page.max(1);
    ((page - 1).saturating_mul(per_page), per_page)
}
