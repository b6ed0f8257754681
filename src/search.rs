// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::index::IndexProvider;
use crate::models::LinkedTransaction;
use crate::registry::SearchRegistry;
use crate::store;
use rusqlite::Connection;
use serde::Serialize;

/// One page of search hits: ids in provider relevance order plus the total hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub ids: Vec<i64>,
    pub total: usize,
}

pub fn query_ids<I: IndexProvider + ?Sized>(
    index: &I,
    registry: &SearchRegistry,
    kind: &str,
    expression: &str,
    page: usize,
    per_page: usize,
    fields: Option<&[&str]>,
) -> Result<SearchPage, LedgerError> {
    let descriptor = registry
        .descriptor(kind)
        .ok_or_else(|| LedgerError::UnknownKind(kind.to_string()))?;
    if let Some(fields) = fields {
        if let Some(bad) = fields.iter().find(|f| !descriptor.has_field(f)) {
            return Err(LedgerError::UnknownField {
                kind: kind.to_string(),
                field: bad.to_string(),
            });
        }
    }
    let (ids, total) = index
        .query(kind, expression, page.max(1), per_page.max(1), fields)
        .map_err(|e| LedgerError::IndexUnavailable {
            kinds: vec![kind.to_string()],
            reason: e.to_string(),
        })?;
    Ok(SearchPage { ids, total })
}

/// Resolves a page of transaction ids, keeping the provider's order.
/// An empty page never touches the record store.
pub fn resolve_transactions(
    conn: &Connection,
    page: &SearchPage,
) -> Result<Vec<LinkedTransaction>, LedgerError> {
    if page.total == 0 || page.ids.is_empty() {
        return Ok(Vec::new());
    }
    store::linked_transactions_in_order(conn, &page.ids)
}
