// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::index::IndexProvider;
use crate::tracker::ChangeSet;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Pushes a committed change set into the index.
pub struct IndexSynchronizer<'a, I: IndexProvider + ?Sized> {
    index: &'a I,
}

impl<'a, I: IndexProvider + ?Sized> IndexSynchronizer<'a, I> {
    pub fn new(index: &'a I) -> Self {
        IndexSynchronizer { index }
    }

    /// Applies every entry of `changes`, carrying on past failures so that as much of
    /// the index as possible reflects the commit. Fails with `IndexUnavailable` naming
    /// the kinds that missed at least one entry.
    pub fn sync(&self, changes: &ChangeSet) -> Result<(), LedgerError> {
        let mut failed: BTreeSet<&str> = BTreeSet::new();
        let mut reason: Option<String> = None;

        for doc in changes.adds.iter().chain(changes.updates.iter()) {
            if let Err(error) = self.index.add_or_update(doc.kind, doc.id, &doc.fields) {
                warn!("Indexing {} [{}] failed: {error}", doc.kind, doc.id);
                failed.insert(doc.kind);
                reason.get_or_insert_with(|| error.to_string());
            }
        }
        for key in &changes.deletes {
            if let Err(error) = self.index.remove(key.kind, key.id) {
                warn!("Removing {} [{}] from index failed: {error}", key.kind, key.id);
                failed.insert(key.kind);
                reason.get_or_insert_with(|| error.to_string());
            }
        }

        if failed.is_empty() {
            debug!(
                "Index synced: {} added, {} updated, {} removed",
                changes.adds.len(),
                changes.updates.len(),
                changes.deletes.len()
            );
            return Ok(());
        }
        Err(LedgerError::IndexUnavailable {
            kinds: failed.into_iter().map(str::to_string).collect(),
            reason: reason.unwrap_or_default(),
        })
    }
}
