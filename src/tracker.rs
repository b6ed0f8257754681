// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Entity;
use crate::registry::SearchRegistry;
use serde::Serialize;

/// A searchable entity as the index should hold it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDocument {
    pub kind: &'static str,
    pub id: i64,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexKey {
    pub kind: &'static str,
    pub id: i64,
}

/// Searchable mutations of one unit of work, captured before it was committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub adds: Vec<IndexDocument>,
    pub updates: Vec<IndexDocument>,
    pub deletes: Vec<IndexKey>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.adds.len() + self.updates.len() + self.deletes.len()
    }
}

/// Keeps the searchable entities of each bucket and projects them for the index.
/// Entities of kinds missing from the registry are dropped.
pub fn snapshot(
    registry: &SearchRegistry,
    pending_adds: &[Entity],
    pending_updates: &[Entity],
    pending_deletes: &[Entity],
) -> ChangeSet {
    let documents = |entities: &[Entity]| -> Vec<IndexDocument> {
        entities
            .iter()
            .filter_map(|e| {
                registry.descriptor(e.kind()).map(|d| IndexDocument {
                    kind: d.kind,
                    id: e.id(),
                    fields: d.project(e),
                })
            })
            .collect()
    };
    ChangeSet {
        adds: documents(pending_adds),
        updates: documents(pending_updates),
        deletes: pending_deletes
            .iter()
            .filter_map(|e| {
                registry.descriptor(e.kind()).map(|d| IndexKey {
                    kind: d.kind,
                    id: e.id(),
                })
            })
            .collect(),
    }
}
