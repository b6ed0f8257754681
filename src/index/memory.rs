// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{IndexError, IndexProvider, page_bounds, terms};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

type Documents = BTreeMap<i64, Vec<(String, String)>>;

/// In-process index ranking documents by how many query terms hit their fields.
///
/// It can be switched off with [`MemoryIndex::set_available`] to exercise the
/// ledger's behaviour when the index provider is down.
#[derive(Debug)]
pub struct MemoryIndex {
    kinds: RefCell<HashMap<String, Documents>>,
    available: Cell<bool>,
}

impl Default for MemoryIndex {
    fn default() -> Self {
        MemoryIndex {
            kinds: RefCell::new(HashMap::new()),
            available: Cell::new(true),
        }
    }
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn document(&self, kind: &str, id: i64) -> Option<Vec<(String, String)>> {
        self.kinds
            .borrow()
            .get(kind)
            .and_then(|docs| docs.get(&id).cloned())
    }

    /// Every document of a kind, ordered by id.
    pub fn documents(&self, kind: &str) -> Vec<(i64, Vec<(String, String)>)> {
        self.kinds
            .borrow()
            .get(kind)
            .map(|docs| docs.iter().map(|(id, f)| (*id, f.clone())).collect())
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), IndexError> {
        if self.available.get() {
            Ok(())
        } else {
            Err(IndexError::Unavailable("memory index switched off".to_string()))
        }
    }
}

impl IndexProvider for MemoryIndex {
    fn add_or_update(
        &self,
        kind: &str,
        id: i64,
        fields: &[(String, String)],
    ) -> Result<(), IndexError> {
        self.check()?;
        self.kinds
            .borrow_mut()
            .entry(kind.to_string())
            .or_default()
            .insert(id, fields.to_vec());
        Ok(())
    }

    fn remove(&self, kind: &str, id: i64) -> Result<(), IndexError> {
        self.check()?;
        if let Some(docs) = self.kinds.borrow_mut().get_mut(kind) {
            docs.remove(&id);
        }
        Ok(())
    }

    fn query(
        &self,
        kind: &str,
        expression: &str,
        page: usize,
        per_page: usize,
        fields: Option<&[&str]>,
    ) -> Result<(Vec<i64>, usize), IndexError> {
        self.check()?;
        let wanted = terms(expression);
        if wanted.is_empty() {
            return Ok((Vec::new(), 0));
        }
        let kinds = self.kinds.borrow();
        let Some(docs) = kinds.get(kind) else {
            return Ok((Vec::new(), 0));
        };
        let mut scored: Vec<(usize, i64)> = docs
            .iter()
            .filter_map(|(id, doc)| {
                let score: usize = doc
                    .iter()
                    .filter(|(f, _)| fields.is_none_or(|only| only.contains(&f.as_str())))
                    .map(|(_, v)| {
                        let have = terms(v);
                        wanted.iter().filter(|w| have.contains(w)).count()
                    })
                    .sum();
                (score > 0).then_some((score, *id))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        let total = scored.len();
        let (offset, limit) = page_bounds(page, per_page);
        let ids = scored
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, id)| id)
            .collect();
        Ok((ids, total))
    }

    fn clear(&self, kind: &str) -> Result<(), IndexError> {
        self.check()?;
        self.kinds.borrow_mut().remove(kind);
        Ok(())
    }
}
