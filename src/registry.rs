// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Entity, TRANSACTION_KIND};

/// Static description of a searchable entity kind: its name and the fields sent to the
/// index provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDescriptor {
    pub kind: &'static str,
    pub fields: &'static [&'static str],
}

pub const TRANSACTION_SEARCH: KindDescriptor = KindDescriptor {
    kind: TRANSACTION_KIND,
    fields: &["description", "where", "src_account.name", "dest_account.name"],
};

impl KindDescriptor {
    /// Field values of `entity` for the index. Absent values are left out.
    pub fn project(&self, entity: &Entity) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter_map(|f| entity.field_value(f).map(|v| (f.to_string(), v)))
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// The kinds registered as searchable at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRegistry {
    descriptors: Vec<KindDescriptor>,
}

impl SearchRegistry {
    pub fn empty() -> Self {
        SearchRegistry {
            descriptors: Vec::new(),
        }
    }

    /// Registers a kind, replacing an earlier descriptor of the same name.
    pub fn register(mut self, descriptor: KindDescriptor) -> Self {
        self.descriptors.retain(|d| d.kind != descriptor.kind);
        self.descriptors.push(descriptor);
        self
    }

    pub fn descriptor(&self, kind: &str) -> Option<&KindDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    pub fn descriptors(&self) -> &[KindDescriptor] {
        &self.descriptors
    }
}

impl Default for SearchRegistry {
    fn default() -> Self {
        SearchRegistry::empty().register(TRANSACTION_SEARCH)
    }
}
