// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::logging::DEFAULT_FILTER;
use anyhow::Result;
use clap::ArgMatches;
use std::path::{Path, PathBuf};

/// Runtime settings resolved from flags, environment and platform defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub index_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_matches(m: &ArgMatches) -> Result<Self> {
        let db_path = match m.get_one::<String>("db") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
            _ => db::db_path()?,
        };
        let log_filter = m
            .get_one::<String>("log-level")
            .cloned()
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        Ok(Self::for_database(db_path, log_filter))
    }

    pub fn for_database(db_path: PathBuf, log_filter: String) -> Self {
        Config {
            index_path: index_path_for(&db_path),
            db_path,
            log_filter,
        }
    }
}

/// The search index lives beside the ledger: `ledger.sqlite` → `ledger.index.sqlite`.
pub fn index_path_for(db_path: &Path) -> PathBuf {
    db_path.with_extension("index.sqlite")
}
