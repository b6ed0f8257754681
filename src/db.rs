// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fundtrail", "fundtrail"));

const STALE_PREFIX: &str = "index_stale:";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fundtrail.sqlite"))
}

pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE CHECK(length(name) > 0),
        description TEXT,
        balance TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL DEFAULT 'EUR',
        is_category INTEGER NOT NULL DEFAULT 0,
        icon TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type TEXT NOT NULL CHECK(type IN ('expense','income','transfer')),
        datetime TEXT NOT NULL,
        src_account_id INTEGER,
        dest_account_id INTEGER,
        value_src TEXT NOT NULL,
        currency_src TEXT NOT NULL,
        value_dest TEXT NOT NULL,
        currency_dest TEXT NOT NULL,
        location TEXT,
        description TEXT,
        FOREIGN KEY(src_account_id) REFERENCES accounts(id),
        FOREIGN KEY(dest_account_id) REFERENCES accounts(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_datetime ON transactions(datetime);
    CREATE INDEX IF NOT EXISTS idx_transactions_src ON transactions(src_account_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_dest ON transactions(dest_account_id);
    "#,
    )
}

/// Records that the index of `kind` missed a sync and needs a `reindex`.
pub fn mark_index_stale(conn: &Connection, kind: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![format!("{STALE_PREFIX}{kind}")],
    )?;
    Ok(())
}

pub fn clear_index_stale(conn: &Connection, kind: &str) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM settings WHERE key=?1",
        params![format!("{STALE_PREFIX}{kind}")],
    )?;
    Ok(())
}

/// Stale kinds with the time they were last marked.
pub fn stale_index_kinds(conn: &Connection) -> rusqlite::Result<Vec<(String, String)>> {
    let mut stmt =
        conn.prepare("SELECT key, value FROM settings WHERE key LIKE 'index_stale:%' ORDER BY key")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = Vec::new();
    for row in rows {
        let (key, since) = row?;
        out.push((key.trim_start_matches(STALE_PREFIX).to_string(), since));
    }
    Ok(out)
}
