// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{IndexError, IndexProvider, page_bounds, terms};
use crate::registry::SearchRegistry;
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// SQLite FTS5 index: one virtual table per registered kind, keyed by rowid = entity id.
/// Lives in its own database so a broken index never touches the ledger file.
pub struct FtsIndex {
    conn: Connection,
    columns: HashMap<String, Vec<(String, String)>>,
}

fn identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn table_name(kind: &str) -> String {
    format!("fts_{}", identifier(kind))
}

impl FtsIndex {
    pub fn open(path: &Path, registry: &SearchRegistry) -> Result<Self, IndexError> {
        Self::with_connection(Connection::open(path)?, registry)
    }

    pub fn in_memory(registry: &SearchRegistry) -> Result<Self, IndexError> {
        Self::with_connection(Connection::open_in_memory()?, registry)
    }

    fn with_connection(conn: Connection, registry: &SearchRegistry) -> Result<Self, IndexError> {
        let mut columns = HashMap::new();
        for d in registry.descriptors() {
            let cols: Vec<(String, String)> = d
                .fields
                .iter()
                .map(|f| (f.to_string(), format!("f_{}", identifier(f))))
                .collect();
            let decl: Vec<String> = cols.iter().map(|(_, c)| format!("\"{}\"", c)).collect();
            conn.execute_batch(&format!(
                "CREATE VIRTUAL TABLE IF NOT EXISTS \"{}\" USING fts5({});",
                table_name(d.kind),
                decl.join(", ")
            ))?;
            columns.insert(d.kind.to_string(), cols);
        }
        Ok(FtsIndex { conn, columns })
    }

    fn columns(&self, kind: &str) -> Result<&[(String, String)], IndexError> {
        self.columns
            .get(kind)
            .map(|c| c.as_slice())
            .ok_or_else(|| IndexError::UnknownKind(kind.to_string()))
    }

    fn column_for(&self, kind: &str, field: &str) -> Result<String, IndexError> {
        self.columns(kind)?
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, c)| c.clone())
            .ok_or_else(|| IndexError::UnknownField {
                kind: kind.to_string(),
                field: field.to_string(),
            })
    }

    /// Builds an FTS5 query matching any of the terms, optionally restricted to fields.
    fn match_expression(
        &self,
        kind: &str,
        expression: &str,
        fields: Option<&[&str]>,
    ) -> Result<Option<String>, IndexError> {
        let terms = terms(expression);
        if terms.is_empty() {
            return Ok(None);
        }
        let any: Vec<String> = terms.iter().map(|t| format!("\"{}\"", t)).collect();
        let body = any.join(" OR ");
        match fields {
            Some(fields) if !fields.is_empty() => {
                let cols = fields
                    .iter()
                    .map(|f| self.column_for(kind, f))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Some(format!("{{{}}} : ({})", cols.join(" "), body)))
            }
            _ => Ok(Some(body)),
        }
    }
}

impl IndexProvider for FtsIndex {
    fn add_or_update(
        &self,
        kind: &str,
        id: i64,
        fields: &[(String, String)],
    ) -> Result<(), IndexError> {
        let mut names = vec!["rowid".to_string()];
        let mut values: Vec<&dyn rusqlite::ToSql> = vec![&id];
        for (field, value) in fields {
            names.push(format!("\"{}\"", self.column_for(kind, field)?));
            values.push(value);
        }
        let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
        let table = table_name(kind);
        self.conn.execute(
            &format!("DELETE FROM \"{}\" WHERE rowid=?1", table),
            params![id],
        )?;
        self.conn.execute(
            &format!(
                "INSERT INTO \"{}\"({}) VALUES ({})",
                table,
                names.join(", "),
                placeholders.join(", ")
            ),
            values.as_slice(),
        )?;
        debug!("Indexed {} [{}]", kind, id);
        Ok(())
    }

    fn remove(&self, kind: &str, id: i64) -> Result<(), IndexError> {
        self.columns(kind)?;
        self.conn.execute(
            &format!("DELETE FROM \"{}\" WHERE rowid=?1", table_name(kind)),
            params![id],
        )?;
        debug!("Removed {} [{}] from index", kind, id);
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
        self.columns(kind)?;
        let Some(expr) = self.match_expression(kind, expression, fields)? else {
            return Ok((Vec::new(), 0));
        };
        let table = table_name(kind);
        let total: i64 = self.conn.query_row(
            &format!("SELECT count(*) FROM \"{0}\" WHERE \"{0}\" MATCH ?1", table),
            params![expr],
            |r| r.get(0),
        )?;
        let (offset, limit) = page_bounds(page, per_page);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT rowid FROM \"{0}\" WHERE \"{0}\" MATCH ?1 ORDER BY rank, rowid LIMIT ?2 OFFSET ?3",
            table
        ))?;
        let ids = stmt
            .query_map(
                params![
                    expr,
                    i64::try_from(limit).unwrap_or(i64::MAX),
                    i64::try_from(offset).unwrap_or(i64::MAX)
                ],
                |r| r.get(0),
            )?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok((ids, total as usize))
    }

    fn clear(&self, kind: &str) -> Result<(), IndexError> {
        self.columns(kind)?;
        self.conn
            .execute(&format!("DELETE FROM \"{}\"", table_name(kind)), [])?;
        Ok(())
    }
}
