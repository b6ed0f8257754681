// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row access for accounts and transactions, and the unit of work that groups
//! ledger mutations into one SQLite transaction.

use crate::error::LedgerError;
use crate::models::{Account, Entity, LinkedTransaction, NewAccount, NewTransaction, Transaction};
use crate::registry::SearchRegistry;
use crate::tracker::{self, ChangeSet};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params, params_from_iter};

pub fn insert_account(conn: &Connection, new: &NewAccount) -> Result<Account, LedgerError> {
    conn.execute(
        "INSERT INTO accounts(name, description, balance, currency, is_category) \
         VALUES (?1, ?2, '0', ?3, ?4)",
        params![new.name, new.description, new.currency, new.is_category],
    )?;
    load_account(conn, conn.last_insert_rowid())
}

pub fn load_account(conn: &Connection, id: i64) -> Result<Account, LedgerError> {
    conn.query_row(
        &format!("SELECT {} FROM accounts WHERE id=?1", Account::COLUMNS),
        params![id],
        Account::from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::account_not_found(id))
}

pub fn account_by_name(conn: &Connection, name: &str) -> Result<Account, LedgerError> {
    conn.query_row(
        &format!("SELECT {} FROM accounts WHERE name=?1", Account::COLUMNS),
        params![name],
        Account::from_row,
    )
    .optional()?
    .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts ORDER BY is_category, name",
        Account::COLUMNS
    ))?;
    let rows = stmt
        .query_map([], Account::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn set_account_icon(conn: &Connection, id: i64, icon: &str) -> Result<(), LedgerError> {
    conn.execute(
        "UPDATE accounts SET icon=?1 WHERE id=?2",
        params![icon, id],
    )?;
    Ok(())
}

pub fn load_linked_transaction(
    conn: &Connection,
    id: i64,
) -> Result<LinkedTransaction, LedgerError> {
    conn.query_row(
        &format!("{} WHERE t.id=?1", LinkedTransaction::SELECT),
        params![id],
        LinkedTransaction::from_row,
    )
    .optional()?
    .ok_or(LedgerError::TransactionNotFound(id))
}

/// Transactions with the account on either side, at or after `since`, newest first.
pub fn transactions_since(
    conn: &Connection,
    account_id: i64,
    since: NaiveDateTime,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions t \
         WHERE (t.src_account_id=?1 OR t.dest_account_id=?1) AND t.datetime >= ?2 \
         ORDER BY t.datetime DESC, t.id DESC",
        Transaction::COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![account_id, since], Transaction::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn transactions_touching(
    conn: &Connection,
    account_id: i64,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions t \
         WHERE t.src_account_id=?1 OR t.dest_account_id=?1 \
         ORDER BY t.datetime DESC, t.id DESC",
        Transaction::COLUMNS
    ))?;
    let rows = stmt
        .query_map(params![account_id], Transaction::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn all_linked_transactions(conn: &Connection) -> Result<Vec<LinkedTransaction>, LedgerError> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY t.id", LinkedTransaction::SELECT))?;
    let rows = stmt
        .query_map([], LinkedTransaction::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Loads the given transactions in the order of `ids`, whatever the table order is.
pub fn linked_transactions_in_order(
    conn: &Connection,
    ids: &[i64],
) -> Result<Vec<LinkedTransaction>, LedgerError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{}", i)).collect();
    let order: Vec<String> = placeholders
        .iter()
        .enumerate()
        .map(|(pos, p)| format!("WHEN {} THEN {}", p, pos))
        .collect();
    let sql = format!(
        "{} WHERE t.id IN ({}) ORDER BY CASE t.id {} END",
        LinkedTransaction::SELECT,
        placeholders.join(", "),
        order.join(" ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), LinkedTransaction::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// One atomic group of ledger mutations.
///
/// Writes go straight to the underlying SQLite transaction, so reads inside the unit
/// see its own changes. Every write is also recorded as a pending entity so the change
/// set can be taken right before commit. Dropping the unit without calling
/// [`UnitOfWork::commit`] rolls everything back.
pub struct UnitOfWork<'conn> {
    tx: rusqlite::Transaction<'conn>,
    new: Vec<Entity>,
    dirty: Vec<Entity>,
    deleted: Vec<Entity>,
}

impl<'conn> UnitOfWork<'conn> {
    /// Starts with `BEGIN IMMEDIATE` so the write lock is held from the first balance
    /// read until commit.
    pub fn begin(conn: &'conn mut Connection) -> Result<Self, LedgerError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        Ok(UnitOfWork {
            tx,
            new: Vec::new(),
            dirty: Vec::new(),
            deleted: Vec::new(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.tx
    }

    pub fn account(&self, id: i64) -> Result<Account, LedgerError> {
        load_account(&self.tx, id)
    }

    pub fn linked_transaction(&self, id: i64) -> Result<LinkedTransaction, LedgerError> {
        load_linked_transaction(&self.tx, id)
    }

    pub fn insert_account(&mut self, new: &NewAccount) -> Result<Account, LedgerError> {
        let account = insert_account(&self.tx, new)?;
        self.new.push(Entity::Account(account.clone()));
        Ok(account)
    }

    pub fn delete_account(&mut self, account: Account) -> Result<(), LedgerError> {
        let n = self
            .tx
            .execute("DELETE FROM accounts WHERE id=?1", params![account.id])?;
        if n == 0 {
            return Err(LedgerError::account_not_found(account.id));
        }
        self.track_delete(Entity::Account(account));
        Ok(())
    }

    pub fn save_balance(&mut self, account: &Account) -> Result<(), LedgerError> {
        let n = self.tx.execute(
            "UPDATE accounts SET balance=?1 WHERE id=?2",
            params![account.balance.to_string(), account.id],
        )?;
        if n == 0 {
            return Err(LedgerError::account_not_found(account.id));
        }
        self.track_update(Entity::Account(account.clone()));
        Ok(())
    }

    pub fn insert_transaction(
        &mut self,
        new: &NewTransaction,
        src: Option<&Account>,
        dest: Option<&Account>,
    ) -> Result<LinkedTransaction, LedgerError> {
        self.tx.execute(
            "INSERT INTO transactions(type, datetime, src_account_id, dest_account_id, \
             value_src, currency_src, value_dest, currency_dest, location, description) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                new.r#type,
                new.datetime,
                src.map(|a| a.id),
                dest.map(|a| a.id),
                new.value_src.to_string(),
                new.currency_src,
                new.value_dest.to_string(),
                new.currency_dest,
                new.r#where,
                new.description,
            ],
        )?;
        let linked = LinkedTransaction {
            transaction: Transaction {
                id: self.tx.last_insert_rowid(),
                r#type: new.r#type,
                datetime: new.datetime,
                src_account_id: src.map(|a| a.id),
                dest_account_id: dest.map(|a| a.id),
                value_src: new.value_src,
                currency_src: new.currency_src.clone(),
                value_dest: new.value_dest,
                currency_dest: new.currency_dest.clone(),
                r#where: new.r#where.clone(),
                description: new.description.clone(),
            },
            src_account_name: src.map(|a| a.name.clone()),
            dest_account_name: dest.map(|a| a.name.clone()),
        };
        self.new.push(Entity::Transaction(linked.clone()));
        Ok(linked)
    }

    pub fn delete_transaction(&mut self, linked: LinkedTransaction) -> Result<(), LedgerError> {
        let id = linked.transaction.id;
        let n = self
            .tx
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::TransactionNotFound(id));
        }
        self.track_delete(Entity::Transaction(linked));
        Ok(())
    }

    /// Pending entities as (created, updated, deleted).
    pub fn pending(&self) -> (&[Entity], &[Entity], &[Entity]) {
        (&self.new, &self.dirty, &self.deleted)
    }

    /// Classifies the pending entities. Must be called before [`UnitOfWork::commit`].
    pub fn snapshot_changes(&self, registry: &SearchRegistry) -> ChangeSet {
        tracker::snapshot(registry, &self.new, &self.dirty, &self.deleted)
    }

    pub fn commit(self) -> Result<(), LedgerError> {
        self.tx.commit()?;
        Ok(())
    }

    fn track_update(&mut self, entity: Entity) {
        if let Some(slot) = self.new.iter_mut().find(|e| e.same_as(&entity)) {
            *slot = entity;
        } else if let Some(slot) = self.dirty.iter_mut().find(|e| e.same_as(&entity)) {
            *slot = entity;
        } else {
            self.dirty.push(entity);
        }
    }

    fn track_delete(&mut self, entity: Entity) {
        let created_here = self.new.iter().any(|e| e.same_as(&entity));
        self.new.retain(|e| !e.same_as(&entity));
        self.dirty.retain(|e| !e.same_as(&entity));
        if !created_here {
            self.deleted.push(entity);
        }
    }
}
