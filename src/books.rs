// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entry point for callers: every ledger mutation runs as
//! begin → mutate → snapshot changes → commit → sync the index.

use crate::currency;
use crate::db;
use crate::error::LedgerError;
use crate::icon;
use crate::index::IndexProvider;
use crate::ledger;
use crate::models::{Account, Entity, LinkedTransaction, NewAccount, NewTransaction, Transaction};
use crate::registry::SearchRegistry;
use crate::search::{self, SearchPage};
use crate::store::{self, UnitOfWork};
use crate::sync::IndexSynchronizer;
use crate::tracker::ChangeSet;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// A transaction to add as part of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransaction {
    pub transaction: NewTransaction,
    pub account_id: i64,
    pub counterpart_id: Option<i64>,
}

pub struct Books<I: IndexProvider> {
    conn: Connection,
    index: I,
    registry: SearchRegistry,
}

impl<I: IndexProvider> Books<I> {
    pub fn new(conn: Connection, index: I) -> Self {
        Self::with_registry(conn, index, SearchRegistry::default())
    }

    pub fn with_registry(conn: Connection, index: I, registry: SearchRegistry) -> Self {
        Books {
            conn,
            index,
            registry,
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn registry(&self) -> &SearchRegistry {
        &self.registry
    }

    pub fn create_account(&mut self, new: NewAccount) -> Result<Account, LedgerError> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::InvalidAccount(
                "name must not be empty".to_string(),
            ));
        }
        let currency = currency::normalize_code(&new.currency)?;
        let new = NewAccount {
            name,
            currency,
            ..new
        };
        let account = self.in_unit_of_work(|uow| uow.insert_account(&new))?;
        info!("Account [{}] '{}' created", account.id, account.name);
        Ok(account)
    }

    pub fn account(&self, id: i64) -> Result<Account, LedgerError> {
        store::load_account(&self.conn, id)
    }

    pub fn account_by_name(&self, name: &str) -> Result<Account, LedgerError> {
        store::account_by_name(&self.conn, name)
    }

    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        store::list_accounts(&self.conn)
    }

    /// Fails with a store constraint error while any transaction references the account.
    pub fn remove_account(&mut self, id: i64) -> Result<(), LedgerError> {
        self.in_unit_of_work(|uow| {
            let account = uow.account(id)?;
            uow.delete_account(account)
        })?;
        info!("Account [{}] removed", id);
        Ok(())
    }

    pub fn add_transaction(
        &mut self,
        transaction: NewTransaction,
        account_id: i64,
        counterpart_id: Option<i64>,
    ) -> Result<Transaction, LedgerError> {
        let linked = self.in_unit_of_work(|uow| {
            ledger::add_transaction(uow, &transaction, account_id, counterpart_id)
        })?;
        Ok(linked.transaction)
    }

    /// Adds every transaction in one unit of work; the first failure rolls back all.
    pub fn add_transactions(
        &mut self,
        batch: &[PendingTransaction],
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.in_unit_of_work(|uow| {
            batch
                .iter()
                .map(|p| {
                    ledger::add_transaction(uow, &p.transaction, p.account_id, p.counterpart_id)
                        .map(|l| l.transaction)
                })
                .collect()
        })
    }

    pub fn remove_transaction(
        &mut self,
        transaction_id: i64,
        account_id: i64,
    ) -> Result<(), LedgerError> {
        self.in_unit_of_work(|uow| ledger::remove_transaction(uow, transaction_id, account_id))
    }

    pub fn transaction(&self, id: i64) -> Result<LinkedTransaction, LedgerError> {
        store::load_linked_transaction(&self.conn, id)
    }

    pub fn transactions_for_window(
        &self,
        account_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<Transaction>, LedgerError> {
        ledger::transactions_for_window(&self.conn, account_id, today)
    }

    pub fn net_movement_for_window(
        &self,
        account_id: i64,
        today: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        ledger::net_movement_for_window(&self.conn, account_id, today)
    }

    pub fn derived_balance(&self, account_id: i64) -> Result<Decimal, LedgerError> {
        ledger::derived_balance(&self.conn, account_id)
    }

    pub fn search(
        &self,
        kind: &str,
        expression: &str,
        page: usize,
        per_page: usize,
    ) -> Result<SearchPage, LedgerError> {
        self.search_fields(kind, expression, page, per_page, None)
    }

    pub fn search_fields(
        &self,
        kind: &str,
        expression: &str,
        page: usize,
        per_page: usize,
        fields: Option<&[&str]>,
    ) -> Result<SearchPage, LedgerError> {
        search::query_ids(
            &self.index,
            &self.registry,
            kind,
            expression,
            page,
            per_page,
            fields,
        )
    }

    /// Transaction search resolved to stored rows, in relevance order.
    pub fn search_transactions(
        &self,
        expression: &str,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<LinkedTransaction>, usize), LedgerError> {
        let hits = self.search(crate::models::TRANSACTION_KIND, expression, page, per_page)?;
        let rows = search::resolve_transactions(&self.conn, &hits)?;
        Ok((rows, hits.total))
    }

    /// Rebuilds the index of `kind` from the current rows. Running it again yields the
    /// same index. Returns the number of documents written.
    pub fn reindex(&mut self, kind: &str) -> Result<usize, LedgerError> {
        let descriptor = *self
            .registry
            .descriptor(kind)
            .ok_or_else(|| LedgerError::UnknownKind(kind.to_string()))?;
        let entities: Vec<Entity> = match descriptor.kind {
            crate::models::TRANSACTION_KIND => store::all_linked_transactions(&self.conn)?
                .into_iter()
                .map(Entity::Transaction)
                .collect(),
            crate::models::ACCOUNT_KIND => store::list_accounts(&self.conn)?
                .into_iter()
                .map(Entity::Account)
                .collect(),
            other => return Err(LedgerError::UnknownKind(other.to_string())),
        };
        let unavailable = |e: crate::index::IndexError| LedgerError::IndexUnavailable {
            kinds: vec![kind.to_string()],
            reason: e.to_string(),
        };
        self.index.clear(descriptor.kind).map_err(unavailable)?;
        for entity in &entities {
            self.index
                .add_or_update(descriptor.kind, entity.id(), &descriptor.project(entity))
                .map_err(unavailable)?;
        }
        db::clear_index_stale(&self.conn, descriptor.kind)?;
        info!("Reindexed {} {} documents", entities.len(), descriptor.kind);
        Ok(entities.len())
    }

    pub fn stale_kinds(&self) -> Result<Vec<(String, String)>, LedgerError> {
        Ok(db::stale_index_kinds(&self.conn)?)
    }

    /// Icon reference of the account, generated and stored on first use.
    pub fn icon(&mut self, account_id: i64) -> Result<String, LedgerError> {
        let account = self.account(account_id)?;
        if let Some(icon) = account.icon {
            return Ok(icon);
        }
        let icon = icon::icon_reference(&account.name, icon::DEFAULT_ICON_SIZE);
        store::set_account_icon(&self.conn, account_id, &icon)?;
        Ok(icon)
    }

    /// Runs `work` in one unit of work. Everything it changes commits together and
    /// reaches the index in a single sync.
    pub fn in_unit_of_work<T>(
        &mut self,
        work: impl FnOnce(&mut UnitOfWork<'_>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut uow = UnitOfWork::begin(&mut self.conn)?;
        let out = work(&mut uow)?;
        let changes = uow.snapshot_changes(&self.registry);
        uow.commit()?;
        self.after_commit(&changes);
        Ok(out)
    }

    /// Index failures never undo the commit: they are logged and the kinds are marked
    /// stale for a later `reindex`.
    fn after_commit(&self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        let Err(e) = IndexSynchronizer::new(&self.index).sync(changes) else {
            return;
        };
        error!("{e}");
        if let LedgerError::IndexUnavailable { kinds, .. } = &e {
            for kind in kinds {
                match db::mark_index_stale(&self.conn, kind) {
                    Ok(()) => warn!("Index for '{}' marked stale, run reindex", kind),
                    Err(err) => error!("Could not mark '{}' index stale: {err}", kind),
                }
            }
        }
    }
}
