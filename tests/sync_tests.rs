// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{account, books, category, conn, dec, tx};
use fundtrail::error::LedgerError;
use fundtrail::index::{IndexProvider, MemoryIndex};
use fundtrail::ledger;
use fundtrail::models::{Entity, LinkedTransaction, NewAccount, Transaction, TransactionType};
use fundtrail::books::Books;
use fundtrail::registry::{KindDescriptor, SearchRegistry};
use fundtrail::store::{self, UnitOfWork};
use fundtrail::sync::IndexSynchronizer;
use fundtrail::tracker::{self, ChangeSet, IndexDocument, IndexKey};

fn linked(id: i64, description: &str) -> LinkedTransaction {
    LinkedTransaction {
        transaction: Transaction {
            id,
            r#type: TransactionType::Expense,
            datetime: common::at("2024-01-01"),
            src_account_id: Some(1),
            dest_account_id: Some(2),
            value_src: dec("1"),
            currency_src: "EUR".into(),
            value_dest: dec("1"),
            currency_dest: "EUR".into(),
            r#where: Some("Berlin".into()),
            description: Some(description.into()),
        },
        src_account_name: Some("Checking".into()),
        dest_account_name: None,
    }
}

#[test]
fn snapshot_keeps_only_searchable_kinds() {
    let registry = SearchRegistry::default();
    let account = Entity::Account(fundtrail::models::Account {
        id: 1,
        name: "Checking".into(),
        description: None,
        balance: dec("0"),
        currency: "EUR".into(),
        is_category: false,
        icon: None,
    });
    let changes = tracker::snapshot(
        &registry,
        &[Entity::Transaction(linked(5, "rent")), account.clone()],
        &[account.clone()],
        &[Entity::Transaction(linked(6, "gone")), account],
    );

    assert_eq!(changes.adds.len(), 1);
    assert!(changes.updates.is_empty());
    assert_eq!(
        changes.deletes,
        vec![IndexKey {
            kind: "transaction",
            id: 6
        }]
    );
    assert_eq!(changes.len(), 2);

    let doc = &changes.adds[0];
    assert_eq!(doc.id, 5);
    // absent destination name is left out
    assert_eq!(
        doc.fields,
        vec![
            ("description".to_string(), "rent".to_string()),
            ("where".to_string(), "Berlin".to_string()),
            ("src_account.name".to_string(), "Checking".to_string()),
        ]
    );
}

#[test]
fn empty_registry_tracks_nothing() {
    let changes = tracker::snapshot(
        &SearchRegistry::empty(),
        &[Entity::Transaction(linked(1, "a"))],
        &[],
        &[Entity::Transaction(linked(2, "b"))],
    );
    assert!(changes.is_empty());
}

#[test]
fn synchronizer_applies_adds_updates_and_deletes() {
    let index = MemoryIndex::new();
    index
        .add_or_update("transaction", 9, &[("description".into(), "old".into())])
        .unwrap();
    index
        .add_or_update("transaction", 4, &[("description".into(), "stale".into())])
        .unwrap();

    let changes = ChangeSet {
        adds: vec![IndexDocument {
            kind: "transaction",
            id: 1,
            fields: vec![("description".into(), "new".into())],
        }],
        updates: vec![IndexDocument {
            kind: "transaction",
            id: 4,
            fields: vec![("description".into(), "fresh".into())],
        }],
        deletes: vec![IndexKey {
            kind: "transaction",
            id: 9,
        }],
    };
    IndexSynchronizer::new(&index).sync(&changes).unwrap();

    let ids: Vec<i64> = index
        .documents("transaction")
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(
        index.document("transaction", 4).unwrap(),
        vec![("description".to_string(), "fresh".to_string())]
    );
}

#[test]
fn index_reflects_committed_state_after_creates_and_deletes() {
    let mut books = books();
    let a = account(&mut books, "Checking", "EUR");
    let food = category(&mut books, "Food", "EUR");

    let mut ids = Vec::new();
    for (i, what) in ["bread", "cheese", "wine", "olives"].iter().enumerate() {
        let t = books
            .add_transaction(
                tx(
                    TransactionType::Expense,
                    &format!("2024-03-0{}", i + 1),
                    "2",
                    "EUR",
                    "EUR",
                    what,
                ),
                a.id,
                Some(food.id),
            )
            .unwrap();
        ids.push(t.id);
    }
    books.remove_transaction(ids[1], a.id).unwrap();
    books.remove_transaction(ids[3], a.id).unwrap();

    let docs = books.index().documents("transaction");
    let indexed: Vec<i64> = docs.iter().map(|(id, _)| *id).collect();
    assert_eq!(indexed, vec![ids[0], ids[2]]);
    assert_eq!(
        books.index().document("transaction", ids[2]).unwrap(),
        vec![
            ("description".to_string(), "wine".to_string()),
            ("src_account.name".to_string(), "Checking".to_string()),
            ("dest_account.name".to_string(), "Food".to_string()),
        ]
    );
    // accounts are not searchable
    assert!(books.index().documents("account").is_empty());
}

#[test]
fn unavailable_index_keeps_commit_and_marks_stale() {
    let mut books = books();
    let a = account(&mut books, "Checking", "EUR");
    books.index().set_available(false);

    let t = books
        .add_transaction(
            tx(TransactionType::Income, "2024-03-01", "10", "EUR", "EUR", "bonus"),
            a.id,
            None,
        )
        .unwrap();
    assert_eq!(books.account(a.id).unwrap().balance, dec("10"));
    assert_eq!(books.transaction(t.id).unwrap().transaction.id, t.id);

    let stale = books.stale_kinds().unwrap();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].0, "transaction");

    let err = books.search("transaction", "bonus", 1, 10).unwrap_err();
    assert!(matches!(err, LedgerError::IndexUnavailable { .. }));

    books.index().set_available(true);
    assert_eq!(books.reindex("transaction").unwrap(), 1);
    assert!(books.stale_kinds().unwrap().is_empty());
    assert_eq!(books.search("transaction", "bonus", 1, 10).unwrap().ids, vec![t.id]);
}

#[test]
fn reindex_twice_equals_once() {
    let mut books = books();
    let a = account(&mut books, "Checking", "EUR");
    let b = account(&mut books, "Savings", "EUR");
    for d in ["first", "second", "third"] {
        books
            .add_transaction(
                tx(TransactionType::Transfer, "2024-03-01", "1", "EUR", "EUR", d),
                a.id,
                Some(b.id),
            )
            .unwrap();
    }
    // a document the ledger no longer knows about
    books
        .index()
        .add_or_update("transaction", 999, &[("description".into(), "ghost".into())])
        .unwrap();

    assert_eq!(books.reindex("transaction").unwrap(), 3);
    let once = books.index().documents("transaction");
    assert_eq!(books.reindex("transaction").unwrap(), 3);
    let twice = books.index().documents("transaction");
    assert_eq!(once, twice);
    assert!(once.iter().all(|(id, _)| *id != 999));
}

#[test]
fn reindex_of_unknown_kind_fails() {
    let mut books = books();
    assert!(matches!(
        books.reindex("budget"),
        Err(LedgerError::UnknownKind(k)) if k == "budget"
    ));
}

#[test]
fn dropped_unit_of_work_changes_nothing() {
    let mut conn = conn();
    let a = store::insert_account(
        &conn,
        &NewAccount {
            name: "Checking".into(),
            description: None,
            currency: "EUR".into(),
            is_category: false,
        },
    )
    .unwrap();
    let index = MemoryIndex::new();
    let registry = SearchRegistry::default();

    {
        let mut uow = UnitOfWork::begin(&mut conn).unwrap();
        ledger::add_transaction(
            &mut uow,
            &tx(TransactionType::Income, "2024-03-01", "10", "EUR", "EUR", "never"),
            a.id,
            None,
        )
        .unwrap();
        let (new, dirty, deleted) = uow.pending();
        assert_eq!((new.len(), dirty.len(), deleted.len()), (1, 1, 0));
        assert_eq!(uow.snapshot_changes(&registry).adds.len(), 1);
    }

    assert_eq!(store::load_account(&conn, a.id).unwrap().balance, dec("0"));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
    assert!(index.documents("transaction").is_empty());
}

#[test]
fn add_then_remove_in_one_unit_leaves_no_trace() {
    let mut conn = conn();
    let new = NewAccount {
        name: "Checking".into(),
        description: None,
        currency: "EUR".into(),
        is_category: false,
    };
    let a = store::insert_account(&conn, &new).unwrap();
    let registry = SearchRegistry::default();

    let mut uow = UnitOfWork::begin(&mut conn).unwrap();
    let t = ledger::add_transaction(
        &mut uow,
        &tx(TransactionType::Income, "2024-03-01", "10", "EUR", "EUR", "blip"),
        a.id,
        None,
    )
    .unwrap();
    ledger::remove_transaction(&mut uow, t.transaction.id, a.id).unwrap();
    let changes = uow.snapshot_changes(&registry);
    uow.commit().unwrap();

    assert!(changes.is_empty());
    assert_eq!(store::load_account(&conn, a.id).unwrap().balance, dec("0"));
}

#[test]
fn registered_accounts_enter_and_leave_the_index() {
    let registry = SearchRegistry::default().register(KindDescriptor {
        kind: "account",
        fields: &["name", "description"],
    });
    let mut books = Books::with_registry(conn(), MemoryIndex::new(), registry);

    let a = account(&mut books, "Checking", "EUR");
    assert_eq!(
        books.index().documents("account"),
        vec![(a.id, vec![("name".to_string(), "Checking".to_string())])]
    );
    assert_eq!(books.search("account", "Checking", 1, 10).unwrap().ids, vec![a.id]);

    books.remove_account(a.id).unwrap();
    assert!(books.index().documents("account").is_empty());
    assert_eq!(books.search("account", "Checking", 1, 10).unwrap().total, 0);
}

#[test]
fn one_unit_with_creates_and_a_delete_syncs_once() {
    let mut books = books();
    let a = account(&mut books, "Checking", "EUR");
    let food = category(&mut books, "Food", "EUR");
    let bread = books
        .add_transaction(
            tx(TransactionType::Expense, "2024-03-01", "2", "EUR", "EUR", "bread"),
            a.id,
            Some(food.id),
        )
        .unwrap();

    let (cheese, wine) = books
        .in_unit_of_work(|uow| {
            let cheese = ledger::add_transaction(
                uow,
                &tx(TransactionType::Expense, "2024-03-02", "3", "EUR", "EUR", "cheese"),
                a.id,
                Some(food.id),
            )?;
            let wine = ledger::add_transaction(
                uow,
                &tx(TransactionType::Expense, "2024-03-03", "5", "EUR", "EUR", "wine"),
                a.id,
                Some(food.id),
            )?;
            ledger::remove_transaction(uow, bread.id, a.id)?;
            Ok((cheese.transaction.id, wine.transaction.id))
        })
        .unwrap();

    let indexed: Vec<i64> = books
        .index()
        .documents("transaction")
        .iter()
        .map(|(id, _)| *id)
        .collect();
    assert_eq!(indexed, vec![cheese, wine]);
    assert_eq!(books.search("transaction", "bread", 1, 10).unwrap().total, 0);
    assert_eq!(books.search("transaction", "cheese", 1, 10).unwrap().ids, vec![cheese]);
    assert_eq!(books.account(a.id).unwrap().balance, dec("-8"));
    assert_eq!(books.account(food.id).unwrap().balance, dec("8"));

    // a failing unit leaves both the ledger and the index as they were
    let err = books
        .in_unit_of_work(|uow| {
            ledger::remove_transaction(uow, cheese, a.id)?;
            ledger::remove_transaction(uow, 999, a.id)
        })
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(999)));
    assert_eq!(books.index().documents("transaction").len(), 2);
    assert_eq!(books.account(a.id).unwrap().balance, dec("-8"));
}
