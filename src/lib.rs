// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod books;
pub mod cli;
pub mod commands;
pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod icon;
pub mod index;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod registry;
pub mod search;
pub mod store;
pub mod sync;
pub mod tracker;
pub mod utils;

pub use books::{Books, PendingTransaction};
pub use error::LedgerError;
