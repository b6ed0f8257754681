// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use fundtrail::books::Books;
use fundtrail::config::Config;
use fundtrail::index::FtsIndex;
use fundtrail::registry::SearchRegistry;
use fundtrail::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_matches(&matches)?;
    logging::init(&config.log_filter);

    let conn = db::open_at(&config.db_path)?;
    let registry = SearchRegistry::default();
    let index = FtsIndex::open(&config.index_path, &registry)
        .with_context(|| format!("Open search index at {}", config.index_path.display()))?;
    let mut books = Books::with_registry(conn, index, registry);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&mut books, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut books, sub)?,
        Some(("search", sub)) => commands::search::handle(&books, sub)?,
        Some(("reindex", sub)) => commands::reindex::handle(&mut books, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut books, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&books)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
