// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("fundtrail")
        .about("Double-entry personal ledger with full-text transaction search")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FUNDTRAIL_DB")
                .help("Path of the ledger database"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .env("FUNDTRAIL_LOG")
                .help("Log filter, e.g. info or fundtrail=debug"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts and categories")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .default_value("EUR"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .action(ArgAction::SetTrue)
                                .help("Create a virtual category account"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("show")
                        .about("Balance, icon and the transactions of the current window")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("today").long("today").help("YYYY-MM-DD")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, remove and list transactions")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("expense, income or transfer"),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Source account, or the receiver of an income"),
                        )
                        .arg(Arg::new("to").long("to").help("Counterpart account"))
                        .arg(Arg::new("value").long("value").required(true))
                        .arg(Arg::new("value-dest").long("value-dest"))
                        .arg(Arg::new("currency-src").long("currency-src"))
                        .arg(Arg::new("currency-dest").long("currency-dest"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, default now"),
                        )
                        .arg(Arg::new("where").long("where"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("account")
                                .long("account")
                                .required(true)
                                .help("Account that issued the transaction"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("account").long("account"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(json_flags(
            Command::new("search")
                .about("Full-text search over transactions")
                .arg(Arg::new("expression").required(true))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .value_parser(value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("per-page")
                        .long("per-page")
                        .value_parser(value_parser!(usize))
                        .default_value("20"),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .action(ArgAction::Append)
                        .help("Restrict matching to an indexed field, repeatable"),
                ),
        ))
        .subcommand(
            Command::new("reindex")
                .about("Rebuild the search index from the ledger")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .help("Only this kind, default every searchable kind"),
                ),
        )
        .subcommand(
            Command::new("import")
                .subcommand_required(true)
                .subcommand(
                    Command::new("transactions")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check balances and index health"))
}
