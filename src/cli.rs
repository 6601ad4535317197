// Copyright (c) Pocketbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as one JSON object per line"),
    )
}

fn as_of_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("Resolve the period as of this date (YYYY-MM-DD, default today)")
}

pub fn build_cli() -> Command {
    Command::new("pocketbook")
        .version(crate_version!())
        .about("Personal-finance periods, budgets, savings goals, and cash flow")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("profile")
                .about("Show or edit the user profile")
                .subcommand(json_flags(Command::new("show").about("Show the profile")))
                .subcommand(
                    Command::new("set")
                        .about("Update profile fields")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("email").long("email"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("monthly_limit").long("monthly-limit"))
                        .arg(
                            Arg::new("period_type")
                                .long("period-type")
                                .help("weekly|biweekly|monthly|bimonthly"),
                        )
                        .arg(
                            Arg::new("period_start_day")
                                .long("period-start-day")
                                .value_parser(clap::value_parser!(u32)),
                        ),
                ),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add an account")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("cash|debit|credit|investment|loan"),
                        )
                        .arg(Arg::new("balance").long("balance").help("Opening balance"))
                        .arg(Arg::new("credit_limit").long("credit-limit"))
                        .arg(
                            Arg::new("default")
                                .long("default")
                                .action(ArgAction::SetTrue)
                                .help("Make this the default account"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List accounts")))
                .subcommand(
                    Command::new("set-default")
                        .about("Mark an account as default")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove an account")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("transfer")
                        .about("Move money between accounts")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                        .arg(Arg::new("note").long("note")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (positive = expense, negative = income)")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("account").long("account").help("Account name"))
                        .arg(
                            Arg::new("fixed")
                                .long("fixed")
                                .action(ArgAction::SetTrue)
                                .help("Mark as a fixed (contractual) expense"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a transaction; account balances are adjusted")
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64)))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("account").long("account")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction, reversing its balance effect")
                        .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage category budgets")
                .subcommand(
                    Command::new("set")
                        .about("Set (or replace) the budget for a category")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_flags(Command::new("list").about("List budgets")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category budget")
                        .arg(Arg::new("category").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Budget utilization for the active period")
                        .arg(as_of_arg()),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Manage savings goals")
                .subcommand(
                    Command::new("add")
                        .about("Add a savings goal")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("deadline").long("deadline").required(true))
                        .arg(Arg::new("current").long("current").help("Amount already saved")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List goals with required monthly contributions")
                        .arg(as_of_arg()),
                ))
                .subcommand(
                    Command::new("contribute")
                        .about("Record progress toward a goal")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("amount").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a goal")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring items")
                .subcommand(
                    Command::new("add")
                        .about("Add a recurring item")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .help("weekly|biweekly|monthly|yearly"),
                        )
                        .arg(Arg::new("next_date").long("next-date").required(true))
                        .arg(
                            Arg::new("variable")
                                .long("variable")
                                .action(ArgAction::SetTrue)
                                .help("Amount varies; must be confirmed when posting"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List recurring items")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a recurring item")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("due")
                        .about("List items due on or before a date")
                        .arg(as_of_arg()),
                ))
                .subcommand(
                    Command::new("post")
                        .about("Post a due item as a transaction and advance its schedule")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true)
                                .help("Actual amount (required for variable items)"),
                        )
                        .arg(Arg::new("date").long("date").help("Posting date, default the due date"))
                        .arg(Arg::new("account").long("account")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Period analytics")
                .subcommand(json_flags(
                    Command::new("overview")
                        .about("Income, expense, savings rate, and safe-to-spend for the period")
                        .arg(as_of_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Monthly income/expense bars")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(clap::value_parser!(u32))
                                .help("How many months back (default 6)"),
                        )
                        .arg(as_of_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Category breakdown for the active period")
                        .arg(as_of_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("leaks")
                        .about("Unbudgeted spending for the active period")
                        .arg(as_of_arg()),
                )),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV")
                    .arg(Arg::new("file").long("file").required(true))
                    .arg(
                        Arg::new("account")
                            .long("account")
                            .help("Account applied to rows without one"),
                    ),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions to CSV or JSON")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}
