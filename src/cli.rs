// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .default_value("default")
        .help("User the records belong to")
}

fn with_json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn report_args(cmd: Command) -> Command {
    with_json_flags(
        cmd.arg(user_arg())
            .arg(
                Arg::new("period")
                    .long("period")
                    .default_value("thisMonth")
                    .help("thisMonth|lastMonth|last3Months|last6Months|thisYear|custom"),
            )
            .arg(
                Arg::new("year")
                    .long("year")
                    .value_parser(value_parser!(i32))
                    .help("Anchor year for thisYear/custom (defaults to the current year)"),
            )
            .arg(
                Arg::new("month")
                    .long("month")
                    .value_parser(value_parser!(u32))
                    .help("Month 1-12, required for the custom period"),
            ),
    )
}

pub fn build_cli() -> Command {
    Command::new("plata")
        .about("Plata: personal finance tracking with fixed budgets, purchases, and spending analytics")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an income, expense, or debt")
                        .arg(user_arg())
                        .arg(Arg::new("kind").long("kind").default_value("expense").help("income|expense|debt"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("payment-method").long("payment-method").help("efectivo|debito|credito|transferencia"))
                        .arg(Arg::new("installments").long("installments").value_parser(value_parser!(u32))),
                )
                .subcommand(with_json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("limit").long("limit").value_parser(value_parser!(usize))),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit merchant, payment method, or installments")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("payment-method").long("payment-method"))
                        .arg(Arg::new("installments").long("installments").value_parser(value_parser!(u32))),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a transaction and its price-history rows")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("compra")
                .about("Supermarket purchases with itemized products")
                .subcommand(
                    Command::new("add")
                        .about("Record a purchase")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("supermercado").long("supermercado").required(true))
                        .arg(Arg::new("ubicacion").long("ubicacion"))
                        .arg(Arg::new("metodo-pago").long("metodo-pago"))
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("Line item as NOMBRE:CANTIDAD(un|kg|lt):PRECIO, e.g. 'Leche:2un:1200'"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Re-edit a purchase wholesale (items and history are rewritten)")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("supermercado").long("supermercado").required(true))
                        .arg(Arg::new("ubicacion").long("ubicacion"))
                        .arg(Arg::new("metodo-pago").long("metodo-pago"))
                        .arg(
                            Arg::new("item")
                                .long("item")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("Line item as NOMBRE:CANTIDAD(un|kg|lt):PRECIO"),
                        ),
                )
                .subcommand(with_json_flags(
                    Command::new("show")
                        .about("Show a purchase with its line items")
                        .arg(user_arg())
                        .arg(Arg::new("id").long("id").required(true).value_parser(value_parser!(i64))),
                )),
        )
        .subcommand(
            Command::new("profile")
                .about("Recurring monthly income and fixed expenses")
                .subcommand(
                    Command::new("set")
                        .about("Write the profile (unset flags keep their current value)")
                        .arg(user_arg())
                        .arg(Arg::new("monthly-income").long("monthly-income"))
                        .arg(Arg::new("housing").long("housing"))
                        .arg(Arg::new("phone").long("phone"))
                        .arg(Arg::new("internet").long("internet"))
                        .arg(Arg::new("credit-cards").long("credit-cards"))
                        .arg(Arg::new("loans").long("loans"))
                        .arg(Arg::new("insurance").long("insurance"))
                        .arg(Arg::new("income-start").long("income-start").help("YYYY-MM-DD"))
                        .arg(Arg::new("expenses-start").long("expenses-start").help("YYYY-MM-DD")),
                )
                .subcommand(with_json_flags(
                    Command::new("show").about("Show the profile with derived totals").arg(user_arg()),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views over a period")
                .subcommand(report_args(Command::new("summary").about("Totals, balance, and fixed amounts")))
                .subcommand(report_args(Command::new("monthly").about("Per-month income/expense/balance")))
                .subcommand(report_args(Command::new("categories").about("Expenses grouped by category"))),
        )
        .subcommand(
            Command::new("prices")
                .about("Product price history and trends")
                .subcommand(with_json_flags(
                    Command::new("trends")
                        .about("Price movement per product from its two most recent purchases")
                        .arg(user_arg()),
                ))
                .subcommand(with_json_flags(
                    Command::new("history")
                        .about("Recorded prices of one product")
                        .arg(user_arg())
                        .arg(Arg::new("producto").long("producto").required(true)),
                )),
        )
        .subcommand(
            Command::new("migrate")
                .about("Data migrations")
                .subcommand(
                    Command::new("legacy")
                        .about("Copy legacy documents into the unified transactions table (idempotent)")
                        .arg(user_arg())
                        .arg(Arg::new("path").long("path").required(true).help("JSON file with the legacy documents"))
                        .arg(Arg::new("collection").long("collection").required(true).help("Name of the legacy collection being copied")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export a user's transactions")
                        .arg(user_arg())
                        .arg(Arg::new("format").long("format").default_value("csv").help("csv|json"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for invariant violations"))
}
