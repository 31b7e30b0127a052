// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::{Datelike, Local};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{self, Summary};
use crate::periods::Period;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::validate;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validate the report arguments, fetch the user's data once, and run the
/// whole pipeline with today's date injected.
fn compute(conn: &Connection, sub: &clap::ArgMatches) -> Result<Summary> {
    let user = sub.get_one::<String>("user").unwrap();
    let period_key = sub.get_one::<String>("period").unwrap();
    let today = Local::now().date_naive();
    let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
    let month = sub.get_one::<u32>("month").copied();

    let errs = validate::validate_report_args(period_key, year, month);
    if !errs.is_empty() {
        for e in &errs {
            eprintln!("{}", e);
        }
        if !validate::only_fallback_warnings(&errs) {
            bail!("Invalid report arguments");
        }
    }
    // Unknown period keys fall back to the full supplied year.
    let period = Period::parse(period_key).unwrap_or(Period::ThisYear);

    let txs = store::fetch_transactions(conn, user)?;
    let profile = store::load_profile(conn, user)?;
    Ok(analytics::run(
        &txs,
        profile.as_ref(),
        period,
        year,
        month,
        today,
    ))
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = compute(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Ingresos".to_string(), fmt_money(&s.total_income)],
        vec!["Gastos".to_string(), fmt_money(&s.total_expenses)],
        vec!["Balance".to_string(), fmt_money(&s.balance)],
        vec![
            "Ingreso fijo del período".to_string(),
            fmt_money(&s.fixed_income_for_period),
        ],
        vec![
            "Gasto fijo del período".to_string(),
            fmt_money(&s.fixed_expenses_for_period),
        ],
        vec!["Movimientos".to_string(), s.transaction_count.to_string()],
    ];
    println!("{}", pretty_table(&["Concepto", "Monto"], rows));
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = compute(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &s.monthly)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = s
        .monthly
        .iter()
        .map(|m| {
            vec![
                m.month.clone(),
                fmt_money(&m.income),
                fmt_money(&m.expenses),
                fmt_money(&m.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Mes", "Ingresos", "Gastos", "Balance"], rows)
    );
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    categoria: String,
    monto: Decimal,
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = compute(conn, sub)?;
    let mut items: Vec<CategoryRow> = s
        .expenses_by_category
        .into_iter()
        .map(|(categoria, monto)| CategoryRow { categoria, monto })
        .collect();
    items.sort_by(|a, b| b.monto.cmp(&a.monto).then(a.categoria.cmp(&b.categoria)));
    if maybe_print_json(json_flag, jsonl_flag, &items)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = items
        .into_iter()
        .map(|r| vec![r.categoria, fmt_money(&r.monto)])
        .collect();
    println!("{}", pretty_table(&["Categoría", "Gasto"], rows));
    Ok(())
}
