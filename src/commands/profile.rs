// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::validate;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn amount_arg(
    sub: &clap::ArgMatches,
    name: &str,
    current: Decimal,
    errs: &mut Vec<validate::ValidationError>,
) -> Result<Decimal> {
    let Some(s) = sub.get_one::<String>(name) else {
        return Ok(current);
    };
    let v = parse_decimal(s)?;
    errs.extend(validate::validate_amount(v).into_iter().map(|mut e| {
        e.field = name.to_string();
        e
    }));
    Ok(v)
}

/// The set form is prefilled with the stored profile, then the whole
/// document is written back, matching the original app's wholesale updates.
fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let mut p = store::load_profile(conn, user)?.unwrap_or_default();

    let mut errs = Vec::new();
    p.monthly_income = amount_arg(sub, "monthly-income", p.monthly_income, &mut errs)?;
    p.fixed_expenses.housing = amount_arg(sub, "housing", p.fixed_expenses.housing, &mut errs)?;
    p.fixed_expenses.phone = amount_arg(sub, "phone", p.fixed_expenses.phone, &mut errs)?;
    p.fixed_expenses.internet = amount_arg(sub, "internet", p.fixed_expenses.internet, &mut errs)?;
    p.fixed_expenses.credit_cards =
        amount_arg(sub, "credit-cards", p.fixed_expenses.credit_cards, &mut errs)?;
    p.fixed_expenses.loans = amount_arg(sub, "loans", p.fixed_expenses.loans, &mut errs)?;
    p.fixed_expenses.insurance =
        amount_arg(sub, "insurance", p.fixed_expenses.insurance, &mut errs)?;
    if !errs.is_empty() {
        for e in &errs {
            eprintln!("{}", e);
        }
        bail!("Invalid profile");
    }

    if let Some(s) = sub.get_one::<String>("income-start") {
        p.income_start = Some(parse_date(s)?);
    }
    if let Some(s) = sub.get_one::<String>("expenses-start") {
        p.expenses_start = Some(parse_date(s)?);
    }

    store::save_profile(conn, user, &p)?;
    println!(
        "Profile saved: income {}, fixed expenses {}, available {}",
        fmt_money(&p.monthly_income),
        fmt_money(&p.total_fixed_expenses()),
        fmt_money(&p.available_income())
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let Some(p) = store::load_profile(conn, user)? else {
        println!("No profile configured for '{}'", user);
        return Ok(());
    };

    if maybe_print_json(json_flag, jsonl_flag, &serde_json::json!({
        "profile": p,
        "total_fixed_expenses": p.total_fixed_expenses(),
        "available_income": p.available_income(),
    }))? {
        return Ok(());
    }

    let mut rows = vec![vec![
        "Ingreso mensual".to_string(),
        fmt_money(&p.monthly_income),
    ]];
    for (label, amount) in p.fixed_expenses.labeled() {
        rows.push(vec![label.to_string(), fmt_money(&amount)]);
    }
    rows.push(vec![
        "Total gastos fijos".to_string(),
        fmt_money(&p.total_fixed_expenses()),
    ]);
    rows.push(vec![
        "Disponible".to_string(),
        fmt_money(&p.available_income()),
    ]);
    if let Some(d) = p.income_start {
        rows.push(vec!["Ingreso fijo desde".to_string(), d.to_string()]);
    }
    if let Some(d) = p.expenses_start {
        rows.push(vec!["Gastos fijos desde".to_string(), d.to_string()]);
    }
    println!("{}", pretty_table(&["Campo", "Valor"], rows));
    Ok(())
}
