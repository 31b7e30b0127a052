// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::dates::{self, RawDate};
use crate::models::{PaymentMethod, Transaction, TxKind};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::validate;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("delete", sub)) => delete(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_payment_method(s: &str) -> Result<PaymentMethod> {
    match PaymentMethod::parse(s) {
        Some(p) => Ok(p),
        None => bail!(
            "Unknown payment method '{}' (use efectivo|debito|credito|transferencia)",
            s
        ),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let kind_s = sub.get_one::<String>("kind").unwrap();
    let Some(kind) = TxKind::parse(kind_s) else {
        bail!("Unknown kind '{}' (use income|expense|debt)", kind_s);
    };
    if kind == TxKind::Compra {
        bail!("Purchases are recorded with 'compra add'");
    }
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let errs = validate::validate_amount(amount);
    if !errs.is_empty() {
        for e in &errs {
            eprintln!("{}", e);
        }
        bail!("Invalid transaction");
    }
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let payment_method = sub
        .get_one::<String>("payment-method")
        .map(|s| parse_payment_method(s))
        .transpose()?;

    let tx = Transaction {
        id: 0,
        user_id: user.clone(),
        kind,
        amount,
        category: sub.get_one::<String>("category").cloned(),
        date: RawDate::from(date),
        description: sub.get_one::<String>("description").cloned(),
        merchant: sub.get_one::<String>("merchant").cloned(),
        payment_method,
        installments: sub.get_one::<u32>("installments").copied(),
    };
    let id = store::insert_transaction(conn, &tx)?;
    println!("Recorded {} {} on {} (id {})", kind.as_str(), amount, date, id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub merchant: String,
}

/// List rows for a user, filtered and sorted client-side: the raw dates are
/// polymorphic, so month filtering has to go through the normalizer.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = sub.get_one::<String>("user").unwrap();
    let month = sub
        .get_one::<String>("month")
        .map(|s| {
            parse_date(&format!("{}-01", s)).map(|d| {
                use chrono::Datelike;
                (d.year(), d.month())
            })
        })
        .transpose()?;
    let kind = sub.get_one::<String>("kind").and_then(|s| TxKind::parse(s));
    let category = sub.get_one::<String>("category");

    let mut txs: Vec<Transaction> = store::fetch_transactions(conn, user)?
        .into_iter()
        .filter(|t| {
            if let Some(k) = kind {
                if t.kind != k {
                    return false;
                }
            }
            if let Some(c) = category {
                if t.category.as_deref() != Some(c.as_str()) {
                    return false;
                }
            }
            if let Some((y, m)) = month {
                use chrono::Datelike;
                match dates::normalize_to_date(&t.date) {
                    Some(d) => d.year() == y && d.month() == m,
                    None => false,
                }
            } else {
                true
            }
        })
        .collect();
    txs.sort_by_key(|t| std::cmp::Reverse((dates::normalize(&t.date), t.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }

    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: match dates::normalize(&t.date) {
                Some(dt) => dates::format_date_for_input(dt),
                None => t.date.to_column(),
            },
            kind: t.kind.as_str().to_string(),
            amount: t.amount.to_string(),
            category: t.category.unwrap_or_default(),
            description: t.description.unwrap_or_default(),
            merchant: t.merchant.unwrap_or_default(),
        })
        .collect())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.merchant.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "Category", "Description", "Merchant"],
                rows,
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id = *sub.get_one::<i64>("id").unwrap();
    let payment_method = sub
        .get_one::<String>("payment-method")
        .map(|s| parse_payment_method(s))
        .transpose()?;
    store::update_transaction_meta(
        conn,
        user,
        id,
        sub.get_one::<String>("merchant").cloned(),
        payment_method,
        sub.get_one::<u32>("installments").copied(),
    )?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn delete(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id = *sub.get_one::<i64>("id").unwrap();
    store::delete_transaction_cascade(conn, user, id)?;
    println!("Deleted transaction {}", id);
    Ok(())
}
