// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

use crate::dates;
use crate::store;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs = store::fetch_transactions(conn, user)?;
    txs.sort_by_key(|t| (dates::normalize(&t.date), t.id));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "kind", "amount", "category", "description", "merchant",
            ])?;
            for t in &txs {
                let date = match dates::normalize(&t.date) {
                    Some(dt) => dates::format_date_for_input(dt),
                    None => t.date.to_column(),
                };
                wtr.write_record([
                    date,
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.category.clone().unwrap_or_default(),
                    t.description.clone().unwrap_or_default(),
                    t.merchant.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in &txs {
                items.push(json!({
                    "date": t.date,
                    "kind": t.kind,
                    "amount": t.amount,
                    "category": t.category,
                    "description": t.description,
                    "merchant": t.merchant,
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
