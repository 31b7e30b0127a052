// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use crate::dates::RawDate;
use crate::models::{PaymentMethod, Transaction, TxKind};
use crate::store;

/// A document from one of the legacy per-user subcollections. Field names
/// follow the legacy export; the date is kept as whatever JSON value it was.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyDoc {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    amount: serde_json::Number,
    category: Option<String>,
    date: serde_json::Value,
    description: Option<String>,
    merchant: Option<String>,
    payment_method: Option<String>,
    installments: Option<u32>,
}

fn raw_date_from_value(v: &serde_json::Value) -> RawDate {
    match v {
        serde_json::Value::String(s) => RawDate::parse(s),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(ms) => RawDate::Epoch(ms),
            None => RawDate::Text(n.to_string()),
        },
        other => serde_json::from_value::<RawDate>(other.clone())
            .unwrap_or_else(|_| RawDate::Text(other.to_string())),
    }
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("legacy", sub)) => legacy(conn, sub),
        _ => Ok(()),
    }
}

/// One-time, non-destructive copy of legacy documents into the unified
/// transactions table. Idempotent: a `(legacy_id, legacy_collection)` pair
/// that was copied before is skipped, so re-runs are safe.
fn legacy(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let path = sub.get_one::<String>("path").unwrap().trim();
    let collection = sub.get_one::<String>("collection").unwrap();

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Read legacy export at {}", path))?;
    let docs: Vec<LegacyDoc> =
        serde_json::from_str(&raw).with_context(|| format!("Parse legacy export at {}", path))?;

    let mut copied = 0usize;
    let mut skipped = 0usize;
    let mut invalid = 0usize;
    for doc in docs {
        if store::legacy_exists(conn, &doc.id, collection)? {
            skipped += 1;
            continue;
        }
        let Some(kind) = TxKind::parse(&doc.kind) else {
            warn!(id = %doc.id, kind = %doc.kind, "skipping legacy document with unknown type");
            invalid += 1;
            continue;
        };
        let Ok(amount) = doc.amount.to_string().parse::<Decimal>() else {
            warn!(id = %doc.id, amount = %doc.amount, "skipping legacy document with unreadable amount");
            invalid += 1;
            continue;
        };
        if amount < Decimal::ZERO {
            warn!(id = %doc.id, %amount, "skipping legacy document with negative amount");
            invalid += 1;
            continue;
        }
        // The raw date is copied as-is, even when it will not normalize;
        // aggregation drops such records fail-open, and doctor reports them.
        let tx = Transaction {
            id: 0,
            user_id: user.clone(),
            kind,
            amount,
            category: doc.category,
            date: raw_date_from_value(&doc.date),
            description: doc.description,
            merchant: doc.merchant,
            payment_method: doc.payment_method.as_deref().and_then(PaymentMethod::parse),
            installments: doc.installments,
        };
        store::insert_legacy_transaction(conn, &tx, &doc.id, collection)?;
        copied += 1;
    }
    println!(
        "Migrated collection '{}': {} copied, {} already present, {} invalid",
        collection, copied, skipped, invalid
    );
    Ok(())
}
