// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::dates::{self, RawDate};
use crate::utils::pretty_table;

/// Sweep the store for invariant violations the fail-open paths can leave
/// behind: dates nothing can normalize, history rows orphaned by a partial
/// delete cascade, purchases missing their detail row, negative amounts.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    let mut stmt = conn.prepare("SELECT id, date_raw FROM transactions")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let raw: String = r.get(1)?;
        if dates::normalize(&RawDate::parse(&raw)).is_none() {
            rows.push(vec!["fecha_invalida".into(), format!("tx {}: '{}'", id, raw)]);
        }
    }

    let mut stmt2 = conn.prepare(
        "SELECT ph.id, ph.transaction_id, ph.producto FROM price_history ph
         LEFT JOIN transactions t ON t.id = ph.transaction_id
         WHERE t.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let tx_id: i64 = r.get(1)?;
        let producto: String = r.get(2)?;
        rows.push(vec![
            "historial_huerfano".into(),
            format!("history {} -> tx {} ({})", id, tx_id, producto),
        ]);
    }

    let mut stmt3 = conn.prepare(
        "SELECT t.id FROM transactions t
         LEFT JOIN purchase_details d ON d.transaction_id = t.id
         WHERE t.kind='compra' AND d.transaction_id IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["compra_sin_detalle".into(), format!("tx {}", id)]);
    }

    let mut stmt4 = conn.prepare("SELECT id, amount FROM transactions")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        match amount_s.parse::<Decimal>() {
            Ok(a) if a >= Decimal::ZERO => {}
            _ => rows.push(vec![
                "monto_invalido".into(),
                format!("tx {}: '{}'", id, amount_s),
            ]),
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
