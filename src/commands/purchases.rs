// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;

use crate::dates::RawDate;
use crate::models::{PaymentMethod, PricingMode, PurchaseDetail, PurchaseItem};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

static ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<nombre>.+):(?P<cantidad>\d+(?:\.\d+)?)(?P<unidad>un|kg|lt):(?P<precio>\d+(?:\.\d+)?)$")
        .unwrap()
});

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Parse a `NOMBRE:CANTIDAD(un|kg|lt):PRECIO` item spec. The unit picks the
/// pricing mode: quantity of units, weight at a per-kilo price, or volume at
/// a per-liter price.
pub fn parse_item(spec: &str) -> Result<PurchaseItem> {
    let caps = ITEM_RE
        .captures(spec.trim())
        .ok_or_else(|| anyhow!("Invalid item '{}', expected NOMBRE:CANTIDAD(un|kg|lt):PRECIO", spec))?;
    let nombre = caps["nombre"].trim().to_string();
    if nombre.is_empty() {
        bail!("Invalid item '{}': empty product name", spec);
    }
    let cantidad = parse_decimal(&caps["cantidad"])?;
    let precio = parse_decimal(&caps["precio"])?;
    let modo = match &caps["unidad"] {
        "kg" => PricingMode::Kilo,
        "lt" => PricingMode::Litro,
        _ => PricingMode::Unidad,
    };
    Ok(PurchaseItem::new(nombre, modo, cantidad, precio))
}

fn detail_from_args(sub: &clap::ArgMatches) -> Result<PurchaseDetail> {
    let metodo_pago = sub
        .get_one::<String>("metodo-pago")
        .map(|s| {
            PaymentMethod::parse(s).ok_or_else(|| {
                anyhow!(
                    "Unknown payment method '{}' (use efectivo|debito|credito|transferencia)",
                    s
                )
            })
        })
        .transpose()?;
    let mut items = Vec::new();
    for spec in sub.get_many::<String>("item").unwrap_or_default() {
        items.push(parse_item(spec)?);
    }
    if items.is_empty() {
        bail!("A purchase needs at least one --item");
    }
    Ok(PurchaseDetail {
        supermercado: sub.get_one::<String>("supermercado").unwrap().clone(),
        ubicacion: sub.get_one::<String>("ubicacion").cloned(),
        metodo_pago,
        items,
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let detail = detail_from_args(sub)?;
    let total = detail.total();
    let id = store::insert_purchase(conn, user, RawDate::from(date), &detail)?;
    println!(
        "Recorded purchase at '{}' on {}: {} items, total {} (id {})",
        detail.supermercado,
        date,
        detail.items.len(),
        fmt_money(&total),
        id
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let id = *sub.get_one::<i64>("id").unwrap();
    let detail = detail_from_args(sub)?;
    store::replace_purchase(conn, user, id, &detail)?;
    println!(
        "Rewrote purchase {}: {} items, total {}",
        id,
        detail.items.len(),
        fmt_money(&detail.total())
    );
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let id = *sub.get_one::<i64>("id").unwrap();
    let (tx, detail) = store::fetch_purchase(conn, user, id)?;

    if maybe_print_json(json_flag, jsonl_flag, &serde_json::json!({
        "transaction": tx,
        "detalle": detail,
    }))? {
        return Ok(());
    }

    println!(
        "Purchase {} at '{}'{}",
        id,
        detail.supermercado,
        detail
            .ubicacion
            .as_deref()
            .map(|u| format!(" ({})", u))
            .unwrap_or_default()
    );
    let rows: Vec<Vec<String>> = detail
        .items
        .iter()
        .map(|i| {
            vec![
                i.nombre.clone(),
                format!("{} {}", i.cantidad, match i.modo {
                    PricingMode::Unidad => "un",
                    PricingMode::Kilo => "kg",
                    PricingMode::Litro => "lt",
                }),
                fmt_money(&i.precio),
                fmt_money(&i.total),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Producto", "Cantidad", "Precio", "Total"], rows)
    );
    println!("Total: {}", fmt_money(&tx.amount));
    Ok(())
}
