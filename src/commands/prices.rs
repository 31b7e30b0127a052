// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::dates;
use crate::store;
use crate::trends::{self, product_key};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trends", sub)) => show_trends(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show_trends(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let records = store::fetch_price_history(conn, user)?;
    let trends = trends::price_trends(&records);
    if maybe_print_json(json_flag, jsonl_flag, &trends)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = trends
        .iter()
        .map(|t| {
            vec![
                t.producto.clone(),
                t.trend.as_str().to_string(),
                fmt_money(&t.cambio),
                fmt_money(&t.precio_actual),
                fmt_money(&t.precio_anterior),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Producto", "Tendencia", "Cambio", "Actual", "Anterior"],
            rows
        )
    );
    Ok(())
}

#[derive(Serialize)]
struct HistoryRow {
    fecha: String,
    producto: String,
    modo: String,
    precio: String,
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = sub.get_one::<String>("user").unwrap();
    let producto = sub.get_one::<String>("producto").unwrap();
    let key = product_key(producto);

    let mut records: Vec<_> = store::fetch_price_history(conn, user)?
        .into_iter()
        .filter(|r| product_key(&r.producto) == key)
        .collect();
    records.sort_by_key(|r| std::cmp::Reverse(dates::normalize(&r.date)));

    let data: Vec<HistoryRow> = records
        .iter()
        .map(|r| HistoryRow {
            fecha: match dates::normalize(&r.date) {
                Some(dt) => dates::format_date_for_input(dt),
                None => r.date.to_column(),
            },
            producto: r.producto.clone(),
            modo: r.modo.as_str().to_string(),
            precio: r.precio.to_string(),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| vec![r.fecha, r.producto, r.modo, r.precio])
            .collect();
        println!(
            "{}",
            pretty_table(&["Fecha", "Producto", "Modo", "Precio"], rows)
        );
    }
    Ok(())
}
