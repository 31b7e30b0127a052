// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;

use plata::commands::purchases::{self, parse_item};
use plata::models::{PricingMode, TxKind};
use plata::{cli, db, store};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn item_spec_parses_units() {
    let item = parse_item("Leche:2un:1200").unwrap();
    assert_eq!(item.nombre, "Leche");
    assert_eq!(item.modo, PricingMode::Unidad);
    assert_eq!(item.cantidad, Decimal::from(2));
    assert_eq!(item.precio, Decimal::from(1200));
    assert_eq!(item.total, Decimal::from(2400));
}

#[test]
fn item_spec_parses_weight_and_volume() {
    let kg = parse_item("Manzana:1.5kg:990").unwrap();
    assert_eq!(kg.modo, PricingMode::Kilo);
    // 1.5 * 990 = 1485, already whole.
    assert_eq!(kg.total, Decimal::from(1485));

    let lt = parse_item("Aceite:0.75lt:3300").unwrap();
    assert_eq!(lt.modo, PricingMode::Litro);
    // 0.75 * 3300 = 2475.
    assert_eq!(lt.total, Decimal::from(2475));
}

#[test]
fn item_totals_round_to_whole_currency() {
    let item = parse_item("Queso:0.33kg:5990").unwrap();
    // 0.33 * 5990 = 1976.7, rounds to 1977.
    assert_eq!(item.total, Decimal::from(1977));
}

#[test]
fn item_names_may_contain_colons() {
    let item = parse_item("Yogur: sabor frutilla:2un:800").unwrap();
    assert_eq!(item.nombre, "Yogur: sabor frutilla");
}

#[test]
fn bad_item_specs_are_rejected() {
    assert!(parse_item("Leche").is_err());
    assert!(parse_item("Leche:2:1200").is_err());
    assert!(parse_item("Leche:dosun:1200").is_err());
    assert!(parse_item(":2un:1200").is_err());
}

#[test]
fn compra_add_creates_transaction_items_and_history() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from([
        "plata", "compra", "add", "--date", "2024-03-05", "--supermercado", "Jumbo",
        "--item", "Leche:2un:1200", "--item", "Manzana:1.5kg:990",
    ]);
    let (_, compra_m) = m.subcommand().unwrap();
    purchases::handle(&conn, compra_m).unwrap();

    let txs = store::fetch_transactions(&conn, "default").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TxKind::Compra);
    assert_eq!(txs[0].amount, Decimal::from(3885));
    assert_eq!(txs[0].category.as_deref(), Some("Supermercado"));

    let history = store::fetch_price_history(&conn, "default").unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn compra_edit_replaces_the_whole_detail() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from([
        "plata", "compra", "add", "--date", "2024-03-05", "--supermercado", "Jumbo",
        "--item", "Leche:2un:1200",
    ]);
    let (_, compra_m) = m.subcommand().unwrap();
    purchases::handle(&conn, compra_m).unwrap();
    let id = store::fetch_transactions(&conn, "default").unwrap()[0].id;

    let m = cli::build_cli().get_matches_from([
        "plata", "compra", "edit", "--id", &id.to_string(), "--supermercado", "Lider",
        "--item", "Pan:1kg:2190", "--item", "Arroz:2un:1500",
    ]);
    let (_, compra_m) = m.subcommand().unwrap();
    purchases::handle(&conn, compra_m).unwrap();

    let (tx, detail) = store::fetch_purchase(&conn, "default", id).unwrap();
    assert_eq!(detail.supermercado, "Lider");
    assert_eq!(detail.items.len(), 2);
    assert_eq!(tx.amount, Decimal::from(5190));
    let history = store::fetch_price_history(&conn, "default").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|r| r.producto != "Leche"));
}
