// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;

use plata::commands::exporter;
use plata::dates::RawDate;
use plata::models::{Transaction, TxKind};
use plata::{cli, db, store};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn seed(conn: &Connection, kind: TxKind, amount: i64, date: &str) {
    let tx = Transaction {
        id: 0,
        user_id: "default".into(),
        kind,
        amount: Decimal::from(amount),
        category: Some("Comida".into()),
        date: RawDate::Text(date.into()),
        description: None,
        merchant: None,
        payment_method: None,
        installments: None,
    };
    store::insert_transaction(conn, &tx).unwrap();
}

fn run_export(conn: &Connection, format: &str, out: &str) {
    let m = cli::build_cli().get_matches_from([
        "plata", "export", "transactions", "--format", format, "--out", out,
    ]);
    let (_, export_m) = m.subcommand().unwrap();
    exporter::handle(conn, export_m).unwrap();
}

#[test]
fn csv_export_is_sorted_oldest_first() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 200, "2024-03-05");
    seed(&conn, TxKind::Income, 1000, "2024-01-05");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txs.csv");
    run_export(&conn, "csv", out.to_str().unwrap());

    let body = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], "date,kind,amount,category,description,merchant");
    assert!(lines[1].starts_with("2024-01-05,income,1000"));
    assert!(lines[2].starts_with("2024-03-05,expense,200"));
}

#[test]
fn json_export_round_trips_raw_dates() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 200, "2024-03-05");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("txs.json");
    run_export(&conn, "json", out.to_str().unwrap());

    let body = std::fs::read_to_string(&out).unwrap();
    let items: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["date"], "2024-03-05");
    assert_eq!(items[0]["kind"], "expense");
}
