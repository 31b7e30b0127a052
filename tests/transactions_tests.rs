// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::ArgMatches;
use rusqlite::Connection;
use rust_decimal::Decimal;

use plata::commands::transactions;
use plata::dates::RawDate;
use plata::models::{Transaction, TxKind};
use plata::{cli, db, store};

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn seed(conn: &Connection, kind: TxKind, amount: i64, date: &str, category: Option<&str>) {
    let tx = Transaction {
        id: 0,
        user_id: "default".into(),
        kind,
        amount: Decimal::from(amount),
        category: category.map(Into::into),
        date: RawDate::Text(date.into()),
        description: None,
        merchant: None,
        payment_method: None,
        installments: None,
    };
    store::insert_transaction(conn, &tx).unwrap();
}

fn list_matches(args: &[&str]) -> ArgMatches {
    let mut argv = vec!["plata", "tx", "list"];
    argv.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(argv);
    let (_, tx_m) = m.subcommand().unwrap();
    let (_, sub) = tx_m.subcommand().unwrap();
    sub.clone()
}

#[test]
fn list_is_sorted_newest_first() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 100, "2024-01-05", None);
    seed(&conn, TxKind::Expense, 200, "2024-03-05", None);
    seed(&conn, TxKind::Expense, 300, "2024-02-05", None);

    let rows = transactions::query_rows(&conn, &list_matches(&[])).unwrap();
    let dates: Vec<&str> = rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, ["2024-03-05", "2024-02-05", "2024-01-05"]);
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for day in 1..=5 {
        seed(&conn, TxKind::Expense, 100, &format!("2024-01-0{}", day), None);
    }
    let rows = transactions::query_rows(&conn, &list_matches(&["--limit", "2"])).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2024-01-05");
}

#[test]
fn month_filter_spans_raw_date_shapes() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 100, "2024-01-05", None);
    // 2024-01-15T00:00:00Z as a legacy timestamp blob.
    seed(
        &conn,
        TxKind::Expense,
        200,
        &RawDate::Timestamp { seconds: 1705276800, nanoseconds: 0 }.to_column(),
        None,
    );
    seed(&conn, TxKind::Expense, 300, "2024-02-05", None);
    seed(&conn, TxKind::Expense, 400, "no-es-fecha", None);

    let rows = transactions::query_rows(&conn, &list_matches(&["--month", "2024-01"])).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.date.starts_with("2024-01")));
}

#[test]
fn kind_and_category_filters_compose() {
    let conn = setup();
    seed(&conn, TxKind::Income, 1000, "2024-01-05", Some("Sueldo"));
    seed(&conn, TxKind::Expense, 100, "2024-01-06", Some("Comida"));
    seed(&conn, TxKind::Expense, 200, "2024-01-07", Some("Transporte"));

    let rows = transactions::query_rows(
        &conn,
        &list_matches(&["--kind", "expense", "--category", "Comida"]),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, "100");
}

#[test]
fn unparseable_dates_still_list_with_raw_text() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 100, "cuando sea", None);
    let rows = transactions::query_rows(&conn, &list_matches(&[])).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, "cuando sea");
}

#[test]
fn add_records_through_the_cli() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from([
        "plata", "tx", "add", "--kind", "income", "--amount", "1500.50", "--date", "2024-01-05",
        "--category", "Sueldo",
    ]);
    let (_, tx_m) = m.subcommand().unwrap();
    transactions::handle(&conn, tx_m).unwrap();

    let txs = store::fetch_transactions(&conn, "default").unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TxKind::Income);
    assert_eq!(txs[0].amount, "1500.50".parse::<Decimal>().unwrap());
}

#[test]
fn add_rejects_compra_kind() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from([
        "plata", "tx", "add", "--kind", "compra", "--amount", "100", "--date", "2024-01-05",
    ]);
    let (_, tx_m) = m.subcommand().unwrap();
    assert!(transactions::handle(&conn, tx_m).is_err());
}

#[test]
fn add_rejects_negative_amounts() {
    let conn = setup();
    let m = cli::build_cli().get_matches_from([
        "plata", "tx", "add", "--amount=-50", "--date", "2024-01-05",
    ]);
    let (_, tx_m) = m.subcommand().unwrap();
    assert!(transactions::handle(&conn, tx_m).is_err());
    assert!(store::fetch_transactions(&conn, "default").unwrap().is_empty());
}

#[test]
fn delete_through_the_cli_removes_the_row() {
    let conn = setup();
    seed(&conn, TxKind::Expense, 100, "2024-01-05", None);
    let id = store::fetch_transactions(&conn, "default").unwrap()[0].id;

    let m = cli::build_cli().get_matches_from([
        "plata", "tx", "delete", "--id", &id.to_string(),
    ]);
    let (_, tx_m) = m.subcommand().unwrap();
    transactions::handle(&conn, tx_m).unwrap();
    assert!(store::fetch_transactions(&conn, "default").unwrap().is_empty());
}
