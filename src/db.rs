// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("app.plata", "Plata", "plata"));

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var("PLATA_DB") {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("plata.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','compra','debt')),
        amount TEXT NOT NULL,
        category TEXT,
        -- Raw date exactly as the source wrote it: YYYY-MM-DD, ISO datetime,
        -- epoch millis, or a JSON timestamp blob. Interpreted only through
        -- dates::normalize.
        date_raw TEXT NOT NULL,
        description TEXT,
        merchant TEXT,
        payment_method TEXT CHECK(payment_method IN ('efectivo','debito','credito','transferencia')),
        installments INTEGER,
        legacy_id TEXT,
        legacy_collection TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(legacy_id, legacy_collection)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);

    CREATE TABLE IF NOT EXISTS purchase_details(
        transaction_id INTEGER PRIMARY KEY,
        supermercado TEXT NOT NULL,
        ubicacion TEXT,
        metodo_pago TEXT,
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS purchase_items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        transaction_id INTEGER NOT NULL,
        nombre TEXT NOT NULL,
        modo TEXT NOT NULL CHECK(modo IN ('unidad','kilo','litro')),
        cantidad TEXT NOT NULL,
        precio TEXT NOT NULL,
        total TEXT NOT NULL,
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );

    -- Deliberately no foreign key: history rows are deleted by explicit
    -- sequential cascade and may briefly outlive their parent purchase.
    CREATE TABLE IF NOT EXISTS price_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        transaction_id INTEGER NOT NULL,
        producto TEXT NOT NULL,
        modo TEXT NOT NULL CHECK(modo IN ('unidad','kilo','litro')),
        precio TEXT NOT NULL,
        date_raw TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_price_history_user ON price_history(user_id);
    CREATE INDEX IF NOT EXISTS idx_price_history_tx ON price_history(transaction_id);

    CREATE TABLE IF NOT EXISTS profiles(
        user_id TEXT PRIMARY KEY,
        monthly_income TEXT NOT NULL DEFAULT '0',
        housing TEXT NOT NULL DEFAULT '0',
        phone TEXT NOT NULL DEFAULT '0',
        internet TEXT NOT NULL DEFAULT '0',
        credit_cards TEXT NOT NULL DEFAULT '0',
        loans TEXT NOT NULL DEFAULT '0',
        insurance TEXT NOT NULL DEFAULT '0',
        income_start TEXT,
        expenses_start TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}
