// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence layer: the transaction source, the profile document, and the
//! purchase/price-history cascades. Every query is scoped by `user_id`
//! equality; date filtering never happens here (mixed raw date shapes make
//! store-side range filters meaningless), it is the analytics pipeline's job.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::dates::RawDate;
use crate::models::{
    FinanceProfile, FixedExpenses, PaymentMethod, PriceRecord, PricingMode, PurchaseDetail,
    PurchaseItem, Transaction, TxKind,
};
use crate::utils::parse_date;

fn parse_money(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in {}", s, what))
}

const TX_COLUMNS: &str = "id, user_id, kind, amount, category, date_raw, description, merchant, payment_method, installments";

struct TxRow {
    id: i64,
    user_id: String,
    kind: String,
    amount: String,
    category: Option<String>,
    date_raw: String,
    description: Option<String>,
    merchant: Option<String>,
    payment_method: Option<String>,
    installments: Option<u32>,
}

fn tx_from_row(row: &Row) -> rusqlite::Result<TxRow> {
    Ok(TxRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date_raw: row.get(5)?,
        description: row.get(6)?,
        merchant: row.get(7)?,
        payment_method: row.get(8)?,
        installments: row.get(9)?,
    })
}

fn finish_tx(raw: TxRow) -> Result<Transaction> {
    let kind = TxKind::parse(&raw.kind)
        .with_context(|| format!("Unknown transaction kind '{}' (id {})", raw.kind, raw.id))?;
    Ok(Transaction {
        id: raw.id,
        user_id: raw.user_id,
        kind,
        amount: parse_money(&raw.amount, "transactions")?,
        category: raw.category,
        date: RawDate::parse(&raw.date_raw),
        description: raw.description,
        merchant: raw.merchant,
        payment_method: raw.payment_method.as_deref().and_then(PaymentMethod::parse),
        installments: raw.installments,
    })
}

/// The Transaction Source: one fetch of every transaction belonging to a
/// user, in no guaranteed order and with no date filtering.
pub fn fetch_transactions(conn: &Connection, user: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE user_id=?1",
        TX_COLUMNS
    ))?;
    let rows = stmt.query_map(params![user], tx_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(finish_tx(row?)?);
    }
    Ok(out)
}

pub fn fetch_transaction(conn: &Connection, user: &str, id: i64) -> Result<Transaction> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM transactions WHERE user_id=?1 AND id=?2",
        TX_COLUMNS
    ))?;
    let parts = stmt
        .query_row(params![user, id], tx_from_row)
        .with_context(|| format!("Transaction {} not found", id))?;
    finish_tx(parts)
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, kind, amount, category, date_raw, description, merchant, payment_method, installments)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            tx.user_id,
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.category,
            tx.date.to_column(),
            tx.description,
            tx.merchant,
            tx.payment_method.map(|p| p.as_str()),
            tx.installments,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Edit the descriptive payment metadata only; amounts, dates, and
/// categories change through full re-entry, not here.
pub fn update_transaction_meta(
    conn: &Connection,
    user: &str,
    id: i64,
    merchant: Option<String>,
    payment_method: Option<PaymentMethod>,
    installments: Option<u32>,
) -> Result<()> {
    let current = fetch_transaction(conn, user, id)?;
    let merchant = merchant.or(current.merchant);
    let payment_method = payment_method.or(current.payment_method);
    let installments = installments.or(current.installments);
    conn.execute(
        "UPDATE transactions SET merchant=?1, payment_method=?2, installments=?3 WHERE user_id=?4 AND id=?5",
        params![
            merchant,
            payment_method.map(|p| p.as_str()),
            installments,
            user,
            id
        ],
    )?;
    Ok(())
}

/// Delete a transaction and its price-history rows. The deletes run
/// sequentially with no rollback: a failure part-way leaves the earlier
/// steps applied, which `doctor` can later surface.
pub fn delete_transaction_cascade(conn: &Connection, user: &str, id: i64) -> Result<()> {
    delete_history_for_transaction(conn, user, id)?;
    let n = conn.execute(
        "DELETE FROM transactions WHERE user_id=?1 AND id=?2",
        params![user, id],
    )?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    Ok(())
}

pub fn delete_history_for_transaction(conn: &Connection, user: &str, id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM price_history WHERE user_id=?1 AND transaction_id=?2",
        params![user, id],
    )?;
    Ok(())
}

fn insert_items_and_history(
    conn: &Connection,
    user: &str,
    tx_id: i64,
    date: &RawDate,
    detail: &PurchaseDetail,
) -> Result<()> {
    for item in &detail.items {
        conn.execute(
            "INSERT INTO purchase_items(transaction_id, nombre, modo, cantidad, precio, total)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                tx_id,
                item.nombre,
                item.modo.as_str(),
                item.cantidad.to_string(),
                item.precio.to_string(),
                item.total.to_string(),
            ],
        )?;
        conn.execute(
            "INSERT INTO price_history(user_id, transaction_id, producto, modo, precio, date_raw)
             VALUES (?1,?2,?3,?4,?5,?6)",
            params![
                user,
                tx_id,
                item.nombre,
                item.modo.as_str(),
                item.precio.to_string(),
                date.to_column(),
            ],
        )?;
    }
    Ok(())
}

/// Create a purchase: the parent transaction (amount = sum of line totals),
/// its detail row, its items, and one price-history snapshot per item.
pub fn insert_purchase(
    conn: &Connection,
    user: &str,
    date: RawDate,
    detail: &PurchaseDetail,
) -> Result<i64> {
    let tx = Transaction {
        id: 0,
        user_id: user.to_string(),
        kind: TxKind::Compra,
        amount: detail.total(),
        category: Some("Supermercado".to_string()),
        date,
        description: Some(detail.supermercado.clone()),
        merchant: Some(detail.supermercado.clone()),
        payment_method: detail.metodo_pago,
        installments: None,
    };
    let tx_id = insert_transaction(conn, &tx)?;
    conn.execute(
        "INSERT INTO purchase_details(transaction_id, supermercado, ubicacion, metodo_pago)
         VALUES (?1,?2,?3,?4)",
        params![
            tx_id,
            detail.supermercado,
            detail.ubicacion,
            detail.metodo_pago.map(|p| p.as_str())
        ],
    )?;
    insert_items_and_history(conn, user, tx_id, &tx.date, detail)?;
    Ok(tx_id)
}

/// Re-edit a purchase wholesale: history rows and items are deleted and
/// recreated, never updated in place.
pub fn replace_purchase(
    conn: &Connection,
    user: &str,
    id: i64,
    detail: &PurchaseDetail,
) -> Result<()> {
    let tx = fetch_transaction(conn, user, id)?;
    if tx.kind != TxKind::Compra {
        bail!("Transaction {} is not a purchase", id);
    }
    delete_history_for_transaction(conn, user, id)?;
    conn.execute(
        "DELETE FROM purchase_items WHERE transaction_id=?1",
        params![id],
    )?;
    conn.execute(
        "INSERT INTO purchase_details(transaction_id, supermercado, ubicacion, metodo_pago)
         VALUES (?1,?2,?3,?4)
         ON CONFLICT(transaction_id) DO UPDATE SET
           supermercado=excluded.supermercado,
           ubicacion=excluded.ubicacion,
           metodo_pago=excluded.metodo_pago",
        params![
            id,
            detail.supermercado,
            detail.ubicacion,
            detail.metodo_pago.map(|p| p.as_str())
        ],
    )?;
    insert_items_and_history(conn, user, id, &tx.date, detail)?;
    conn.execute(
        "UPDATE transactions SET amount=?1, merchant=?2, description=?2 WHERE user_id=?3 AND id=?4",
        params![detail.total().to_string(), detail.supermercado, user, id],
    )?;
    Ok(())
}

pub fn fetch_purchase(conn: &Connection, user: &str, id: i64) -> Result<(Transaction, PurchaseDetail)> {
    let tx = fetch_transaction(conn, user, id)?;
    if tx.kind != TxKind::Compra {
        bail!("Transaction {} is not a purchase", id);
    }
    let (supermercado, ubicacion, metodo_pago) = conn
        .query_row(
            "SELECT supermercado, ubicacion, metodo_pago FROM purchase_details WHERE transaction_id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<String>>(1)?,
                    r.get::<_, Option<String>>(2)?,
                ))
            },
        )
        .with_context(|| format!("Purchase detail for transaction {} not found", id))?;

    let mut stmt = conn.prepare(
        "SELECT nombre, modo, cantidad, precio, total FROM purchase_items WHERE transaction_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut items = Vec::new();
    for row in rows {
        let (nombre, modo_s, cantidad_s, precio_s, total_s) = row?;
        let modo = PricingMode::parse(&modo_s)
            .with_context(|| format!("Unknown pricing mode '{}' for item '{}'", modo_s, nombre))?;
        items.push(PurchaseItem {
            nombre,
            modo,
            cantidad: parse_money(&cantidad_s, "purchase_items")?,
            precio: parse_money(&precio_s, "purchase_items")?,
            total: parse_money(&total_s, "purchase_items")?,
        });
    }
    Ok((
        tx,
        PurchaseDetail {
            supermercado,
            ubicacion,
            metodo_pago: metodo_pago.and_then(|s| PaymentMethod::parse(&s)),
            items,
        },
    ))
}

pub fn fetch_price_history(conn: &Connection, user: &str) -> Result<Vec<PriceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT transaction_id, producto, modo, precio, date_raw FROM price_history WHERE user_id=?1",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (transaction_id, producto, modo_s, precio_s, date_raw) = row?;
        let modo = PricingMode::parse(&modo_s)
            .with_context(|| format!("Unknown pricing mode '{}' in price_history", modo_s))?;
        out.push(PriceRecord {
            transaction_id,
            producto,
            modo,
            precio: parse_money(&precio_s, "price_history")?,
            date: RawDate::parse(&date_raw),
        });
    }
    Ok(out)
}

/// Load the profile document, `None` when the user never configured one
/// (the blender then contributes zero fixed amounts). Derived totals are
/// recomputed by the model, never read from storage.
pub fn load_profile(conn: &Connection, user: &str) -> Result<Option<FinanceProfile>> {
    let row = conn
        .query_row(
            "SELECT monthly_income, housing, phone, internet, credit_cards, loans, insurance,
                    income_start, expenses_start
             FROM profiles WHERE user_id=?1",
            params![user],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, Option<String>>(7)?,
                    r.get::<_, Option<String>>(8)?,
                ))
            },
        )
        .optional()?;
    let Some((mi, housing, phone, internet, credit_cards, loans, insurance, inc_s, exp_s)) = row
    else {
        return Ok(None);
    };
    Ok(Some(FinanceProfile {
        monthly_income: parse_money(&mi, "profiles")?,
        fixed_expenses: FixedExpenses {
            housing: parse_money(&housing, "profiles")?,
            phone: parse_money(&phone, "profiles")?,
            internet: parse_money(&internet, "profiles")?,
            credit_cards: parse_money(&credit_cards, "profiles")?,
            loans: parse_money(&loans, "profiles")?,
            insurance: parse_money(&insurance, "profiles")?,
        },
        income_start: inc_s.as_deref().map(parse_date).transpose()?,
        expenses_start: exp_s.as_deref().map(parse_date).transpose()?,
    }))
}

/// Wholesale profile write, matching the original app's no-partial-patch
/// semantics.
pub fn save_profile(conn: &Connection, user: &str, profile: &FinanceProfile) -> Result<()> {
    conn.execute(
        "INSERT INTO profiles(user_id, monthly_income, housing, phone, internet, credit_cards, loans, insurance, income_start, expenses_start, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,datetime('now'))
         ON CONFLICT(user_id) DO UPDATE SET
           monthly_income=excluded.monthly_income,
           housing=excluded.housing,
           phone=excluded.phone,
           internet=excluded.internet,
           credit_cards=excluded.credit_cards,
           loans=excluded.loans,
           insurance=excluded.insurance,
           income_start=excluded.income_start,
           expenses_start=excluded.expenses_start,
           updated_at=excluded.updated_at",
        params![
            user,
            profile.monthly_income.to_string(),
            profile.fixed_expenses.housing.to_string(),
            profile.fixed_expenses.phone.to_string(),
            profile.fixed_expenses.internet.to_string(),
            profile.fixed_expenses.credit_cards.to_string(),
            profile.fixed_expenses.loans.to_string(),
            profile.fixed_expenses.insurance.to_string(),
            profile.income_start.map(|d| d.format("%Y-%m-%d").to_string()),
            profile.expenses_start.map(|d| d.format("%Y-%m-%d").to_string()),
        ],
    )?;
    Ok(())
}

/// Idempotency check for the legacy migration: has this
/// `(legacy_id, legacy_collection)` pair already been copied?
pub fn legacy_exists(conn: &Connection, legacy_id: &str, collection: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM transactions WHERE legacy_id=?1 AND legacy_collection=?2",
            params![legacy_id, collection],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_legacy_transaction(
    conn: &Connection,
    tx: &Transaction,
    legacy_id: &str,
    collection: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, kind, amount, category, date_raw, description, merchant, payment_method, installments, legacy_id, legacy_collection)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            tx.user_id,
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.category,
            tx.date.to_column(),
            tx.description,
            tx.merchant,
            tx.payment_method.map(|p| p.as_str()),
            tx.installments,
            legacy_id,
            collection,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
