// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The aggregation pipeline behind every report: filter the full transaction
//! list to a period window, reduce it to totals and breakdowns, then blend
//! in the recurring amounts from the finance profile.
//!
//! Everything here is pure: callers pass the fetched transactions, the
//! optional profile, and `today` explicitly, so the same inputs always
//! produce the same summary.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::dates;
use crate::models::{FinanceProfile, Transaction, TxKind};
use crate::periods::{self, DateWindow, Period};
use crate::utils::month_name;

/// Sentinel for expense records without a category label.
pub const SIN_CATEGORIA: &str = "Sin categoría";

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySlot {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

/// Pure transactional totals for a period, before profile blending.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregate {
    pub transaction_income: Decimal,
    pub transaction_expenses: Decimal,
    pub expenses_by_category: HashMap<String, Decimal>,
    pub monthly: Vec<MonthlySlot>,
    pub transaction_count: usize,
}

/// Final report numbers after fixed-profile blending.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub fixed_income_for_period: Decimal,
    pub fixed_expenses_for_period: Decimal,
    pub expenses_by_category: HashMap<String, Decimal>,
    pub monthly: Vec<MonthlySlot>,
    pub transaction_count: usize,
}

/// Whether a transaction belongs to the selected period.
///
/// Year-anchored periods compare calendar year (and month, for custom)
/// instead of the day-level window; the resolver's window already spans the
/// whole year, so this is equivalent for them and matches the shipped
/// behavior. Records whose date cannot be normalized are dropped, fail-open.
fn selected(
    tx: &Transaction,
    period: Period,
    year: i32,
    month: Option<u32>,
    window: &DateWindow,
) -> bool {
    let Some(d) = dates::normalize_to_date(&tx.date) else {
        warn!(id = tx.id, date = ?tx.date, "descartando movimiento con fecha inválida");
        return false;
    };
    match period {
        Period::ThisYear => d.year() == year,
        Period::Custom => d.year() == year && d.month() == month.unwrap_or(1),
        _ => d >= window.start && d <= window.end,
    }
}

/// Narrow the full list to the period and partition it into the income
/// bucket and the expense-or-purchase bucket. `debt` records join neither.
pub fn split_by_period<'a>(
    txs: &'a [Transaction],
    period: Period,
    year: i32,
    month: Option<u32>,
    window: &DateWindow,
) -> (Vec<&'a Transaction>, Vec<&'a Transaction>) {
    let mut income = Vec::new();
    let mut expenses = Vec::new();
    for tx in txs {
        if !selected(tx, period, year, month, window) {
            continue;
        }
        match tx.kind {
            TxKind::Income => income.push(tx),
            k if k.is_expense_like() => expenses.push(tx),
            _ => {}
        }
    }
    (income, expenses)
}

fn category_label(tx: &Transaction) -> String {
    match &tx.category {
        Some(c) if !c.trim().is_empty() => c.clone(),
        _ => SIN_CATEGORIA.to_string(),
    }
}

/// The months a period implies: all twelve for year-anchored periods, the
/// contiguous span of the resolved window otherwise.
fn months_in_scope(period: Period, year: i32, window: &DateWindow) -> Vec<(i32, u32)> {
    if period.is_year_anchored() {
        return (1..=12).map(|m| (year, m)).collect();
    }
    let mut out = Vec::new();
    let mut idx = window.start.year() * 12 + window.start.month0() as i32;
    let end_idx = window.end.year() * 12 + window.end.month0() as i32;
    while idx <= end_idx {
        out.push((idx.div_euclid(12), (idx.rem_euclid(12) + 1) as u32));
        idx += 1;
    }
    out
}

fn monthly_breakdown(
    txs: &[Transaction],
    period: Period,
    year: i32,
    window: &DateWindow,
) -> Vec<MonthlySlot> {
    months_in_scope(period, year, window)
        .into_iter()
        .map(|(y, m)| {
            let mut income = Decimal::ZERO;
            let mut expenses = Decimal::ZERO;
            // Each slot re-filters the unfiltered list by (month, year)
            // equality on the normalized date.
            for tx in txs {
                let Some(d) = dates::normalize_to_date(&tx.date) else {
                    continue;
                };
                if d.year() != y || d.month() != m {
                    continue;
                }
                match tx.kind {
                    TxKind::Income => income += tx.amount,
                    k if k.is_expense_like() => expenses += tx.amount,
                    _ => {}
                }
            }
            MonthlySlot {
                month: month_name(m).to_string(),
                income,
                expenses,
                balance: income - expenses,
            }
        })
        .collect()
}

/// Reduce the period's buckets into totals, a per-category expense map, and
/// the per-month breakdown. Empty buckets yield zeros, never NaN-style junk.
pub fn aggregate(
    txs: &[Transaction],
    period: Period,
    year: i32,
    month: Option<u32>,
    window: &DateWindow,
) -> Aggregate {
    let (income, expenses) = split_by_period(txs, period, year, month, window);

    let transaction_income: Decimal = income.iter().map(|t| t.amount).sum();
    let transaction_expenses: Decimal = expenses.iter().map(|t| t.amount).sum();

    let mut expenses_by_category: HashMap<String, Decimal> = HashMap::new();
    for tx in &expenses {
        *expenses_by_category
            .entry(category_label(tx))
            .or_insert(Decimal::ZERO) += tx.amount;
    }

    Aggregate {
        transaction_income,
        transaction_expenses,
        expenses_by_category,
        monthly: monthly_breakdown(txs, period, year, window),
        transaction_count: income.len() + expenses.len(),
    }
}

fn month_index(d: NaiveDate) -> i64 {
    d.year() as i64 * 12 + d.month0() as i64
}

/// Whole calendar months the recurring amounts cover inside the window:
/// from the later of window start and the profile's start date through the
/// window end, inclusive, never counting months beyond the current one.
pub fn months_in_period(window: &DateWindow, start_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let mut anchor = window.start;
    if let Some(s) = start_date {
        if s > anchor {
            anchor = s;
        }
    }
    let mut end = window.end;
    if end > today {
        end = today;
    }
    // Month granularity: a start date later in the same calendar month as
    // the end still counts that month; an anchor month past the end month
    // clamps to zero.
    (month_index(end) - month_index(anchor) + 1).max(0) as u32
}

/// Merge the recurring profile amounts into the aggregate. With no profile
/// the summary degrades to the pure transactional totals.
pub fn blend(
    agg: Aggregate,
    profile: Option<&FinanceProfile>,
    window: &DateWindow,
    today: NaiveDate,
) -> Summary {
    let Some(p) = profile else {
        return Summary {
            total_income: agg.transaction_income,
            total_expenses: agg.transaction_expenses,
            balance: agg.transaction_income - agg.transaction_expenses,
            fixed_income_for_period: Decimal::ZERO,
            fixed_expenses_for_period: Decimal::ZERO,
            expenses_by_category: agg.expenses_by_category,
            monthly: agg.monthly,
            transaction_count: agg.transaction_count,
        };
    };

    let income_months = months_in_period(window, p.income_start, today);
    let expense_months = months_in_period(window, p.expenses_start, today);
    let fixed_income_for_period = p.monthly_income * Decimal::from(income_months);
    let monthly_fixed = p.total_fixed_expenses();
    let fixed_expenses_for_period = monthly_fixed * Decimal::from(expense_months);

    let mut expenses_by_category = agg.expenses_by_category;
    if fixed_expenses_for_period > Decimal::ZERO {
        // Additive injection: the "(Fijo)" labels keep these rows distinct
        // from transactional categories by construction.
        for (label, amount) in p.fixed_expenses.labeled() {
            *expenses_by_category
                .entry(label.to_string())
                .or_insert(Decimal::ZERO) += amount * Decimal::from(expense_months);
        }
    }

    // Per-month slots get the full monthly amounts, not pro-rated by the
    // profile's start dates. Known discrepancy with the period-level totals;
    // kept as shipped pending product clarification.
    let monthly = agg
        .monthly
        .into_iter()
        .map(|s| {
            let income = s.income + p.monthly_income;
            let expenses = s.expenses + monthly_fixed;
            MonthlySlot {
                month: s.month,
                income,
                expenses,
                balance: income - expenses,
            }
        })
        .collect();

    let total_income = agg.transaction_income + fixed_income_for_period;
    let total_expenses = agg.transaction_expenses + fixed_expenses_for_period;
    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        fixed_income_for_period,
        fixed_expenses_for_period,
        expenses_by_category,
        monthly,
        transaction_count: agg.transaction_count,
    }
}

/// The whole pipeline: resolve the window, aggregate, blend.
pub fn run(
    txs: &[Transaction],
    profile: Option<&FinanceProfile>,
    period: Period,
    year: i32,
    month: Option<u32>,
    today: NaiveDate,
) -> Summary {
    let window = periods::resolve(period, year, month, today);
    let agg = aggregate(txs, period, year, month, &window);
    blend(agg, profile, &window, today)
}
