// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::RawDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
    Compra,
    Debt,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
            TxKind::Compra => "compra",
            TxKind::Debt => "debt",
        }
    }

    pub fn parse(s: &str) -> Option<TxKind> {
        match s {
            "income" => Some(TxKind::Income),
            "expense" => Some(TxKind::Expense),
            "compra" => Some(TxKind::Compra),
            "debt" => Some(TxKind::Debt),
            _ => None,
        }
    }

    /// Purchases are a specialized rendering of an expense; money-wise the
    /// two are equivalent everywhere in the aggregation pipeline.
    pub fn is_expense_like(&self) -> bool {
        matches!(self, TxKind::Expense | TxKind::Compra)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Efectivo,
    Debito,
    Credito,
    Transferencia,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "efectivo",
            PaymentMethod::Debito => "debito",
            PaymentMethod::Credito => "credito",
            PaymentMethod::Transferencia => "transferencia",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        match s {
            "efectivo" => Some(PaymentMethod::Efectivo),
            "debito" => Some(PaymentMethod::Debito),
            "credito" => Some(PaymentMethod::Credito),
            "transferencia" => Some(PaymentMethod::Transferencia),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub kind: TxKind,
    /// Always >= 0; the sign of a movement is carried by `kind`.
    pub amount: Decimal,
    pub category: Option<String>,
    pub date: RawDate,
    pub description: Option<String>,
    pub merchant: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub installments: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingMode {
    /// Unit price times quantity.
    Unidad,
    /// Price per kilogram times weight.
    Kilo,
    /// Price per liter times volume.
    Litro,
}

impl PricingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingMode::Unidad => "unidad",
            PricingMode::Kilo => "kilo",
            PricingMode::Litro => "litro",
        }
    }

    pub fn parse(s: &str) -> Option<PricingMode> {
        match s {
            "unidad" => Some(PricingMode::Unidad),
            "kilo" => Some(PricingMode::Kilo),
            "litro" => Some(PricingMode::Litro),
            _ => None,
        }
    }
}

/// One line item of a purchase. Exactly one pricing mode is active; `total`
/// is the authoritative line total, rounded to the nearest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub nombre: String,
    pub modo: PricingMode,
    pub cantidad: Decimal,
    pub precio: Decimal,
    pub total: Decimal,
}

impl PurchaseItem {
    pub fn new(nombre: String, modo: PricingMode, cantidad: Decimal, precio: Decimal) -> Self {
        let total = (cantidad * precio).round();
        PurchaseItem {
            nombre,
            modo,
            cantidad,
            precio,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub supermercado: String,
    pub ubicacion: Option<String>,
    pub metodo_pago: Option<PaymentMethod>,
    pub items: Vec<PurchaseItem>,
}

impl PurchaseDetail {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|i| i.total).sum()
    }
}

/// The six recurring monthly expense sub-amounts of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedExpenses {
    pub housing: Decimal,
    pub phone: Decimal,
    pub internet: Decimal,
    pub credit_cards: Decimal,
    pub loans: Decimal,
    pub insurance: Decimal,
}

impl FixedExpenses {
    /// Sub-amounts with their display labels. Synthetic category names carry
    /// the "(Fijo)" suffix so they can never collide with a transactional
    /// category of the same name.
    pub fn labeled(&self) -> [(&'static str, Decimal); 6] {
        [
            ("Vivienda (Fijo)", self.housing),
            ("Teléfono (Fijo)", self.phone),
            ("Internet (Fijo)", self.internet),
            ("Tarjetas (Fijo)", self.credit_cards),
            ("Préstamos (Fijo)", self.loans),
            ("Seguros (Fijo)", self.insurance),
        ]
    }

    pub fn total(&self) -> Decimal {
        self.housing + self.phone + self.internet + self.credit_cards + self.loans + self.insurance
    }
}

/// Recurring monthly income and fixed expenses, one per user. The derived
/// totals are recomputed on every read and write, never stored and trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceProfile {
    pub monthly_income: Decimal,
    pub fixed_expenses: FixedExpenses,
    /// When the recurring income became effective; fixed income is never
    /// back-dated into months before this.
    pub income_start: Option<NaiveDate>,
    pub expenses_start: Option<NaiveDate>,
}

impl FinanceProfile {
    pub fn total_fixed_expenses(&self) -> Decimal {
        self.fixed_expenses.total()
    }

    pub fn available_income(&self) -> Decimal {
        self.monthly_income - self.total_fixed_expenses()
    }
}

/// Denormalized per-product price snapshot written alongside a purchase,
/// deleted and rewritten whenever its parent purchase changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub transaction_id: i64,
    pub producto: String,
    pub modo: PricingMode,
    /// Effective unit price: per-kilo or per-liter when that mode is
    /// active, plain unit price otherwise.
    pub precio: Decimal,
    pub date: RawDate,
}
