// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::periods::Period;

/// Field-level validation failure. Validation runs before aggregation is
/// triggered; the pipeline itself assumes pre-validated input.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub fn validate_amount(amount: Decimal) -> Vec<ValidationError> {
    if amount < Decimal::ZERO {
        vec![ValidationError::new(
            "amount",
            "el monto no puede ser negativo",
        )]
    } else {
        Vec::new()
    }
}

/// Check report inputs: known period key, sane year, month in range and
/// present when the period requires one.
pub fn validate_report_args(
    period_key: &str,
    year: i32,
    month: Option<u32>,
) -> Vec<ValidationError> {
    let mut errs = Vec::new();
    let period = Period::parse(period_key);
    if period.is_none() {
        // Unknown keys are tolerated downstream (full-year fallback), but
        // the caller is told about the typo.
        errs.push(ValidationError::new(
            "period",
            format!("período desconocido '{}', se usará el año completo", period_key),
        ));
    }
    if !(1900..=2200).contains(&year) {
        errs.push(ValidationError::new("year", "año fuera de rango"));
    }
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            errs.push(ValidationError::new("month", "mes fuera de rango (1-12)"));
        }
    } else if period == Some(Period::Custom) {
        errs.push(ValidationError::new(
            "month",
            "el período custom requiere --month",
        ));
    }
    errs
}

/// True when the only problems are tolerable downstream (unknown period).
pub fn only_fallback_warnings(errs: &[ValidationError]) -> bool {
    errs.iter().all(|e| e.field == "period")
}
