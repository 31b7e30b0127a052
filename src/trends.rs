// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::dates;
use crate::models::PriceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Subida,
    Bajada,
    Igual,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Subida => "subida",
            Trend::Bajada => "bajada",
            Trend::Igual => "igual",
        }
    }
}

/// Price movement of one product between its two most recent purchases.
#[derive(Debug, Clone, Serialize)]
pub struct PriceTrend {
    pub producto: String,
    pub trend: Trend,
    /// Absolute delta between the two most recent effective unit prices.
    pub cambio: Decimal,
    pub precio_actual: Decimal,
    pub precio_anterior: Decimal,
}

/// Grouping key for product names: lowercased, diacritics stripped,
/// whitespace collapsed, so "Leche  Entera" and "leche entera" match.
pub fn product_key(nombre: &str) -> String {
    let folded: String = nombre
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify the price trend of every product with at least two history
/// records. Only the most recent pair is compared; there is no smoothing or
/// longer-window regression.
pub fn price_trends(records: &[PriceRecord]) -> Vec<PriceTrend> {
    let mut by_product: HashMap<String, Vec<(&PriceRecord, NaiveDateTime)>> = HashMap::new();
    for rec in records {
        let Some(dt) = dates::normalize(&rec.date) else {
            warn!(
                transaction_id = rec.transaction_id,
                producto = %rec.producto,
                "descartando registro de precio con fecha inválida"
            );
            continue;
        };
        by_product
            .entry(product_key(&rec.producto))
            .or_default()
            .push((rec, dt));
    }

    let mut out = Vec::new();
    for (_, mut recs) in by_product {
        if recs.len() < 2 {
            continue;
        }
        recs.sort_by(|a, b| b.1.cmp(&a.1));
        let (latest, _) = recs[0];
        let (previous, _) = recs[1];
        let trend = if latest.precio > previous.precio {
            Trend::Subida
        } else if latest.precio < previous.precio {
            Trend::Bajada
        } else {
            Trend::Igual
        };
        out.push(PriceTrend {
            producto: latest.producto.clone(),
            trend,
            cambio: (latest.precio - previous.precio).abs(),
            precio_actual: latest.precio,
            precio_anterior: previous.precio,
        });
    }
    out.sort_by(|a, b| a.producto.cmp(&b.producto));
    out
}
