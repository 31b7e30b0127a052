// Copyright (c) 2025 Plata Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use plata::dates::RawDate;
use plata::models::{PriceRecord, PricingMode};
use plata::trends::{self, Trend, product_key};

fn rec(id: i64, producto: &str, precio: i64, date: &str) -> PriceRecord {
    PriceRecord {
        transaction_id: id,
        producto: producto.into(),
        modo: PricingMode::Unidad,
        precio: Decimal::from(precio),
        date: RawDate::Text(date.into()),
    }
}

#[test]
fn rising_price_classified_subida_with_delta() {
    let records = vec![
        rec(1, "Leche", 1000, "2024-01-05"),
        rec(2, "Leche", 1200, "2024-02-05"),
    ];
    let trends = trends::price_trends(&records);
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].trend, Trend::Subida);
    assert_eq!(trends[0].cambio, Decimal::from(200));
    assert_eq!(trends[0].precio_actual, Decimal::from(1200));
    assert_eq!(trends[0].precio_anterior, Decimal::from(1000));
}

#[test]
fn falling_and_flat_prices() {
    let records = vec![
        rec(1, "Pan", 900, "2024-01-05"),
        rec(2, "Pan", 850, "2024-02-05"),
        rec(3, "Arroz", 700, "2024-01-05"),
        rec(4, "Arroz", 700, "2024-02-05"),
    ];
    let trends = trends::price_trends(&records);
    assert_eq!(trends.len(), 2);
    let pan = trends.iter().find(|t| t.producto == "Pan").unwrap();
    assert_eq!(pan.trend, Trend::Bajada);
    assert_eq!(pan.cambio, Decimal::from(50));
    let arroz = trends.iter().find(|t| t.producto == "Arroz").unwrap();
    assert_eq!(arroz.trend, Trend::Igual);
    assert_eq!(arroz.cambio, Decimal::ZERO);
}

#[test]
fn single_record_produces_no_trend() {
    let records = vec![rec(1, "Leche", 1000, "2024-01-05")];
    assert!(trends::price_trends(&records).is_empty());
}

#[test]
fn only_the_most_recent_pair_is_compared() {
    let records = vec![
        rec(1, "Leche", 500, "2023-11-01"),
        rec(2, "Leche", 1000, "2024-01-05"),
        rec(3, "Leche", 1200, "2024-02-05"),
    ];
    let trends = trends::price_trends(&records);
    assert_eq!(trends[0].cambio, Decimal::from(200));
}

#[test]
fn product_names_group_across_case_and_diacritics() {
    let records = vec![
        rec(1, "Café  Molido", 4000, "2024-01-05"),
        rec(2, "cafe molido", 4500, "2024-02-05"),
    ];
    let trends = trends::price_trends(&records);
    assert_eq!(trends.len(), 1);
    assert_eq!(trends[0].trend, Trend::Subida);
}

#[test]
fn unnormalizable_dates_are_skipped() {
    let records = vec![
        rec(1, "Leche", 1000, "2024-01-05"),
        rec(2, "Leche", 1200, "???"),
    ];
    // Only one usable record remains, so there is nothing to compare.
    assert!(trends::price_trends(&records).is_empty());
}

#[test]
fn key_normalization_rules() {
    assert_eq!(product_key("  Café  con LECHE "), "cafe con leche");
    assert_eq!(product_key("Ñoquis"), "noquis");
    assert_eq!(product_key("pan"), "pan");
}
