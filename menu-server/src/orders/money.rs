//! Money helpers for order items
//!
//! Staff type quantities and prices by hand; these helpers coerce bad input
//! instead of rejecting it. Amounts are `Decimal` throughout and rounded to
//! cents (half-up) when they enter an item.

use rust_decimal::prelude::*;
use shared::order::ItemExtra;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum accepted quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Upper bound for a unit price (base plus extras), in pesos
pub const MAX_PRICE: i64 = 1_000_000_000;

/// Round to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Quantity as typed: missing, non-finite or non-positive becomes 1, fractions are floored
pub fn sanitize_quantity(raw: Option<f64>) -> u32 {
    match raw {
        Some(q) if q.is_finite() && q >= 1.0 => (q.floor() as u32).min(MAX_QUANTITY),
        _ => 1,
    }
}

/// Price as typed: missing or negative becomes 0
pub fn sanitize_price(raw: Option<Decimal>) -> Decimal {
    match raw {
        Some(p) if p.is_sign_positive() => round_money(p),
        _ => Decimal::ZERO,
    }
}

/// Keep extras with a label and a positive price
pub fn sanitize_extras(extras: Vec<ItemExtra>) -> Vec<ItemExtra> {
    extras
        .into_iter()
        .filter_map(|extra| {
            let label = extra.label.trim().to_string();
            let price = sanitize_price(Some(extra.price));
            (!label.is_empty() && price > Decimal::ZERO).then_some(ItemExtra { label, price })
        })
        .collect()
}

/// Display note carrying the extras: `"<note> | Extras: a (+$1.500) · b (+$200)"`
pub fn note_with_extras(note: Option<&str>, extras: &[ItemExtra]) -> Option<String> {
    let base = note.map(str::trim).unwrap_or_default();
    if extras.is_empty() {
        return (!base.is_empty()).then(|| base.to_string());
    }

    let extras_text = extras
        .iter()
        .map(|e| format!("{} (+${})", e.label, format_ars(e.price)))
        .collect::<Vec<_>>()
        .join(" · ");
    let line = format!("Extras: {extras_text}");

    if base.is_empty() {
        Some(line)
    } else {
        Some(format!("{base} | {line}"))
    }
}

/// Format an amount the es-AR way: `.` groups thousands, `,` separates
/// decimals, no trailing zeros (`1500.5` → `1.500,5`)
pub fn format_ars(amount: Decimal) -> String {
    let rounded = round_money(amount).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}
