//! Shared numeric helpers: percent conversion, display rounding and formatting,
//! and the integer GCD/LCM used by the fraction engine.
//!
//! Rounding and formatting are for display only. Engines never feed a rounded
//! value back into a computation.

const MILLION: f64 = 1_000_000.0;

pub fn percent_to_rate(percent: f64) -> f64 {
    percent / 100.0
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Greatest common divisor of the absolute values. `gcd(a, 0) == |a|`.
pub fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

pub fn lcm(a: i128, b: i128) -> i128 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b) * b).abs()
}

/// US-dollar display with no fractional digits, abbreviated to one decimal of
/// millions once the magnitude reaches a million.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "undefined".to_string();
    }

    let magnitude = value.abs();
    let rounded = magnitude.round();
    let sign = if value < 0.0 && rounded > 0.0 { "-" } else { "" };
    if rounded >= MILLION {
        return format!("{sign}${:.1}M", magnitude / MILLION);
    }
    format!("{sign}${}", group_thousands(rounded as u64))
}

pub fn format_percent(value: f64, places: usize) -> String {
    if !value.is_finite() {
        return "undefined".to_string();
    }
    let places = places.clamp(1, 2);
    format!("{value:.places$}%")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
