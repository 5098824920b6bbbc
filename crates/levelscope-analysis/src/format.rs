//! Price rounding and display.

/// Rounds `value` to the nearest multiple of `step`. A non-positive step
/// leaves the value untouched.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    if step.is_nan() || step <= 0.0 || !value.is_finite() {
        return value;
    }
    (value / step).round() * step
}

/// Number of decimals used when rendering a price of this magnitude.
pub fn price_decimals(value: f64) -> usize {
    let magnitude = value.abs();
    if magnitude >= 1_000.0 {
        0
    } else if magnitude >= 10.0 {
        2
    } else if magnitude >= 1.0 {
        4
    } else if magnitude >= 0.1 {
        5
    } else if magnitude >= 0.01 {
        6
    } else {
        8
    }
}

/// Renders a price with magnitude-dependent precision, e.g. `65000`,
/// `187.25`, `1.0845`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return String::from("n/a");
    }
    format!("{value:.prec$}", prec = price_decimals(value))
}

/// Signed percentage with two decimals, e.g. `+1.25%`.
pub fn format_change_pct(value: Option<f64>) -> String {
    match value {
        Some(pct) if pct.is_finite() => {
            let sign = if pct >= 0.0 { "+" } else { "" };
            format!("{sign}{pct:.2}%")
        }
        _ => String::from("n/a"),
    }
}
