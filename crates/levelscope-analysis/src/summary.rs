//! One-paragraph market summary.

use crate::format::{format_change_pct, format_price};
use crate::levels::Level;

pub struct SummaryInputs<'a> {
    pub symbol: &'a str,
    pub timeframe: &'a str,
    pub last_close: f64,
    pub change_pct: Option<f64>,
    pub regime: &'a str,
    pub structure: &'a str,
    pub levels: &'a [Level],
}

pub fn build_summary(inputs: &SummaryInputs<'_>) -> String {
    let nearest_below = inputs
        .levels
        .iter()
        .map(|level| level.price)
        .filter(|price| *price < inputs.last_close)
        .max_by(f64::total_cmp);
    let nearest_above = inputs
        .levels
        .iter()
        .map(|level| level.price)
        .filter(|price| *price > inputs.last_close)
        .min_by(f64::total_cmp);

    let mut parts = vec![
        format!(
            "{} {} last close {} ({}).",
            inputs.symbol,
            inputs.timeframe,
            format_price(inputs.last_close),
            format_change_pct(inputs.change_pct)
        ),
        format!("{}. {}.", inputs.regime, inputs.structure),
    ];
    match (nearest_below, nearest_above) {
        (Some(below), Some(above)) => parts.push(format!(
            "Nearest levels: {} below, {} above.",
            format_price(below),
            format_price(above)
        )),
        (Some(below), None) => parts.push(format!("Nearest support: {}.", format_price(below))),
        (None, Some(above)) => {
            parts.push(format!("Nearest resistance: {}.", format_price(above)));
        }
        (None, None) => {}
    }
    parts.join(" ")
}
