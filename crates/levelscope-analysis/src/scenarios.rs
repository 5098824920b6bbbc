//! Bullish, bearish and range scenarios plus horizon targets.

use crate::format::format_price;
use crate::levels::Level;
use crate::payload::{Scenario, TimeHorizonTargets};

/// Levels strictly below and strictly above a price, each ascending.
struct Sides {
    below: Vec<f64>,
    above: Vec<f64>,
}

impl Sides {
    fn split(levels: &[Level], price: f64) -> Self {
        let mut values: Vec<f64> = levels
            .iter()
            .map(|level| level.price)
            .filter(|value| value.is_finite() && *value > 0.0)
            .collect();
        values.sort_by(f64::total_cmp);
        Self {
            below: values.iter().copied().filter(|v| *v < price).collect(),
            above: values.iter().copied().filter(|v| *v > price).collect(),
        }
    }

    /// `n`-th level below the price, nearest first.
    fn nth_below(&self, n: usize) -> Option<String> {
        self.below.iter().rev().nth(n).copied().map(format_price)
    }

    /// `n`-th level above the price, nearest first.
    fn nth_above(&self, n: usize) -> Option<String> {
        self.above.get(n).copied().map(format_price)
    }
}

fn follow_through(candidates: [Option<String>; 2], fallback: &str) -> String {
    let mut path: Vec<String> = Vec::with_capacity(2);
    for price in candidates.into_iter().flatten() {
        if !path.contains(&price) {
            path.push(price);
        }
    }
    if path.is_empty() {
        fallback.to_owned()
    } else {
        format!("Potential follow-through toward {}", path.join(", "))
    }
}

pub fn build_scenarios(levels: &[Level], last_price: f64) -> (Vec<Scenario>, TimeHorizonTargets) {
    let sides = Sides::split(levels, last_price);
    let support = sides.nth_below(0);
    let resistance = sides.nth_above(0);
    let next_below = sides.nth_below(1);
    let next_above = sides.nth_above(1);

    let bullish = Scenario {
        name: String::from("Bullish"),
        trigger: resistance.as_ref().map_or_else(
            || String::from("Acceptance above the nearest resistance"),
            |r| format!("Acceptance above {r}"),
        ),
        path: follow_through(
            [next_above.clone(), sides.nth_above(2)],
            "Continuation toward the next overhead levels",
        ),
        invalidation: Some(support.as_ref().map_or_else(
            || String::from("Break back into the prior range"),
            |s| format!("Back below {s}"),
        )),
        probability: None,
    };

    let bearish = Scenario {
        name: String::from("Bearish"),
        trigger: support.as_ref().map_or_else(
            || String::from("Acceptance below the nearest support"),
            |s| format!("Acceptance below {s}"),
        ),
        path: follow_through(
            [next_below.clone(), sides.nth_below(2)],
            "Continuation toward lower supports",
        ),
        invalidation: Some(resistance.as_ref().map_or_else(
            || String::from("Reclaim of the breakdown level"),
            |r| format!("Back above {r}"),
        )),
        probability: None,
    };

    let range = match (&support, &resistance) {
        (Some(s), Some(r)) => Scenario {
            name: String::from("Range"),
            trigger: format!("Holds between {s} and {r}"),
            path: format!("Mean reversion between {s} ↔ {r}"),
            invalidation: Some(format!(
                "Break and hold above {r} (bullish) or below {s} (bearish)"
            )),
            probability: None,
        },
        _ => Scenario {
            name: String::from("Range"),
            trigger: String::from("Consolidation inside the current range"),
            path: String::from("Rotation between nearby levels"),
            invalidation: Some(String::from("Range expansion")),
            probability: None,
        },
    };

    let up = |price: String| format!("↑ {price}");
    let down = |price: String| format!("↓ {price}");
    let targets = TimeHorizonTargets {
        short_term: resistance
            .map(up)
            .into_iter()
            .chain(support.map(down))
            .collect(),
        medium_term: next_above
            .map(up)
            .into_iter()
            .chain(next_below.map(down))
            .collect(),
        long_term: sides
            .above
            .iter()
            .rev()
            .take(2)
            .map(|v| up(format_price(*v)))
            .chain(sides.below.iter().take(2).map(|v| down(format_price(*v))))
            .collect(),
    };

    (vec![bullish, bearish, range], targets)
}
