//! Serializable analysis output.

use serde::{Deserialize, Serialize};

use crate::format::format_price;
use crate::levels::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A level rendered for display, classified against the analysis price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: String,
    pub kind: LevelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriceLevel {
    pub fn from_level(level: &Level, current: f64) -> Self {
        Self {
            price: format_price(level.price),
            kind: level.kind_at(current),
            note: level.note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub trigger: String,
    pub path: String,
    pub invalidation: Option<String>,
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeHorizonTargets {
    pub short_term: Vec<String>,
    pub medium_term: Vec<String>,
    pub long_term: Vec<String>,
}

/// Directional percentages; the three fields sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bias {
    pub bullish: u8,
    pub bearish: u8,
    pub neutral: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub symbol: String,
    pub timeframe: String,
    pub exchange: String,
    pub summary: String,
    pub market_regime: String,
    pub regime_confidence: Option<u8>,
    pub market_structure: String,
    pub support_resistance: Vec<PriceLevel>,
    pub confluence: Vec<String>,
    pub indicators: Vec<String>,
    pub scenarios: Vec<Scenario>,
    pub time_horizon_targets: TimeHorizonTargets,
    pub bias: Bias,
    pub risk_notes: Vec<String>,
    pub disclaimer: String,
}
