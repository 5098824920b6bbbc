//! Engine parameters.
//!
//! Every constant the pipeline uses lives here and is passed into the stage
//! functions explicitly. All fields default, so a JSON file only needs the
//! values it overrides.

use std::fs;
use std::path::Path;

use levelscope_core::TimeframeKind;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub rsi_bands: RsiBands,
    pub rounding: RoundingTable,
    pub profiles: TimeframeProfiles,
    pub levels: LevelConfig,
    pub regime: RegimeConfig,
    pub disclaimer: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            rsi_bands: RsiBands::default(),
            rounding: RoundingTable::default(),
            profiles: TimeframeProfiles::default(),
            levels: LevelConfig::default(),
            regime: RegimeConfig::default(),
            disclaimer: String::from("Educational tool only - not financial advice."),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub ema_long: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub trend: TrendStrengthConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            ema_long: 200,
            rsi_period: 14,
            atr_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            trend: TrendStrengthConfig::default(),
        }
    }
}

/// Log-price regression window for the trend-strength score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendStrengthConfig {
    pub min_closes: usize,
    pub max_lookback: usize,
    pub min_valid: usize,
    pub slope_scale: f64,
}

impl Default for TrendStrengthConfig {
    fn default() -> Self {
        Self {
            min_closes: 60,
            max_lookback: 120,
            min_valid: 50,
            slope_scale: 200.0,
        }
    }
}

/// RSI thresholds shared by the confluence text and the bias score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiBands {
    pub overbought: f64,
    pub oversold: f64,
    pub bullish_above: f64,
    pub bearish_below: f64,
}

impl Default for RsiBands {
    fn default() -> Self {
        Self {
            overbought: 68.0,
            oversold: 32.0,
            bullish_above: 55.0,
            bearish_below: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundingStep {
    pub min_price: f64,
    pub step: f64,
}

/// Price-magnitude rounding steps, highest threshold first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundingTable {
    pub steps: Vec<RoundingStep>,
    pub fallback_step: f64,
}

impl Default for RoundingTable {
    fn default() -> Self {
        let steps = [
            (50_000.0, 100.0),
            (10_000.0, 50.0),
            (1_000.0, 10.0),
            (100.0, 1.0),
            (1.0, 0.01),
            (0.1, 0.001),
        ]
        .into_iter()
        .map(|(min_price, step)| RoundingStep { min_price, step })
        .collect();

        Self {
            steps,
            fallback_step: 0.0001,
        }
    }
}

impl RoundingTable {
    pub fn step_for(&self, price: f64) -> f64 {
        let magnitude = price.abs();
        self.steps
            .iter()
            .find(|entry| magnitude >= entry.min_price)
            .map_or(self.fallback_step, |entry| entry.step)
    }
}

/// Structural look-backs for one timeframe class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeProfile {
    pub swing_radius: usize,
    pub recent_swings: usize,
    pub micro_lookback: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeframeProfiles {
    pub intraday: TimeframeProfile,
    pub daily: TimeframeProfile,
    pub weekly: TimeframeProfile,
    pub monthly: TimeframeProfile,
}

impl Default for TimeframeProfiles {
    fn default() -> Self {
        Self {
            intraday: TimeframeProfile {
                swing_radius: 2,
                recent_swings: 30,
                micro_lookback: 40,
            },
            daily: TimeframeProfile {
                swing_radius: 3,
                recent_swings: 50,
                micro_lookback: 30,
            },
            weekly: TimeframeProfile {
                swing_radius: 4,
                recent_swings: 80,
                micro_lookback: 24,
            },
            monthly: TimeframeProfile {
                swing_radius: 4,
                recent_swings: 100,
                micro_lookback: 18,
            },
        }
    }
}

impl TimeframeProfiles {
    pub const fn for_kind(&self, kind: TimeframeKind) -> TimeframeProfile {
        match kind {
            TimeframeKind::Intraday => self.intraday,
            TimeframeKind::Daily => self.daily,
            TimeframeKind::Weekly => self.weekly,
            TimeframeKind::Monthly => self.monthly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Relative distance from a running cluster mean that still joins the cluster.
    pub cluster_tolerance: f64,
    /// Levels farther than this fraction of current price are discarded.
    pub max_distance_pct: f64,
    pub merge_pct: f64,
    pub merge_step_multiple: f64,
    pub max_levels: usize,
    pub max_note_fragments: usize,
    pub micro_min_bars: usize,
    /// Swing clusters kept (highest prices first) before compaction.
    pub swing_candidates: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            cluster_tolerance: 0.006,
            max_distance_pct: 0.45,
            merge_pct: 0.0012,
            merge_step_multiple: 1.5,
            max_levels: 10,
            max_note_fragments: 3,
            micro_min_bars: 20,
            swing_candidates: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// EMA fast/slow separation (fraction of slow EMA) below which the market is ranging.
    pub range_separation: f64,
    pub high_volatility_pct: f64,
    pub strength_weight: f64,
    pub strength_cap: f64,
    pub separation_weight: f64,
    pub separation_cap: f64,
    pub long_ema_bonus: f64,
    pub range_confidence_cap: f64,
    pub confidence_floor: f64,
    pub confidence_ceiling: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            range_separation: 0.004,
            high_volatility_pct: 3.0,
            strength_weight: 100.0,
            strength_cap: 35.0,
            separation_weight: 5_000.0,
            separation_cap: 45.0,
            long_ema_bonus: 10.0,
            range_confidence_cap: 35.0,
            confidence_floor: 10.0,
            confidence_ceiling: 95.0,
        }
    }
}
