//! Market structure and regime classification.

use std::fmt;

use levelscope_core::Bar;

use crate::config::RegimeConfig;
use crate::levels::find_swings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketStructure {
    HigherHighsHigherLows,
    LowerHighsLowerLows,
    Mixed,
    Unclear,
}

impl MarketStructure {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HigherHighsHigherLows => "Higher highs and higher lows",
            Self::LowerHighsLowerLows => "Lower highs and lower lows",
            Self::Mixed => "Mixed structure (range/transition)",
            Self::Unclear => "Structure unclear",
        }
    }
}

impl fmt::Display for MarketStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compares the two most recent swing highs and lows.
pub fn infer_structure(bars: &[Bar], swing_radius: usize) -> MarketStructure {
    let swings = find_swings(bars, swing_radius);
    let (Some(highs), Some(lows)) = (last_two(&swings.highs), last_two(&swings.lows)) else {
        return MarketStructure::Unclear;
    };

    let ([prev_high, last_high], [prev_low, last_low]) = (highs, lows);
    if last_high < prev_high && last_low < prev_low {
        MarketStructure::LowerHighsLowerLows
    } else if last_high > prev_high && last_low > prev_low {
        MarketStructure::HigherHighsHigherLows
    } else {
        MarketStructure::Mixed
    }
}

fn last_two(values: &[f64]) -> Option<[f64; 2]> {
    match values {
        [.., a, b] => Some([*a, *b]),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegimeKind {
    Range,
    BullishTrend,
    BullishRebound,
    BearishTrend,
    BearishPullback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongEmaSide {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegimeInputs {
    pub last_close: f64,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub ema_long: Option<f64>,
    pub trend_strength: Option<f64>,
    pub volatility_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regime {
    pub kind: RegimeKind,
    pub long_ema_side: Option<LongEmaSide>,
    pub high_volatility: bool,
    pub confidence: Option<u8>,
    long_ema_period: usize,
}

impl Regime {
    pub fn label(&self) -> String {
        let ema = self.long_ema_period;
        let side = |side: LongEmaSide| match side {
            LongEmaSide::Above => format!("above EMA{ema}"),
            LongEmaSide::Below => format!("below EMA{ema}"),
        };

        let core = match (self.kind, self.long_ema_side) {
            (RegimeKind::Range, _) => String::from("Range / consolidation"),
            (RegimeKind::BullishRebound, _) => format!("Bullish rebound (below EMA{ema})"),
            (RegimeKind::BearishPullback, _) => format!("Bearish pullback (above EMA{ema})"),
            (RegimeKind::BullishTrend, Some(s)) => format!("Bullish trend ({})", side(s)),
            (RegimeKind::BullishTrend, None) => String::from("Bullish trend"),
            (RegimeKind::BearishTrend, Some(s)) => format!("Bearish trend ({})", side(s)),
            (RegimeKind::BearishTrend, None) => String::from("Bearish trend"),
        };

        if self.high_volatility {
            format!("{core} (high volatility)")
        } else {
            core
        }
    }
}

pub fn classify_regime(inputs: &RegimeInputs, long_ema_period: usize, config: &RegimeConfig) -> Regime {
    let strength = inputs.trend_strength.unwrap_or(0.0);
    let long_ema_side = inputs
        .ema_long
        .filter(|_| inputs.last_close > 0.0)
        .map(|ema| {
            if inputs.last_close >= ema {
                LongEmaSide::Above
            } else {
                LongEmaSide::Below
            }
        });

    let separation = match (inputs.ema_fast, inputs.ema_slow) {
        (Some(fast), Some(slow)) => Some(((fast - slow) / slow.abs().max(1e-6)).abs()),
        _ => None,
    };
    let ranging = separation.is_some_and(|sep| sep < config.range_separation);
    let bullish = match (inputs.ema_fast, inputs.ema_slow) {
        (Some(fast), Some(slow)) => fast >= slow,
        _ => strength >= 0.0,
    };

    let below_long = inputs.ema_long.is_some_and(|ema| inputs.last_close < ema);
    let above_long = inputs.ema_long.is_some_and(|ema| inputs.last_close > ema);
    let kind = if ranging {
        RegimeKind::Range
    } else if bullish && below_long {
        RegimeKind::BullishRebound
    } else if bullish {
        RegimeKind::BullishTrend
    } else if above_long {
        RegimeKind::BearishPullback
    } else {
        RegimeKind::BearishTrend
    };

    let mut score = (strength.abs() * config.strength_weight).clamp(0.0, config.strength_cap);
    if let Some(sep) = separation {
        score += (sep * config.separation_weight).min(config.separation_cap);
    }
    if long_ema_side.is_some() {
        score += config.long_ema_bonus;
    }
    if ranging {
        score = score.min(config.range_confidence_cap);
    }
    let confidence = (score > 0.0).then(|| {
        (score.clamp(config.confidence_floor, config.confidence_ceiling) + 0.5).trunc() as u8
    });

    Regime {
        kind,
        long_ema_side,
        high_volatility: inputs
            .volatility_pct
            .is_some_and(|pct| pct >= config.high_volatility_pct),
        confidence,
        long_ema_period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: i64, high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(i * 60_000, mid, high, low, mid, 1.0).expect("valid bar")
    }

    fn zigzag(step: f64) -> Vec<Bar> {
        (0..40)
            .map(|i| {
                let base = 100.0 + step * i as f64;
                let swing = if i % 4 == 0 { 5.0 } else if i % 4 == 2 { -5.0 } else { 0.0 };
                bar(i, base + swing + 1.0, base + swing - 1.0)
            })
            .collect()
    }

    fn classify(inputs: RegimeInputs) -> Regime {
        classify_regime(&inputs, 200, &RegimeConfig::default())
    }

    #[test]
    fn rising_zigzag_is_higher_highs() {
        assert_eq!(infer_structure(&zigzag(0.5), 2), MarketStructure::HigherHighsHigherLows);
    }

    #[test]
    fn falling_zigzag_is_lower_lows() {
        assert_eq!(infer_structure(&zigzag(-0.5), 2), MarketStructure::LowerHighsLowerLows);
    }

    #[test]
    fn flat_zigzag_is_mixed() {
        assert_eq!(infer_structure(&zigzag(0.0), 2), MarketStructure::Mixed);
    }

    #[test]
    fn too_few_bars_is_unclear() {
        assert_eq!(infer_structure(&zigzag(0.5)[..4], 2), MarketStructure::Unclear);
        assert_eq!(MarketStructure::Unclear.label(), "Structure unclear");
    }

    #[test]
    fn bullish_trend_above_long_ema() {
        let regime = classify(RegimeInputs {
            last_close: 120.0,
            ema_fast: Some(118.0),
            ema_slow: Some(110.0),
            ema_long: Some(100.0),
            trend_strength: Some(0.5),
            volatility_pct: Some(1.0),
        });
        assert_eq!(regime.kind, RegimeKind::BullishTrend);
        assert_eq!(regime.label(), "Bullish trend (above EMA200)");
        // 35 (strength cap) + 45 (separation cap) + 10
        assert_eq!(regime.confidence, Some(90));
    }

    #[test]
    fn bullish_below_long_ema_is_rebound() {
        let regime = classify(RegimeInputs {
            last_close: 95.0,
            ema_fast: Some(96.0),
            ema_slow: Some(94.0),
            ema_long: Some(100.0),
            ..RegimeInputs::default()
        });
        assert_eq!(regime.label(), "Bullish rebound (below EMA200)");
    }

    #[test]
    fn bearish_above_long_ema_is_pullback() {
        let regime = classify(RegimeInputs {
            last_close: 105.0,
            ema_fast: Some(104.0),
            ema_slow: Some(106.0),
            ema_long: Some(100.0),
            volatility_pct: Some(3.5),
            ..RegimeInputs::default()
        });
        assert_eq!(regime.label(), "Bearish pullback (above EMA200) (high volatility)");
    }

    #[test]
    fn tight_emas_range_and_cap_confidence() {
        let regime = classify(RegimeInputs {
            last_close: 100.0,
            ema_fast: Some(100.1),
            ema_slow: Some(100.0),
            ema_long: Some(99.0),
            trend_strength: Some(0.9),
            volatility_pct: None,
        });
        assert_eq!(regime.kind, RegimeKind::Range);
        assert_eq!(regime.label(), "Range / consolidation");
        assert_eq!(regime.confidence, Some(35));
    }

    #[test]
    fn no_inputs_means_null_confidence() {
        let regime = classify(RegimeInputs {
            last_close: 100.0,
            ..RegimeInputs::default()
        });
        assert_eq!(regime.kind, RegimeKind::BullishTrend);
        assert_eq!(regime.label(), "Bullish trend");
        assert_eq!(regime.confidence, None);
    }

    #[test]
    fn small_scores_are_floored() {
        let regime = classify(RegimeInputs {
            last_close: 100.0,
            trend_strength: Some(-0.02),
            ..RegimeInputs::default()
        });
        assert_eq!(regime.kind, RegimeKind::BearishTrend);
        assert_eq!(regime.confidence, Some(10));
    }
}
