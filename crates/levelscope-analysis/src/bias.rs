//! Directional bias scoring.

use crate::config::RsiBands;
use crate::payload::Bias;
use crate::regime::{MarketStructure, RegimeKind};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiasInputs {
    pub last_close: f64,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub ema_long: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub rsi: Option<f64>,
    pub structure: MarketStructure,
    pub regime: RegimeKind,
}

/// Accumulated bullish and bearish points before normalisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BiasPoints {
    pub bullish: u32,
    pub bearish: u32,
}

impl BiasPoints {
    fn add(&mut self, bullish: bool, points: u32) {
        if bullish {
            self.bullish += points;
        } else {
            self.bearish += points;
        }
    }

    fn split(&mut self) {
        self.bullish += 1;
        self.bearish += 1;
    }
}

pub fn bias_points(inputs: &BiasInputs, bands: &RsiBands) -> BiasPoints {
    let mut points = BiasPoints::default();

    if let (Some(fast), Some(slow)) = (inputs.ema_fast, inputs.ema_slow) {
        points.add(fast >= slow, 2);
    }
    if let Some(long) = inputs.ema_long.filter(|_| inputs.last_close > 0.0) {
        points.add(inputs.last_close >= long, 2);
    }
    if let Some(hist) = inputs.macd_histogram {
        points.add(hist >= 0.0, 1);
    }
    if let Some(rsi) = inputs.rsi {
        if rsi >= bands.overbought {
            points.bearish += 1;
        } else if rsi <= bands.oversold {
            points.bullish += 1;
        } else if rsi > bands.bullish_above {
            points.bullish += 1;
        } else if rsi < bands.bearish_below {
            points.bearish += 1;
        }
    }

    match inputs.structure {
        MarketStructure::HigherHighsHigherLows => points.bullish += 2,
        MarketStructure::LowerHighsLowerLows => points.bearish += 2,
        MarketStructure::Mixed | MarketStructure::Unclear => {}
    }
    match inputs.regime {
        RegimeKind::BullishTrend => points.bullish += 2,
        RegimeKind::BearishTrend => points.bearish += 2,
        RegimeKind::BullishRebound | RegimeKind::Range => points.split(),
        RegimeKind::BearishPullback => {}
    }
    points
}

/// Converts points to percentages that always sum to 100.
///
/// Close contests are pulled toward neutral: within 10 points the neutral
/// share is at least 20 and the rest is split evenly, within 20 points it is
/// at least 10.
pub fn normalize_bias(points: BiasPoints) -> Bias {
    let total = f64::from((points.bullish + points.bearish).max(1));
    let mut bullish = (f64::from(points.bullish) / total * 100.0).round() as i32;
    let mut bearish = ((f64::from(points.bearish) / total * 100.0).round() as i32).min(100 - bullish);
    let mut neutral = 100 - bullish - bearish;

    let diff = (bullish - bearish).abs();
    if diff <= 10 {
        neutral = neutral.max(20);
        let remaining = 100 - neutral;
        bullish = remaining / 2;
        bearish = remaining - bullish;
    } else if diff <= 20 {
        neutral = neutral.max(10);
        let remaining = 100 - neutral;
        if bullish > bearish {
            bullish = bullish.min(remaining);
            bearish = remaining - bullish;
        } else {
            bearish = bearish.min(remaining);
            bullish = remaining - bearish;
        }
    }

    Bias {
        bullish: bullish as u8,
        bearish: bearish as u8,
        neutral: neutral as u8,
    }
}

pub fn score_bias(inputs: &BiasInputs, bands: &RsiBands) -> Bias {
    normalize_bias(bias_points(inputs, bands))
}
