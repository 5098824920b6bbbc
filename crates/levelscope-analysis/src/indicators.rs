//! Technical indicators over close series and bars.
//!
//! Series outputs are index-aligned with their input. Warm-up slots hold
//! `f64::NAN`; use [`last_defined`] to read the latest usable value.

use levelscope_core::Bar;

use crate::config::{IndicatorConfig, TrendStrengthConfig};

/// Exponential moving average seeded with the first value.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev = first;
    out.push(prev);
    for &value in &values[1..] {
        prev = value * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

/// Wilder RSI. Defined from index `period` onward.
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in 1..=period {
        let delta = closes[i] - closes[i - 1];
        if delta >= 0.0 {
            gain += delta;
        } else {
            loss -= delta;
        }
    }
    let period_f = period as f64;
    let mut avg_gain = gain / period_f;
    let mut avg_loss = loss / period_f;
    out[period] = rsi_value(avg_gain, avg_loss);

    for i in (period + 1)..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let (up, down) = if delta >= 0.0 { (delta, 0.0) } else { (0.0, -delta) };
        avg_gain = (avg_gain * (period_f - 1.0) + up) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + down) / period_f;
        out[i] = rsi_value(avg_gain, avg_loss);
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Wilder average true range. Defined from index `period - 1` onward.
pub fn atr(bars: &[Bar], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }

    let true_ranges: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match i.checked_sub(1).map(|prev| bars[prev].close) {
            Some(prev_close) => (bar.high - bar.low)
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs()),
            None => bar.high - bar.low,
        })
        .collect();

    let period_f = period as f64;
    let mut prev = true_ranges[..period].iter().sum::<f64>() / period_f;
    out[period - 1] = prev;
    for i in period..true_ranges.len() {
        prev = (prev * (period_f - 1.0) + true_ranges[i]) / period_f;
        out[i] = prev;
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal = ema(&line, signal_period);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
    Macd {
        line,
        signal,
        histogram,
    }
}

/// Ordinary least squares slope of `values` against their index.
pub fn linear_regression_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    if den == 0.0 {
        return None;
    }
    Some(num / den)
}

/// Signed trend score in `[-1, 1]` from the log-price regression slope.
///
/// The sign follows fast-vs-slow EMA alignment when both are known, and the
/// slope sign otherwise.
pub fn trend_strength(
    closes: &[f64],
    ema_fast: Option<f64>,
    ema_slow: Option<f64>,
    config: &TrendStrengthConfig,
) -> Option<f64> {
    if closes.len() < config.min_closes {
        return None;
    }
    let lookback = closes
        .len()
        .max(config.min_closes)
        .min(config.max_lookback);
    let logs: Vec<f64> = closes[closes.len() - lookback..]
        .iter()
        .filter(|close| close.is_finite() && **close > 0.0)
        .map(|close| close.ln())
        .collect();
    if logs.len() < config.min_valid {
        return None;
    }

    let slope = linear_regression_slope(&logs)?;
    let strength = (slope.abs() * config.slope_scale).clamp(0.0, 1.0);
    let bullish = match (ema_fast, ema_slow) {
        (Some(fast), Some(slow)) => fast >= slow,
        _ => slope >= 0.0,
    };
    Some(if bullish { strength } else { -strength })
}

/// Last element when it is finite.
pub fn last_defined(series: &[f64]) -> Option<f64> {
    series.last().copied().filter(|value| value.is_finite())
}

/// Latest readings of every indicator the pipeline consumes.
///
/// EMAs are seeded with the first close, so they are defined for any
/// non-empty series regardless of period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub last_close: f64,
    pub change_pct: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub ema_long: Option<f64>,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub trend_strength: Option<f64>,
    pub volatility_pct: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(bars: &[Bar], config: &IndicatorConfig) -> Self {
        let closes: Vec<f64> = bars.iter().map(|bar| bar.close).collect();
        let Some(&last_close) = closes.last() else {
            return Self::default();
        };

        let latest_ema = |period: usize| last_defined(&ema(&closes, period));
        let ema_fast = latest_ema(config.ema_fast);
        let ema_slow = latest_ema(config.ema_slow);
        let ema_long = latest_ema(config.ema_long);

        let pack = macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal);
        let macd_histogram = last_defined(&pack.histogram);

        let change_pct = closes
            .len()
            .checked_sub(2)
            .map(|i| closes[i])
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last_close - prev) / prev * 100.0);

        let atr = last_defined(&atr(bars, config.atr_period));
        let volatility_pct = atr
            .filter(|value| *value > 0.0 && last_close > 0.0)
            .map(|value| value / last_close * 100.0);

        Self {
            last_close,
            change_pct,
            ema_fast,
            ema_slow,
            ema_long,
            rsi: last_defined(&rsi(&closes, config.rsi_period)),
            atr,
            macd_histogram,
            trend_strength: trend_strength(&closes, ema_fast, ema_slow, &config.trend),
            volatility_pct,
        }
    }
}
