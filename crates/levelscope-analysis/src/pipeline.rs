//! Bars in, [`AnalysisPayload`] out.
//!
//! Every stage is a pure function of the bars and the [`AnalysisConfig`];
//! running the pipeline twice on the same input yields the same payload.

use levelscope_core::{Bar, BarSeries, TimeframeKind};

use crate::bias::{score_bias, BiasInputs};
use crate::config::AnalysisConfig;
use crate::format::format_price;
use crate::indicators::IndicatorSnapshot;
use crate::levels::{derive_levels, Level};
use crate::payload::{AnalysisPayload, PriceLevel};
use crate::regime::{classify_regime, infer_structure, MarketStructure, Regime, RegimeInputs};
use crate::scenarios::build_scenarios;
use crate::summary::{build_summary, SummaryInputs};

/// Analyses a fetched series, labelling it with the provider's display name.
pub fn analyze_series(series: &BarSeries, config: &AnalysisConfig) -> AnalysisPayload {
    analyze_bars(
        series.provider.display_name(),
        &series.symbol,
        &series.timeframe,
        &series.bars,
        config,
    )
}

pub fn analyze_bars(
    exchange: &str,
    symbol: &str,
    timeframe: &str,
    bars: &[Bar],
    config: &AnalysisConfig,
) -> AnalysisPayload {
    let profile = config
        .profiles
        .for_kind(TimeframeKind::from_timeframe(timeframe));
    let snapshot = IndicatorSnapshot::compute(bars, &config.indicators);
    let last_close = snapshot.last_close;

    let structure = infer_structure(bars, profile.swing_radius);
    let regime = classify_regime(
        &RegimeInputs {
            last_close,
            ema_fast: snapshot.ema_fast,
            ema_slow: snapshot.ema_slow,
            ema_long: snapshot.ema_long,
            trend_strength: snapshot.trend_strength,
            volatility_pct: snapshot.volatility_pct,
        },
        config.indicators.ema_long,
        &config.regime,
    );
    let regime_label = regime.label();

    let levels = derive_levels(bars, last_close, &profile, &config.levels, &config.rounding);
    let (scenarios, time_horizon_targets) = build_scenarios(&levels, last_close);

    let bias = score_bias(
        &BiasInputs {
            last_close,
            ema_fast: snapshot.ema_fast,
            ema_slow: snapshot.ema_slow,
            ema_long: snapshot.ema_long,
            macd_histogram: snapshot.macd_histogram,
            rsi: snapshot.rsi,
            structure,
            regime: regime.kind,
        },
        &config.rsi_bands,
    );

    let summary = build_summary(&SummaryInputs {
        symbol,
        timeframe,
        last_close,
        change_pct: snapshot.change_pct,
        regime: &regime_label,
        structure: structure.label(),
        levels: &levels,
    });

    AnalysisPayload {
        symbol: symbol.to_owned(),
        timeframe: timeframe.to_owned(),
        exchange: exchange.to_owned(),
        summary,
        market_regime: regime_label,
        regime_confidence: regime.confidence,
        market_structure: structure.label().to_owned(),
        support_resistance: levels
            .iter()
            .map(|level| PriceLevel::from_level(level, last_close))
            .collect(),
        confluence: confluence(&snapshot, structure, &levels, config),
        indicators: readouts(&snapshot, config),
        scenarios,
        time_horizon_targets,
        bias,
        risk_notes: risk_notes(&snapshot, &regime),
        disclaimer: config.disclaimer.clone(),
    }
}

fn confluence(
    snapshot: &IndicatorSnapshot,
    structure: MarketStructure,
    levels: &[Level],
    config: &AnalysisConfig,
) -> Vec<String> {
    let periods = &config.indicators;
    let bands = &config.rsi_bands;
    let mut out = Vec::new();

    if let (Some(fast), Some(slow)) = (snapshot.ema_fast, snapshot.ema_slow) {
        let side = if fast >= slow { "above" } else { "below" };
        out.push(format!(
            "EMA{} {side} EMA{}",
            periods.ema_fast, periods.ema_slow
        ));
    }
    if let Some(long) = snapshot.ema_long.filter(|_| snapshot.last_close > 0.0) {
        let side = if snapshot.last_close >= long { "above" } else { "below" };
        out.push(format!("Price {side} EMA{}", periods.ema_long));
    }
    if let Some(rsi) = snapshot.rsi {
        let state = if rsi >= bands.overbought {
            "overbought"
        } else if rsi <= bands.oversold {
            "oversold"
        } else if rsi > bands.bullish_above {
            "bullish"
        } else if rsi < bands.bearish_below {
            "bearish"
        } else {
            "neutral"
        };
        out.push(format!("RSI({}) {state}", periods.rsi_period));
    }
    if let Some(hist) = snapshot.macd_histogram {
        out.push(String::from(if hist >= 0.0 { "MACD bullish" } else { "MACD bearish" }));
    }
    out.push(structure.label().to_owned());
    if levels.len() >= 6 {
        out.push(format!("Derived {} key levels from swings", levels.len()));
    }
    out
}

fn readouts(snapshot: &IndicatorSnapshot, config: &AnalysisConfig) -> Vec<String> {
    let periods = &config.indicators;
    let mut out = Vec::new();

    if let (Some(fast), Some(slow)) = (snapshot.ema_fast, snapshot.ema_slow) {
        out.push(format!(
            "EMA{}: {} • EMA{}: {}",
            periods.ema_fast,
            format_price(fast),
            periods.ema_slow,
            format_price(slow)
        ));
    }
    if let Some(long) = snapshot.ema_long.filter(|_| snapshot.last_close > 0.0) {
        out.push(format!("EMA{}: {}", periods.ema_long, format_price(long)));
    }
    if let Some(rsi) = snapshot.rsi {
        out.push(format!("RSI({}): {}", periods.rsi_period, rsi.round()));
    }
    if let Some(pct) = snapshot.volatility_pct {
        out.push(format!("ATR({}) as %: {pct:.2}%", periods.atr_period));
    }
    out
}

fn risk_notes(snapshot: &IndicatorSnapshot, regime: &Regime) -> Vec<String> {
    match snapshot.volatility_pct {
        Some(pct) if regime.high_volatility => {
            vec![format!("High volatility: ATR is {pct:.2}% of price.")]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_bars(len: usize) -> Vec<Bar> {
        (0..len)
            .map(|i| {
                let close = 100.0 + i as f64;
                let high = if i % 5 == 0 { close + 3.0 } else { close + 0.5 };
                let low = if i % 5 == 2 { close - 3.0 } else { close - 0.5 };
                Bar::new(i as i64 * 3_600_000, close - 0.3, high, low, close, 10.0).expect("bar")
            })
            .collect()
    }

    #[test]
    fn rising_series_reads_bullish() {
        let payload = analyze_bars(
            "Binance Futures",
            "BTCUSDT",
            "1h",
            &trending_bars(300),
            &AnalysisConfig::default(),
        );

        assert!(payload.market_regime.contains("Bullish trend"), "{}", payload.market_regime);
        assert_eq!(payload.market_structure, "Higher highs and higher lows");
        assert!(payload.bias.bullish > payload.bias.bearish);
        assert_eq!(
            u32::from(payload.bias.bullish) + u32::from(payload.bias.bearish) + u32::from(payload.bias.neutral),
            100
        );
        assert!(payload.summary.starts_with("BTCUSDT 1h last close 399.00"));
        assert!(payload.confluence.iter().any(|c| c == "EMA20 above EMA50"));
        assert!(payload.confluence.iter().any(|c| c == "Price above EMA200"));
        assert_eq!(payload.scenarios.len(), 3);
        assert!(payload.support_resistance.len() <= 10);
    }

    #[test]
    fn long_ema_is_read_before_two_hundred_bars() {
        let payload = analyze_bars(
            "Binance Futures",
            "BTCUSDT",
            "1h",
            &trending_bars(150),
            &AnalysisConfig::default(),
        );

        assert_eq!(payload.market_regime, "Bullish trend (above EMA200)");
        assert_eq!(payload.regime_confidence, Some(90));
        assert!(payload.confluence.iter().any(|c| c == "Price above EMA200"));
        assert!(payload.indicators.iter().any(|line| line.starts_with("EMA200: ")));
    }

    #[test]
    fn pipeline_is_deterministic() {
        let bars = trending_bars(250);
        let config = AnalysisConfig::default();
        assert_eq!(
            analyze_bars("Binance", "ETHUSDT", "4h", &bars, &config),
            analyze_bars("Binance", "ETHUSDT", "4h", &bars, &config)
        );
    }

    #[test]
    fn short_series_degrades_to_absence_states() {
        let bars = trending_bars(5);
        let payload = analyze_bars("Stooq", "AAPL", "1d", &bars, &AnalysisConfig::default());

        assert_eq!(payload.market_structure, "Structure unclear");
        assert_eq!(payload.indicators.len(), 2);
        assert!(payload.indicators.iter().all(|line| line.starts_with("EMA")));
        assert!(payload.risk_notes.is_empty());
        assert_eq!(payload.disclaimer, "Educational tool only - not financial advice.");
    }

    #[test]
    fn empty_input_still_produces_a_payload() {
        let payload = analyze_bars("Stooq", "AAPL", "1d", &[], &AnalysisConfig::default());

        assert!(payload.support_resistance.is_empty());
        assert_eq!(payload.regime_confidence, None);
        assert_eq!(payload.market_structure, "Structure unclear");
    }

    #[test]
    fn volatile_series_gets_risk_note() {
        let bars: Vec<Bar> = (0..80)
            .map(|i| {
                let close = if i % 2 == 0 { 100.0 } else { 108.0 };
                Bar::new(i * 86_400_000, 104.0, 110.0, 98.0, close, 1.0).expect("bar")
            })
            .collect();
        let payload = analyze_bars("Stooq", "XYZ", "1d", &bars, &AnalysisConfig::default());

        assert!(payload.market_regime.ends_with("(high volatility)"));
        assert_eq!(payload.risk_notes.len(), 1);
        assert!(payload.risk_notes[0].starts_with("High volatility: ATR is"));
    }
}
