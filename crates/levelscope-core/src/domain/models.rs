use serde::{Deserialize, Serialize};

use crate::{ProviderId, ValidationError};

/// OHLCV bar keyed by its open time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;
        validate_non_negative("volume", volume)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Bars for a single provider/symbol/timeframe, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub provider: ProviderId,
    pub symbol: String,
    pub timeframe: String,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(
        provider: ProviderId,
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        bars: Vec<Bar>,
    ) -> Self {
        Self {
            provider,
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_open_time(&self) -> Option<i64> {
        self.bars.first().map(|bar| bar.open_time)
    }

    pub fn last_open_time(&self) -> Option<i64> {
        self.bars.last().map(|bar| bar.open_time)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|bar| bar.close)
    }

    /// Keeps only the `limit` most recent bars.
    pub fn truncate_to_recent(&mut self, limit: usize) {
        if self.bars.len() > limit {
            self.bars.drain(..self.bars.len() - limit);
        }
    }

    /// Checks that open times are strictly increasing.
    pub fn validate_ordering(&self) -> Result<(), ValidationError> {
        for (index, pair) in self.bars.windows(2).enumerate() {
            if pair[1].open_time <= pair[0].open_time {
                return Err(ValidationError::UnorderedBars { index: index + 1 });
            }
        }
        Ok(())
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
