use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Coarse timeframe class used to scale structural look-backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeframeKind {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl TimeframeKind {
    /// Classifies a canonical provider timeframe string such as `4h`, `1d`, `1w` or `1M`.
    pub fn from_timeframe(timeframe: &str) -> Self {
        let raw = timeframe.trim();
        let lower = raw.to_ascii_lowercase();
        if raw.contains('M') || lower.contains("mo") {
            Self::Monthly
        } else if lower.contains('w') {
            Self::Weekly
        } else if lower.contains('d') {
            Self::Daily
        } else {
            Self::Intraday
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Display for TimeframeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
