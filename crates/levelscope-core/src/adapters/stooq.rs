use std::sync::Arc;

use super::fetch_body;
use crate::config::FetchConfig;
use crate::data_source::{BarsFuture, BarsRequest, DataSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest};
use crate::resample::resample_fixed_windows;
use crate::{parse_date_millis, Bar, BarSeries, ProviderId};

/// Spot metal codes and the ETF that proxies each on Stooq.
const METAL_PROXIES: [(&str, &str); 5] = [
    ("xauusd", "gld.us"),
    ("xagusd", "slv.us"),
    ("xptusd", "pplt.us"),
    ("xpdusd", "pall.us"),
    ("xcuusd", "cper.us"),
];

/// How a requested timeframe is synthesized from daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyPlan {
    pub timeframe: &'static str,
    pub group_size: usize,
}

/// Maps a requested timeframe onto daily bars: `1d`, `1w` (5 bars) or `1M` (21 bars).
pub fn daily_plan(timeframe: &str) -> Result<DailyPlan, SourceError> {
    let trimmed = timeframe.trim();
    let lower: String = trimmed.to_ascii_lowercase().chars().filter(|ch| *ch != ' ').collect();

    if lower == "1d" || lower == "d" {
        return Ok(DailyPlan {
            timeframe: "1d",
            group_size: 1,
        });
    }
    if lower == "1w" || lower == "w" {
        return Ok(DailyPlan {
            timeframe: "1w",
            group_size: 5,
        });
    }
    if trimmed == "1M" || lower == "1mo" || lower == "1mon" {
        return Ok(DailyPlan {
            timeframe: "1M",
            group_size: 21,
        });
    }

    Err(SourceError::unsupported_timeframe(ProviderId::Stooq, timeframe))
}

/// Lowercases and strips spaces.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_lowercase().replace(' ', "")
}

/// Ordered, de-duplicated spellings to try for a Stooq symbol.
///
/// The symbol itself, then without a leading `^`, then with a `.us` suffix for
/// bare 1-5 letter tickers, then the ETF proxy for known spot metal codes.
pub fn symbol_candidates(symbol: &str) -> Vec<String> {
    let cleaned = normalize_symbol(symbol);
    let mut candidates = vec![cleaned.clone()];

    if let Some(stripped) = cleaned.strip_prefix('^') {
        candidates.push(stripped.to_owned());
    }

    let is_bare_ticker = (1..=5).contains(&cleaned.len())
        && cleaned.chars().all(|ch| ch.is_ascii_lowercase());
    if is_bare_ticker {
        candidates.push(format!("{cleaned}.us"));
    }

    if let Some((_, proxy)) = METAL_PROXIES.iter().find(|(code, _)| *code == cleaned) {
        candidates.push((*proxy).to_owned());
    }

    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !candidate.is_empty() && !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Parses the Stooq daily CSV (`Date,Open,High,Low,Close,Volume`).
///
/// Rows with an unparsable date or non-finite price fields are skipped; the
/// result is sorted by date without duplicates.
pub fn parse_daily_csv(body: &str) -> Result<Vec<Bar>, SourceError> {
    let line_count = body.lines().filter(|line| !line.trim().is_empty()).count();
    if line_count < 2 {
        return Err(SourceError::parse_failed("Stooq response parsing failed."));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut bars: Vec<Bar> = reader
        .records()
        .filter_map(Result::ok)
        .filter(|record| record.len() >= 6)
        .filter_map(|record| {
            let open_time = parse_date_millis(record.get(0)?).ok()?;
            let field = |index: usize| -> Option<f64> {
                let value = record.get(index)?.parse::<f64>().ok()?;
                value.is_finite().then_some(value)
            };
            Bar::new(open_time, field(1)?, field(2)?, field(3)?, field(4)?, field(5)?).ok()
        })
        .collect();

    if bars.is_empty() {
        return Err(SourceError::no_data(ProviderId::Stooq));
    }

    bars.sort_by_key(|bar| bar.open_time);
    bars.dedup_by_key(|bar| bar.open_time);
    Ok(bars)
}

/// Daily-bar adapter for Stooq CSV downloads.
///
/// Fetches one symbol spelling per call; wrap it in
/// [`SymbolFallback`](crate::routing::SymbolFallback) to walk [`symbol_candidates`].
#[derive(Clone)]
pub struct StooqAdapter {
    base_url: String,
    http_client: Arc<dyn HttpClient>,
    timeout_ms: u64,
}

impl StooqAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, config: &FetchConfig) -> Self {
        Self {
            base_url: config.stooq_base_url.clone(),
            http_client,
            timeout_ms: config.timeout_ms,
        }
    }
}

impl DataSource for StooqAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Stooq
    }

    fn bars<'a>(&'a self, req: BarsRequest) -> BarsFuture<'a> {
        Box::pin(async move {
            let plan = daily_plan(&req.timeframe)?;
            let symbol = normalize_symbol(&req.symbol);
            let daily_count = req.limit.saturating_mul(plan.group_size).max(req.limit);

            let request = HttpRequest::get(self.base_url.as_str())
                .with_query("s", &symbol)
                .with_query("i", "d")
                .with_header("Accept", "text/csv")
                .with_timeout_ms(self.timeout_ms);

            let body = fetch_body(self.http_client.as_ref(), request, ProviderId::Stooq).await?;
            let mut daily = parse_daily_csv(&body)?;
            if daily.len() > daily_count {
                daily.drain(..daily.len() - daily_count);
            }

            let bars = resample_fixed_windows(&daily, plan.group_size);
            if bars.is_empty() {
                return Err(SourceError::no_data(ProviderId::Stooq));
            }

            let mut series =
                BarSeries::new(ProviderId::Stooq, symbol.to_ascii_uppercase(), plan.timeframe, bars);
            series.truncate_to_recent(req.limit);
            Ok(series)
        })
    }

    fn symbol_candidates(&self, symbol: &str) -> Vec<String> {
        symbol_candidates(symbol)
    }
}
