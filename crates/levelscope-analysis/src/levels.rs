//! Structural support/resistance levels.
//!
//! Levels carry only a price and a provenance note. Whether a level is
//! support or resistance depends on the price it is viewed from, so that is
//! computed by [`Level::kind_at`] rather than stored.

use levelscope_core::Bar;

use crate::config::{LevelConfig, RoundingTable, TimeframeProfile};
use crate::format::round_to_step;
use crate::payload::LevelKind;

const NOTE_SEPARATOR: &str = " • ";

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub price: f64,
    pub note: Option<String>,
}

impl Level {
    pub fn new(price: f64, note: impl Into<String>) -> Self {
        Self {
            price,
            note: Some(note.into()),
        }
    }

    pub fn kind_at(&self, current: f64) -> LevelKind {
        if self.price <= current {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        }
    }

    fn priority(&self) -> u8 {
        let note = self.note.as_deref().unwrap_or_default().to_lowercase();
        if note.contains("swing") || note.contains("recent") {
            5
        } else if note.contains("pivot") {
            4
        } else if note.contains("fib retracement") {
            3
        } else if note.contains("fib extension") {
            2
        } else {
            1
        }
    }
}

/// Swing highs and lows in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Swings {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

/// Finds bars whose high (low) strictly exceeds (undercuts) every other bar
/// within `radius` on both sides.
pub fn find_swings(bars: &[Bar], radius: usize) -> Swings {
    let mut swings = Swings::default();
    if bars.len() <= radius * 2 {
        return swings;
    }

    for i in radius..bars.len() - radius {
        let pivot = bars[i];
        let neighbours = bars[i - radius..=i + radius]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != radius)
            .map(|(_, bar)| bar);

        let (mut is_high, mut is_low) = (true, true);
        for bar in neighbours {
            is_high &= bar.high < pivot.high;
            is_low &= bar.low > pivot.low;
            if !is_high && !is_low {
                break;
            }
        }
        if is_high {
            swings.highs.push(pivot.high);
        }
        if is_low {
            swings.lows.push(pivot.low);
        }
    }
    swings
}

/// Groups sorted values whose distance from the running cluster mean is
/// within `tolerance` (relative), then rounds each cluster mean to `step`.
pub fn cluster_levels(values: &[f64], tolerance: f64, step: f64) -> Vec<f64> {
    let mut sorted: Vec<f64> = values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .collect();
    sorted.sort_by(f64::total_cmp);

    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for value in sorted {
        match clusters.last_mut() {
            Some(cluster) if (value - mean(cluster)).abs() / mean(cluster) <= tolerance => {
                cluster.push(value);
            }
            _ => clusters.push(vec![value]),
        }
    }

    let mut representatives: Vec<f64> = clusters
        .iter()
        .map(|cluster| round_to_step(mean(cluster), step))
        .collect();
    representatives.dedup();
    representatives
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Clustered swing levels from the most recent swing points.
pub fn swing_levels(
    bars: &[Bar],
    current: f64,
    profile: &TimeframeProfile,
    config: &LevelConfig,
    rounding: &RoundingTable,
) -> Vec<Level> {
    let swings = find_swings(bars, profile.swing_radius);
    let step = rounding.step_for(current);

    let lows = cluster_levels(
        tail(&swings.lows, profile.recent_swings),
        config.cluster_tolerance,
        step,
    );
    let highs = cluster_levels(
        tail(&swings.highs, profile.recent_swings),
        config.cluster_tolerance,
        step,
    );

    let levels = label_swing_clusters(&lows, &highs, current, config.swing_candidates);
    compact_levels(levels, current, config, rounding)
}

/// Notes each cluster by where it sits relative to `current` and keeps the
/// `keep` highest-priced ones.
fn label_swing_clusters(lows: &[f64], highs: &[f64], current: f64, keep: usize) -> Vec<Level> {
    let low_note = |price: f64| {
        if price <= current {
            "swing low cluster"
        } else {
            "prior swing low (overhead)"
        }
    };
    let high_note = |price: f64| {
        if price >= current {
            "swing high cluster"
        } else {
            "prior swing high (below)"
        }
    };

    let mut levels: Vec<Level> = lows
        .iter()
        .map(|&price| Level::new(price, low_note(price)))
        .chain(highs.iter().map(|&price| Level::new(price, high_note(price))))
        .collect();
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));
    levels.split_off(levels.len().saturating_sub(keep))
}

fn tail(values: &[f64], count: usize) -> &[f64] {
    &values[values.len().saturating_sub(count)..]
}

/// Extremes of the most recent window of bars.
pub fn micro_levels(
    bars: &[Bar],
    current: f64,
    profile: &TimeframeProfile,
    config: &LevelConfig,
    rounding: &RoundingTable,
) -> Vec<Level> {
    if bars.len() < config.micro_min_bars || profile.micro_lookback == 0 {
        return Vec::new();
    }
    let window = profile.micro_lookback.min(bars.len());
    let recent = &bars[bars.len() - window..];
    let low = recent.iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min);
    let high = recent
        .iter()
        .map(|bar| bar.high)
        .fold(f64::NEG_INFINITY, f64::max);
    let step = rounding.step_for(current);

    let mut levels = Vec::with_capacity(2);
    if low.is_finite() && low > 0.0 {
        levels.push(Level::new(
            round_to_step(low, step),
            format!("recent {window}-bar low"),
        ));
    }
    if high.is_finite() && high > 0.0 {
        levels.push(Level::new(
            round_to_step(high, step),
            format!("recent {window}-bar high"),
        ));
    }
    levels
}

/// Floor-trader pivots from the second-most-recent bar.
pub fn pivot_levels(bars: &[Bar], current: f64, rounding: &RoundingTable) -> Vec<Level> {
    let Some(prev) = bars.len().checked_sub(2).map(|i| bars[i]) else {
        return Vec::new();
    };
    if prev.high <= prev.low || prev.low <= 0.0 {
        return Vec::new();
    }

    let pivot = (prev.high + prev.low + prev.close) / 3.0;
    let range = prev.high - prev.low;
    let step = rounding.step_for(current);
    [
        (pivot, "Pivot"),
        (2.0 * pivot - prev.low, "Pivot R1"),
        (2.0 * pivot - prev.high, "Pivot S1"),
        (pivot + range, "Pivot R2"),
        (pivot - range, "Pivot S2"),
    ]
    .into_iter()
    .filter(|(price, _)| price.is_finite() && *price > 0.0)
    .map(|(price, note)| Level::new(round_to_step(price, step), note))
    .collect()
}

/// Combines two level sets and compacts the result.
pub fn merge_levels(
    base: Vec<Level>,
    extra: Vec<Level>,
    current: f64,
    config: &LevelConfig,
    rounding: &RoundingTable,
) -> Vec<Level> {
    let mut combined = base;
    combined.extend(extra);
    compact_levels(combined, current, config, rounding)
}

/// Full level derivation: swing clusters merged with micro and pivot levels.
pub fn derive_levels(
    bars: &[Bar],
    current: f64,
    profile: &TimeframeProfile,
    config: &LevelConfig,
    rounding: &RoundingTable,
) -> Vec<Level> {
    let base = swing_levels(bars, current, profile, config, rounding);
    let mut extra = micro_levels(bars, current, profile, config, rounding);
    extra.extend(pivot_levels(bars, current, rounding));
    merge_levels(base, extra, current, config, rounding)
}

/// Drops far levels, merges near-duplicates and caps the count.
///
/// Output is sorted by ascending price.
pub fn compact_levels(
    levels: Vec<Level>,
    current: f64,
    config: &LevelConfig,
    rounding: &RoundingTable,
) -> Vec<Level> {
    let mut candidates: Vec<Level> = levels
        .into_iter()
        .filter(|level| level.price.is_finite() && level.price > 0.0)
        .filter(|level| {
            current <= 0.0 || (level.price - current).abs() / current <= config.max_distance_pct
        })
        .collect();
    candidates.sort_by(|a, b| a.price.total_cmp(&b.price));

    let tolerance = (current.abs() * config.merge_pct)
        .max(rounding.step_for(current) * config.merge_step_multiple);

    let mut clusters: Vec<Vec<Level>> = Vec::new();
    for level in candidates {
        match clusters.last_mut() {
            Some(cluster)
                if cluster
                    .last()
                    .is_some_and(|last| (level.price - last.price).abs() <= tolerance) =>
            {
                cluster.push(level);
            }
            _ => clusters.push(vec![level]),
        }
    }

    let merged = clusters
        .into_iter()
        .filter_map(|cluster| collapse_cluster(cluster, current, config.max_note_fragments))
        .collect();
    cap_levels(merged, current, config.max_levels)
}

fn collapse_cluster(mut cluster: Vec<Level>, current: f64, max_fragments: usize) -> Option<Level> {
    if cluster.len() <= 1 {
        return cluster.pop();
    }

    let mut best = 0;
    for (i, level) in cluster.iter().enumerate().skip(1) {
        let incumbent = &cluster[best];
        let better_priority = level.priority() > incumbent.priority();
        let closer = level.priority() == incumbent.priority()
            && (level.price - current).abs() < (incumbent.price - current).abs();
        if better_priority || closer {
            best = i;
        }
    }

    let representative = cluster.remove(best);
    let notes = std::iter::once(&representative)
        .chain(cluster.iter())
        .filter_map(|level| level.note.as_deref());
    let note = merge_notes(notes, max_fragments).or_else(|| representative.note.clone());

    Some(Level {
        price: representative.price,
        note,
    })
}

/// Splits notes into fragments, drops case-insensitive duplicates and
/// fragments contained in a longer one, and keeps at most `max` of them.
pub fn merge_notes<'a>(notes: impl Iterator<Item = &'a str>, max: usize) -> Option<String> {
    let mut fragments: Vec<&str> = Vec::new();
    for fragment in notes
        .flat_map(|note| note.split('•'))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
    {
        if !fragments.iter().any(|kept| kept.eq_ignore_ascii_case(fragment)) {
            fragments.push(fragment);
        }
    }

    let lowered: Vec<String> = fragments.iter().map(|f| f.to_lowercase()).collect();
    let kept: Vec<&str> = fragments
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            !lowered
                .iter()
                .any(|other| other.len() > lowered[*i].len() && other.contains(lowered[*i].as_str()))
        })
        .map(|(_, fragment)| *fragment)
        .take(max)
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(NOTE_SEPARATOR))
    }
}

/// Keeps the levels nearest to `current`, balanced above and below.
fn cap_levels(levels: Vec<Level>, current: f64, max: usize) -> Vec<Level> {
    if levels.len() <= max {
        return levels;
    }

    let (below, above): (Vec<Level>, Vec<Level>) =
        levels.into_iter().partition(|level| level.price <= current);
    let above_take = above.len().min(max - below.len().min(max / 2));
    let below_take = below.len().min(max - above_take);

    let mut kept: Vec<Level> = below[below.len() - below_take..].to_vec();
    kept.extend(above.into_iter().take(above_take));
    kept.sort_by(|a, b| a.price.total_cmp(&b.price));
    kept
}
