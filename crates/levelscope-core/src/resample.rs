//! Fixed-window resampling of daily bars into coarser bars.

use crate::Bar;

/// Collapses consecutive windows of `group_size` bars into one bar each.
///
/// Windows start at the first bar; a trailing partial window is dropped. Each
/// window keeps the first open time and open, the last close, the extreme
/// high/low and the summed volume. `group_size <= 1` returns the input as is,
/// fewer bars than one window returns nothing.
pub fn resample_fixed_windows(bars: &[Bar], group_size: usize) -> Vec<Bar> {
    if group_size <= 1 {
        return bars.to_vec();
    }

    bars.chunks_exact(group_size)
        .filter_map(|window| {
            let first = window.first()?;
            let last = window.last()?;
            Some(window.iter().skip(1).fold(
                Bar {
                    close: last.close,
                    ..*first
                },
                |acc, bar| Bar {
                    high: acc.high.max(bar.high),
                    low: acc.low.min(bar.low),
                    volume: acc.volume + bar.volume,
                    ..acc
                },
            ))
        })
        .collect()
}
