//! Tick-size price normalization.
//!
//! Prices sent to the terminal must be whole multiples of the instrument's
//! tick size. [`normalize_to_tick`] snaps a value to the nearest multiple:
//!
//! ```text
//! normalized = round(value / tick_size) * tick_size
//! ```
//!
//! `f64::round` rounds half **away from zero**, so a value exactly half a tick
//! above a multiple moves up (and half a tick below a negative multiple moves
//! down). A non-positive tick size means "unknown" and leaves the value as is.

/// Snap `value` to the nearest multiple of `tick_size`.
#[inline]
pub fn normalize_to_tick(value: f64, tick_size: f64) -> f64 {
    if tick_size <= 0.0 {
        return value;
    }
    (value / tick_size).round() * tick_size
}

/// Snap an optional level; `None` stays `None`.
#[inline]
pub fn normalize_level(value: Option<f64>, tick_size: f64) -> Option<f64> {
    value.map(|v| normalize_to_tick(v, tick_size))
}

/// Whether `value` lies on the tick grid, within floating-point noise.
pub fn is_tick_aligned(value: f64, tick_size: f64) -> bool {
    if tick_size <= 0.0 {
        return true;
    }
    let steps = value / tick_size;
    (steps - steps.round()).abs() <= 1e-6_f64.max(steps.abs() * 1e-12)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK_SIZES: &[f64] = &[0.5, 0.25, 0.01, 0.1, 1.0, 5.0, 0.00001];

    fn sample_prices() -> Vec<f64> {
        let mut prices = vec![0.0, 1.0, 0.3, 26399.75, 91000.26, 93000.0, 1.23456789];
        let mut x = 0.137_f64;
        for _ in 0..200 {
            x = (x * 7919.0 + 0.61803) % 100_000.0;
            prices.push(x);
        }
        prices
    }

    #[test]
    fn normalized_stays_within_half_a_tick() {
        for &tick in TICK_SIZES {
            for p in sample_prices() {
                let n = normalize_to_tick(p, tick);
                assert!((n - p).abs() <= tick / 2.0 + 1e-9, "p={p} tick={tick} n={n}");
                assert!(is_tick_aligned(n, tick), "p={p} tick={tick} n={n}");
            }
        }
    }

    #[test]
    fn non_positive_tick_is_identity() {
        for tick in [0.0, -0.5, -1.0] {
            for p in sample_prices() {
                assert_eq!(normalize_to_tick(p, tick), p);
            }
        }
    }

    #[test]
    fn half_tick_rounds_away_from_zero() {
        assert_eq!(normalize_to_tick(100.25, 0.5), 100.5);
        assert_eq!(normalize_to_tick(100.75, 0.5), 101.0);
        assert_eq!(normalize_to_tick(-100.25, 0.5), -100.5);
        assert_eq!(normalize_to_tick(2.5, 1.0), 3.0);
    }

    #[test]
    fn sell_levels_on_half_point_grid() {
        assert_eq!(normalize_to_tick(93000.0, 0.5), 93000.0);
        assert_eq!(normalize_to_tick(90000.0, 0.5), 90000.0);
        assert_eq!(normalize_level(None, 0.5), None);
        assert_eq!(normalize_level(Some(91000.3), 0.5), Some(91000.5));
    }
}
