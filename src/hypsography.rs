//! Remaps raw noise samples onto a realistic elevation distribution.
//!
//! Two stages, applied element-wise:
//! 1. [`to_uniform`] squashes an approximately Gaussian noise sample into an
//!    approximately uniform value in `[0, 1]` using the error function.
//! 2. [`to_elevation`] treats that value as a quantile and looks it up in a
//!    fixed hypsometric curve (piecewise linear, clamped at both ends).
//!
//! The curve is skewed towards low ground: most of the map ends up below 0.6.

/// Spread of the raw noise distribution fed to the error function.
pub const SIGMA: f64 = 0.26;
/// Expected half-range of the raw noise samples.
pub const RANGE: f64 = 1.4;

/// Quantile axis of the hypsometric curve. Strictly increasing.
pub const QUANTILES: [f64; 27] = [
    0.0, 0.01, 0.02, 0.06, 0.1, 0.15, 0.2, 0.25, 0.3, 0.31, 0.33, 0.35, 0.4, 0.45, 0.5, 0.6, 0.65,
    0.7, 0.75, 0.8, 0.85, 0.9, 0.95, 0.97, 0.98, 0.99, 1.0,
];

/// Elevation axis of the hypsometric curve. Non-increasing along the quantiles.
pub const ELEVATIONS: [f64; 27] = [
    1.0, 0.76, 0.66, 0.61, 0.58, 0.57, 0.56, 0.56, 0.56, 0.55, 0.54, 0.53, 0.47, 0.43, 0.4, 0.37,
    0.35, 0.34, 0.34, 0.33, 0.33, 0.32, 0.3, 0.28, 0.24, 0.15, 0.0,
];

/// Map a raw noise sample to `[0, 1]`. Decreasing in `value`.
pub fn to_uniform(value: f64) -> f64 {
    let spread = libm::erf((value / RANGE) / SIGMA);
    -0.5 * spread + 0.5
}

/// Interpolate `quantile` against the hypsometric curve.
///
/// Inputs below the first quantile or above the last one yield the first or
/// last elevation respectively.
pub fn to_elevation(quantile: f64) -> f64 {
    interp(quantile, &QUANTILES, &ELEVATIONS)
}

/// Run both stages over a batch of raw samples, producing a new buffer.
pub fn height_from_noise(samples: &[f64]) -> Vec<f64> {
    samples
        .iter()
        .map(|&v| to_elevation(to_uniform(v)))
        .collect()
}

/// Piecewise-linear interpolation over increasing `xp`, clamped at the ends.
fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    let last = xp.len() - 1;
    if x.is_nan() {
        return x;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[last] {
        return fp[last];
    }

    // First control point strictly greater than x
    let hi = xp.partition_point(|&q| q <= x);
    let lo = hi - 1;
    let t = (x - xp[lo]) / (xp[hi] - xp[lo]);
    fp[lo] + t * (fp[hi] - fp[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        assert_eq!(QUANTILES.len(), 27);
        assert_eq!(ELEVATIONS.len(), 27);
        assert!(QUANTILES.windows(2).all(|w| w[0] < w[1]));
        assert!(ELEVATIONS.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_to_uniform_range() {
        for &v in &[-1e9, -10.0, -1.0, -0.3, 0.0, 0.1, 0.5, 1.0, 3.0, 1e9] {
            let u = to_uniform(v);
            assert!((0.0..=1.0).contains(&u), "to_uniform({}) = {}", v, u);
        }
        assert!((to_uniform(0.0) - 0.5).abs() < 1e-12);
        // Decreasing in the input
        assert!(to_uniform(-0.2) > to_uniform(0.2));
    }

    #[test]
    fn test_to_elevation_hits_control_points() {
        for (q, e) in QUANTILES.iter().zip(ELEVATIONS.iter()) {
            assert!((to_elevation(*q) - e).abs() < 1e-12, "quantile {}", q);
        }
        // Midway between 0.0 -> 1.0 and 0.01 -> 0.76
        assert!((to_elevation(0.005) - 0.88).abs() < 1e-12);
    }

    #[test]
    fn test_to_elevation_clamps_and_is_monotonic() {
        assert_eq!(to_elevation(-0.5), 1.0);
        assert_eq!(to_elevation(1.5), 0.0);

        let mut previous = to_elevation(0.0);
        for step in 1..=1000 {
            let e = to_elevation(step as f64 / 1000.0);
            assert!((0.0..=1.0).contains(&e));
            assert!(e <= previous + 1e-12, "curve rose at quantile {}", step);
            previous = e;
        }
    }

    #[test]
    fn test_height_from_noise_preserves_length_and_order() {
        let samples = vec![-0.8, -0.1, 0.0, 0.2, 0.9];
        let heights = height_from_noise(&samples);
        assert_eq!(heights.len(), samples.len());
        assert!(heights.iter().all(|h| (0.0..=1.0).contains(h)));
        // Both stages decrease, so the composition rises with the noise value
        assert!(heights.windows(2).all(|w| w[0] <= w[1]));
        // Zero noise sits at the median quantile
        assert!((heights[2] - 0.4).abs() < 1e-12);
    }
}
