//! Coherent noise sampling used to seed the elevation field.

use noise::{NoiseFn, Simplex};

/// Deterministic 2D fractal noise. Output is roughly in `[-1, 1]`.
pub trait NoiseSource: Sync {
    fn sample(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, u32, f64, f64) -> f64 + Sync,
{
    fn sample(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        self(x, y, octaves, persistence, lacunarity)
    }
}

/// Simplex noise summed over octaves (fractional Brownian motion).
#[derive(Clone, Debug)]
pub struct SimplexFbm {
    simplex: Simplex,
}

impl SimplexFbm {
    pub fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
        }
    }
}

impl Default for SimplexFbm {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseSource for SimplexFbm {
    /// Octaves are weighted by `persistence^k` at frequency `lacunarity^k`,
    /// and the sum is divided by the total weight to stay near `[-1, 1]`.
    fn sample(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let (sum, weight, _, _) = (0..octaves.max(1)).fold(
            (0.0, 0.0, 1.0, 1.0),
            |(sum, weight, amplitude, frequency), _| {
                let value = self.simplex.get([x * frequency, y * frequency]);
                (
                    sum + amplitude * value,
                    weight + amplitude,
                    amplitude * persistence,
                    frequency * lacunarity,
                )
            },
        );
        sum / weight
    }
}
