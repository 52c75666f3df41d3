//! Elevation field generation.
//!
//! Every cell samples fractal noise at `(x / scale, y / scale)`; the whole batch
//! of raw samples is then remapped through the hypsometric curve so the final
//! values lie in `[0, 1]` with a realistic distribution of low and high ground.

use rayon::prelude::*;
use tracing::debug;

use crate::error::GridError;
use crate::grid::Grid;
use crate::hypsography;
use crate::noise_source::NoiseSource;
use crate::params::HeightParams;

/// Normalised elevation per cell, `0.0` lowest and `1.0` highest.
#[derive(Clone, Debug)]
pub struct HeightMap {
    grid: Grid<f64>,
    generated: bool,
}

impl HeightMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
            generated: false,
        }
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::try_new(width, height)?,
            generated: false,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn grid(&self) -> &Grid<f64> {
        &self.grid
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        *self.grid.get(x, y)
    }

    pub fn as_slice(&self) -> &[f64] {
        self.grid.as_slice()
    }

    /// Whether [`HeightMap::generate`] has populated the field.
    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Sample noise for every cell, then remap the batch to elevations.
    pub fn generate(&mut self, noise: &impl NoiseSource, params: &HeightParams) {
        let raw = self.sample_noise(noise, params);
        let elevations = hypsography::height_from_noise(&raw);
        self.grid.replace_cells(elevations);
        self.generated = true;

        debug!(
            width = self.grid.width,
            height = self.grid.height,
            "elevation field generated"
        );
    }

    /// Raw noise per cell in row-major order.
    fn sample_noise(&self, noise: &impl NoiseSource, params: &HeightParams) -> Vec<f64> {
        let width = self.grid.width;
        let mut raw = vec![0.0; self.grid.len()];
        raw.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            let ny = y as f64 / params.scale;
            for (x, cell) in row.iter_mut().enumerate() {
                let nx = x as f64 / params.scale;
                *cell = noise.sample(nx, ny, params.octaves, params.persistence, params.lacunarity);
            }
        });
        raw
    }

    /// Grayscale pixels, row-major.
    pub fn as_rgb(&self) -> Vec<[u8; 3]> {
        self.grid.as_slice().iter().map(|&h| height_to_rgb(h)).collect()
    }
}

pub fn height_to_rgb(height: f64) -> [u8; 3] {
    let v = (height * 255.0) as u8;
    [v, v, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(x: f64, _y: f64, _octaves: u32, _persistence: f64, _lacunarity: f64) -> f64 {
        x - 0.5
    }

    #[test]
    fn test_generate_values_in_unit_range() {
        let mut hm = HeightMap::new(16, 8);
        assert!(!hm.is_generated());
        let params = HeightParams { scale: 16.0, ..Default::default() };
        hm.generate(&ramp, &params);
        assert!(hm.is_generated());
        assert!(hm.as_slice().iter().all(|h| (0.0..=1.0).contains(h)));
    }

    #[test]
    fn test_generate_uses_scaled_coordinates() {
        // Noise returning the sampled coordinate lets us see what was asked for
        let echo = |x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64| {
            assert_eq!(octaves, 4);
            assert_eq!(persistence, 0.5);
            assert_eq!(lacunarity, 2.0);
            x * 1000.0 + y
        };
        let params = HeightParams { scale: 2.0, ..Default::default() };
        let hm = HeightMap::new(4, 2);
        let raw = hm.sample_noise(&echo, &params);
        assert_eq!(raw[hm.grid().coords_to_index(3, 1)], 1.5 * 1000.0 + 0.5);
        assert_eq!(raw[hm.grid().coords_to_index(0, 0)], 0.0);
    }

    #[test]
    fn test_zero_noise_gives_median_elevation() {
        let flat = |_: f64, _: f64, _: u32, _: f64, _: f64| 0.0;
        let mut hm = HeightMap::new(3, 3);
        hm.generate(&flat, &HeightParams::default());
        for (_, _, &h) in hm.grid().iter() {
            assert!((h - 0.4).abs() < 1e-12);
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let noise = crate::noise_source::SimplexFbm::new(11);
        let params = HeightParams { scale: 20.0, ..Default::default() };
        let mut a = HeightMap::new(32, 24);
        let mut b = HeightMap::new(32, 24);
        a.generate(&noise, &params);
        b.generate(&noise, &params);
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_height_to_rgb() {
        assert_eq!(height_to_rgb(0.0), [0, 0, 0]);
        assert_eq!(height_to_rgb(1.0), [255, 255, 255]);
        assert_eq!(height_to_rgb(0.5), [127, 127, 127]);
    }
}
