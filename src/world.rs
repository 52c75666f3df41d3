//! World container module
//!
//! Owns the elevation and water fields for one generation run and enforces
//! that elevation is finished before any water is simulated.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::Result;
use crate::heightmap::HeightMap;
use crate::noise_source::{NoiseSource, SimplexFbm};
use crate::params::WorldParams;
use crate::render::Renderer;
use crate::stats::FieldStats;
use crate::water::{CancelToken, FlowStats, WaterMap};

/// Outcome of a generation run
#[derive(Clone, Debug)]
pub struct WorldReport {
    /// Seed actually used (generated when none was given)
    pub seed: u64,
    pub elevation: FieldStats,
    pub water: FlowStats,
}

/// Elevation and water fields of identical dimensions
pub struct World {
    pub width: usize,
    pub height: usize,
    pub height_map: HeightMap,
    pub water_map: WaterMap,
}

impl World {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            height_map: HeightMap::new(width, height),
            water_map: WaterMap::new(width, height),
        }
    }

    /// Fails with a grid error when either dimension is zero.
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            width,
            height,
            height_map: HeightMap::try_new(width, height)?,
            water_map: WaterMap::try_new(width, height)?,
        })
    }

    /// Generate elevation then water. `None` picks a fresh seed.
    ///
    /// The rain generator takes the full 64-bit seed; the noise source takes
    /// [`noise_seed`] of it.
    pub fn generate(&mut self, seed: Option<u64>, params: &WorldParams) -> WorldReport {
        let seed = seed.unwrap_or_else(rand::random);
        let noise = SimplexFbm::new(noise_seed(seed));
        self.generate_with_noise(seed, &noise, params, &CancelToken::new())
    }

    /// Generate with a caller-supplied noise source.
    pub fn generate_with_noise(
        &mut self,
        seed: u64,
        noise: &impl NoiseSource,
        params: &WorldParams,
        cancel: &CancelToken,
    ) -> WorldReport {
        info!(seed, width = self.width, height = self.height, "generating world");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        self.height_map.generate(noise, &params.height);
        let elevation = FieldStats::from_values(self.height_map.as_slice(), 20);
        info!(
            min = elevation.min,
            max = elevation.max,
            mean = elevation.mean,
            "elevation ready"
        );

        self.water_map.clear();
        let water = self
            .water_map
            .generate_with_cancel(&self.height_map, &params.water, &mut rng, cancel);

        WorldReport { seed, elevation, water }
    }

    /// Write `height` and `water` images.
    pub fn render(&self, renderer: &impl Renderer) -> Result<()> {
        renderer.render("height", self.width, self.height, &self.height_map.as_rgb())?;
        renderer.render("water", self.width, self.height, &self.water_map.as_rgb())?;
        Ok(())
    }
}

/// Fold a 64-bit seed into the 32 bits the noise source accepts, so the
/// upper half still changes the terrain.
pub fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}
