//! Rainfall and gravity-driven water redistribution.
//!
//! Each round drops rain on random cells and then runs one flow step. A flow
//! step reads a snapshot of the current depths and writes into a fresh buffer,
//! so the result does not depend on the order cells are visited in:
//!
//! 1. For every wet cell, compute the potential towards each neighbor:
//!    `(elevation + water) - (neighbor elevation + neighbor water)`, clamped at 0
//!    (water never flows uphill).
//! 2. The cell loses an outflow and each neighbor gains a share proportional to
//!    its potential. How large the outflow is depends on [`OutflowMode`].
//! 3. Every cell gathers what its neighbors sent it and the new buffer replaces
//!    the old one.
//!
//! Both phases are data-parallel with rayon; the step boundary is the only
//! synchronisation point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GridError;
use crate::grid::{Adjacency, Direction, Grid};
use crate::heightmap::HeightMap;
use crate::params::WaterParams;
use crate::stats::FieldStats;

/// How much water a cell gives away in one flow step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutflowMode {
    /// The cell loses the full potential sum `S`, even when `S` exceeds its
    /// depth; each neighbor gains `water * potential / S`. Depths can go
    /// negative and mass is not conserved. Matches the legacy output.
    #[default]
    ReplicateReference,
    /// The cell loses `min(S, water)`, split between neighbors in proportion
    /// to their potential. Mass is conserved and depths stay non-negative.
    ClampToAvailable,
}

impl std::fmt::Display for OutflowMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReplicateReference => write!(f, "replicate-reference"),
            Self::ClampToAvailable => write!(f, "clamp-to-available"),
        }
    }
}

/// Shared flag checked between simulation rounds.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What a single cell sends out during one flow step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct CellOutflow {
    /// Amount subtracted from the source cell
    removed: f64,
    /// Amount delivered to each neighbor, indexed by [`Direction::slot`]
    sent: [f64; 4],
}

/// Statistics from a water simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct FlowStats {
    /// Rounds completed (rain + flow)
    pub iterations: usize,
    /// Whether the run stopped early because of a cancel request
    pub cancelled: bool,
    /// Total water added by rain
    pub rain_deposited: f64,
    /// Depth summary of the final field
    pub depth: FieldStats,
}

/// Water depth per cell.
#[derive(Clone, Debug)]
pub struct WaterMap {
    grid: Grid<f64>,
}

impl WaterMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid: Grid::new(width, height),
        }
    }

    pub fn try_new(width: usize, height: usize) -> Result<Self, GridError> {
        Ok(Self {
            grid: Grid::try_new(width, height)?,
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

    pub fn total(&self) -> f64 {
        self.grid.as_slice().iter().sum()
    }

    /// Reset every cell to dry.
    pub fn clear(&mut self) {
        self.grid.fill(0.0);
    }

    /// Add `volume` of water at `(x, y)`. Panics when out of bounds.
    pub fn deposit(&mut self, x: usize, y: usize, volume: f64) {
        self.grid.increment(x, y, volume);
    }

    /// Drop `count` units of rain, each on a uniformly chosen cell.
    pub fn rain(&mut self, count: usize, volume: f64, rng: &mut impl Rng) {
        for _ in 0..count {
            let x = rng.gen_range(0..self.grid.width);
            let y = rng.gen_range(0..self.grid.height);
            self.deposit(x, y, volume);
        }
    }

    /// One redistribution pass over the whole grid.
    pub fn flow_step(&mut self, heights: &HeightMap, outflow: OutflowMode, adjacency: Adjacency) {
        assert_eq!(
            (heights.width(), heights.height()),
            (self.grid.width, self.grid.height),
            "height and water maps must have the same dimensions"
        );

        let outflows = self.compute_outflows(heights.as_slice(), outflow, adjacency);
        let grid = &self.grid;
        let water = grid.as_slice();

        let next: Vec<f64> = (0..water.len())
            .into_par_iter()
            .map(|i| {
                let mut value = water[i] - outflows[i].removed;
                for dir in Direction::ALL {
                    // A neighbor sending towards `dir` sits on the opposite side
                    if let Some(j) = grid.neighbor(i, dir.opposite(), adjacency) {
                        value += outflows[j].sent[dir.slot()];
                    }
                }
                value
            })
            .collect();

        self.grid.replace_cells(next);
    }

    fn compute_outflows(&self, elevation: &[f64], mode: OutflowMode, adjacency: Adjacency) -> Vec<CellOutflow> {
        let grid = &self.grid;
        let water = grid.as_slice();

        (0..water.len())
            .into_par_iter()
            .map(|i| cell_outflow(grid, elevation, i, mode, adjacency))
            .collect()
    }

    /// Run the configured number of rain + flow rounds.
    pub fn generate(&mut self, heights: &HeightMap, params: &WaterParams, rng: &mut impl Rng) -> FlowStats {
        self.generate_with_cancel(heights, params, rng, &CancelToken::new())
    }

    /// Like [`WaterMap::generate`], stopping at the next round boundary once
    /// `cancel` is set.
    pub fn generate_with_cancel(
        &mut self,
        heights: &HeightMap,
        params: &WaterParams,
        rng: &mut impl Rng,
        cancel: &CancelToken,
    ) -> FlowStats {
        assert!(
            heights.is_generated(),
            "water simulation requires a generated height map"
        );

        let mut iterations = 0;
        let mut rain_deposited = 0.0;
        let mut cancelled = false;

        for i in 0..params.iterations {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            debug!(iteration = i, "rain and flow");
            self.rain(params.drops_per_iteration, params.drop_volume, rng);
            rain_deposited += params.drops_per_iteration as f64 * params.drop_volume;
            self.flow_step(heights, params.outflow, params.adjacency);
            iterations += 1;
        }

        let depth = FieldStats::from_values(self.grid.as_slice(), 16);
        info!(
            iterations,
            cancelled,
            total = depth.total,
            max_depth = depth.max,
            negative_cells = depth.negative_cells,
            "water simulation finished"
        );

        FlowStats {
            iterations,
            cancelled,
            rain_deposited,
            depth,
        }
    }

    /// Magenta pixels scaled by depth, row-major.
    pub fn as_rgb(&self) -> Vec<[u8; 3]> {
        self.grid.as_slice().iter().map(|&d| water_to_rgb(d)).collect()
    }
}

fn cell_outflow(
    grid: &Grid<f64>,
    elevation: &[f64],
    i: usize,
    mode: OutflowMode,
    adjacency: Adjacency,
) -> CellOutflow {
    let water = grid.as_slice();
    let depth = water[i];
    if depth == 0.0 {
        return CellOutflow::default();
    }

    let level = elevation[i] + depth;
    let mut potentials = [0.0f64; 4];
    let mut sum = 0.0;
    for dir in Direction::ALL {
        if let Some(j) = grid.neighbor(i, dir, adjacency) {
            let potential = (level - (elevation[j] + water[j])).max(0.0);
            potentials[dir.slot()] = potential;
            sum += potential;
        }
    }

    if sum <= 0.0 {
        return CellOutflow::default();
    }

    let (removed, budget) = match mode {
        OutflowMode::ReplicateReference => (sum, depth),
        OutflowMode::ClampToAvailable => {
            let available = sum.min(depth.max(0.0));
            (available, available)
        }
    };

    let mut sent = [0.0f64; 4];
    for (out, potential) in sent.iter_mut().zip(potentials) {
        *out = budget * (potential / sum);
    }

    CellOutflow { removed, sent }
}

pub fn water_to_rgb(depth: f64) -> [u8; 3] {
    let v = (depth * 255.0) as u8;
    [v, 0, v]
}
