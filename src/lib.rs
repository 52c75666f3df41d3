//! Terrain and water map generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod error;
pub mod grid;
pub mod heightmap;
pub mod hypsography;
pub mod noise_source;
pub mod params;
pub mod render;
pub mod stats;
pub mod water;
pub mod world;

pub use error::{Error, Result};
pub use grid::{Adjacency, Grid};
pub use heightmap::HeightMap;
pub use params::{HeightParams, WaterParams, WorldParams};
pub use render::{PngRenderer, Renderer};
pub use water::{CancelToken, FlowStats, OutflowMode, WaterMap};
pub use world::{World, WorldReport};
