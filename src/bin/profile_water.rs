//! Profiling tool for elevation generation and the flow step

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use map_generator::noise_source::SimplexFbm;
use map_generator::{HeightMap, WaterMap, WorldParams};

fn main() {
    let width = 1000;
    let height = 1000;
    let seed = 1337u64;
    let params = WorldParams::default();

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", width, height, width * height);
    println!();

    let start = Instant::now();
    let mut heights = HeightMap::new(width, height);
    heights.generate(&SimplexFbm::new(seed as u32), &params.height);
    let height_time = start.elapsed();
    println!("Height generation: {:?}", height_time);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut water = WaterMap::new(width, height);
    let mut rain_time = Duration::ZERO;
    let mut flow_time = Duration::ZERO;

    for i in 0..params.water.iterations {
        let start = Instant::now();
        water.rain(params.water.drops_per_iteration, params.water.drop_volume, &mut rng);
        rain_time += start.elapsed();

        let start = Instant::now();
        water.flow_step(&heights, params.water.outflow, params.water.adjacency);
        let step = start.elapsed();
        flow_time += step;
        println!("  Flow step {:>2}: {:?}", i, step);
    }

    let total = height_time + rain_time + flow_time;
    println!("\n=== Summary ===");
    println!("Heights: {:>8.2}% ({:?})", 100.0 * height_time.as_secs_f64() / total.as_secs_f64(), height_time);
    println!("Rain:    {:>8.2}% ({:?})", 100.0 * rain_time.as_secs_f64() / total.as_secs_f64(), rain_time);
    println!("Flow:    {:>8.2}% ({:?})", 100.0 * flow_time.as_secs_f64() / total.as_secs_f64(), flow_time);
    println!("Total water: {:.1}", water.total());
}
