//! Terrain streaming driver — walks a focus point across the plane.
//!
//! Usage: cargo run --release --bin stream_terrain -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>    JSON streamer config (flags below override it)
//!   --seed <SEED>      Noise seed string (default: "terrain")
//!   --segments <N>     Samples per world unit (default: 32)
//!   --scale <SCALE>    Noise frequency multiplier (default: 0.2)
//!   --radius <R>       Window half-width in world units (default: 15)
//!   --units <N>        Chunk side length in samples (default: 128)
//!   --steps <N>        Number of focus updates (default: 20)
//!   --step <D>         Focus distance moved per update along +x (default: 2.0)
//!   --parallel         Build chunk bodies on the thread pool

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use glam::DVec2;

use terrastream::core::logging;
use terrastream::terrain::{MemorySink, StreamerConfig, TerrainStreamer};

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let steps = parse_usize_arg(&args, "--steps").unwrap_or(20);
    let step = parse_f64_arg(&args, "--step").unwrap_or(2.0);

    println!("=== Terrain Streamer ===");
    println!("Seed:     {}", config.seed);
    println!("Segments: {}, Scale: {}", config.segments, config.scale);
    println!("Radius:   {}, Units: {}", config.radius, config.units);
    println!("Parallel: {}", config.parallel);
    println!();

    let mut streamer = match TerrainStreamer::new(config, MemorySink::new()) {
        Ok(streamer) => streamer,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    for i in 0..=steps {
        let center = DVec2::new(i as f64 * step, 0.0);
        let summary = streamer.update_focus(center);
        println!(
            "  [{}/{}] focus ({:.1}, {:.1}): +{} -{} chunks, {} loaded, {} instances live",
            i,
            steps,
            center.x,
            center.y,
            summary.generated,
            summary.evicted,
            streamer.chunker().len(),
            streamer.sink().live_instances()
        );
    }

    let elapsed = start.elapsed().as_secs_f64();
    let stats = streamer.stats();
    println!();
    println!("=== Streaming Complete ===");
    println!("Generated: {} chunks", stats.chunks_generated);
    println!("Evicted:   {} chunks", stats.chunks_evicted);
    println!("Instances: {} attached in total", stats.instances_attached);
    println!(
        "Time:      {:.2}s ({:.0} chunks/sec)",
        elapsed,
        stats.chunks_generated as f64 / elapsed.max(f64::EPSILON)
    );

    ExitCode::SUCCESS
}

fn build_config(args: &[String]) -> terrastream::core::Result<StreamerConfig> {
    let mut config = match parse_str_arg(args, "--config") {
        Some(path) => StreamerConfig::load(&PathBuf::from(path))?,
        None => StreamerConfig::default(),
    };

    if let Some(seed) = parse_str_arg(args, "--seed") {
        config.seed = seed;
    }
    if let Some(segments) = parse_u32_arg(args, "--segments") {
        config.segments = segments;
    }
    if let Some(scale) = parse_f64_arg(args, "--scale") {
        config.scale = scale;
    }
    if let Some(radius) = parse_f64_arg(args, "--radius") {
        config.radius = radius;
    }
    if let Some(units) = parse_u32_arg(args, "--units") {
        config.units = units;
    }
    if args.iter().any(|a| a == "--parallel") {
        config.parallel = true;
    }

    config.validate()?;
    Ok(config)
}

fn parse_f64_arg(args: &[String], flag: &str) -> Option<f64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
