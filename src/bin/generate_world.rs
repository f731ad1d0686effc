//! World generator binary — pre-generates a full world to disk.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --name <NAME>     World name / output directory (default: "world")
//!   --seed <SEED>     Generation seed (default: 12345)
//!   --width <W>       World width in blocks (default: 256)
//!   --height <H>      World height in blocks (default: 64)
//!   --depth <D>       World depth in blocks (default: 256)
//!   --budget <N>      Blocks generated per step (default: 65536)
//!
//! Output structure:
//!   worlds/<name>/
//!     world.json              # World metadata
//!     chunks/                 # Raw chunk payloads
//!       chunk_0_0_0.bin
//!       ...

use std::path::PathBuf;
use std::time::Instant;

use cubeworld::persist::chunk_store::ChunkStore;
use cubeworld::persist::world_meta::save_world_meta;
use cubeworld::terrain::generator::WorldGenJob;
use cubeworld::world::world::{GameMode, WorldMeta, WorldSize};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let name = parse_str_arg(&args, "--name").unwrap_or_else(|| "world".to_string());
    let seed = parse_i32_arg(&args, "--seed").unwrap_or(12345);
    let width = parse_i32_arg(&args, "--width").unwrap_or(256);
    let height = parse_i32_arg(&args, "--height").unwrap_or(64);
    let depth = parse_i32_arg(&args, "--depth").unwrap_or(256);
    let budget = parse_u64_arg(&args, "--budget").unwrap_or(65536);

    let output_dir = PathBuf::from(format!("worlds/{}", name));

    println!("=== Cubeworld World Generator ===");
    println!("World:  {}", name);
    println!("Size:   {} x {} x {} blocks", width, height, depth);
    println!("Seed:   {}", seed);
    println!("Output: {}", output_dir.display());
    println!();

    let meta = WorldMeta::new(
        name.clone(),
        GameMode::Sandbox,
        WorldSize { width, height, depth },
        seed,
    );
    if let Err(e) = save_world_meta(&output_dir, &meta) {
        eprintln!("failed to write world metadata: {}", e);
        std::process::exit(1);
    }

    let store = ChunkStore::new(&output_dir);
    let mut job = WorldGenJob::new(&meta);
    let start = Instant::now();
    let mut last_report = 0u32;

    while !job.is_complete() {
        if let Err(e) = job.step(&store, budget) {
            eprintln!("generation failed: {}", e);
            std::process::exit(1);
        }
        let percent = (job.progress() * 100.0) as u32;
        if percent >= last_report + 10 {
            last_report = percent - percent % 10;
            let elapsed = start.elapsed().as_secs_f64();
            eprintln!("  [{:>3}%] {:.1}s elapsed", percent, elapsed);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Generation Complete ===");
    println!("Chunks: {} in {:.1}s", job.total_chunks(), elapsed.as_secs_f64());
    println!("Output: {}", output_dir.display());
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
