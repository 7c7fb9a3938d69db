//! `swifco-run` — run one ASF fence scenario from environment configuration.
//!
//! Run with:
//!   INPUT_MAP=habitat.tif COMPUTED_AREA='[4_506_779, 3_052_929, 4_855_174, 3_353_689]' \
//!   RELEASE_COORDS='[4_650_000, 3_200_000]' OUTPUT_DIR=out \
//!   cargo run -p sw-run --release
//!
//! Set `RUST_LOG=info` (or `debug`) for progress logs.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use memory_stats::memory_stats;

use sw_run::{Orchestrator, RunConfig};

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = RunConfig::from_env().context("reading configuration")?;
    println!("=== swifco-run ===");
    println!(
        "Map: {}  |  Area: {}  |  Ticks: {}  |  Seed: {}",
        config.input_map.display(),
        config.computed_area,
        config.scenario.num_ticks,
        config.seed,
    );
    println!("mem[startup]              {:.0} MB", mem_mb());

    let mut orchestrator = Orchestrator::new(config);
    orchestrator.build().context("building scenario")?;
    if let Some(landscape) = orchestrator.landscape() {
        println!(
            "Landscape: {}×{} cells{}",
            landscape.width(),
            landscape.height(),
            if landscape.is_synthetic() { " (synthetic fallback)" } else { "" },
        );
    }
    println!("mem[after build]          {:.0} MB", mem_mb());

    let report = orchestrator.run().context("running scenario")?;
    println!("mem[after run]            {:.0} MB", mem_mb());
    println!("Final population: {}", report.summary.final_population);
    println!("{report}");
    Ok(())
}
