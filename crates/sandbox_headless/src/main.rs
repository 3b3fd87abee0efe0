//! Headless sandbox runner.
//!
//! Loads a scene (or the built-in demo), ticks it and optionally writes the
//! final frame as a PNG.
//!
//! ```text
//! sandbox --scene scenes/demo.toml --ticks 1000 --png out.png
//! RUST_LOG=debug sandbox --seed 7
//! ```

mod scene;
#[cfg(feature = "tracy")]
mod tracy_init;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use sandbox::{RenderOptions, TickStats, World};

use crate::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "sandbox", about = "Run a falling-sand scene without a window")]
struct Args {
  /// Scene file (TOML). Runs the built-in demo when omitted.
  #[arg(long)]
  scene: Option<PathBuf>,
  /// Number of ticks, overriding the scene.
  #[arg(long)]
  ticks: Option<u64>,
  /// Simulation seed, overriding the scene.
  #[arg(long)]
  seed: Option<u64>,
  /// Write the final frame to this PNG file.
  #[arg(long)]
  png: Option<PathBuf>,
  /// Render without the temperature tint.
  #[arg(long)]
  no_heat: bool,
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  #[cfg(feature = "tracy")]
  tracy_init::init_tracy();

  match run(Args::parse()) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      log::error!("{}", e);
      ExitCode::FAILURE
    }
  }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
  let scene = match &args.scene {
    Some(path) => Scene::load(path)?,
    None => Scene::demo()?,
  };
  let mut world = scene.build(args.seed)?;
  let ticks = args.ticks.unwrap_or(scene.ticks);

  log::info!(
    "Running {}x{} world (seed {}) for {} ticks, {} cells placed",
    world.width(),
    world.height(),
    world.seed(),
    ticks,
    world.live_cell_count()
  );

  let start = Instant::now();
  let mut totals = TickStats::default();
  for _ in 0..ticks {
    let stats = world.tick();
    totals.moves_applied += stats.moves_applied;
    totals.chunks_created += stats.chunks_created;
    totals.chunks_evicted += stats.chunks_evicted;

    if scene.report_every > 0 && world.tick_count() % scene.report_every == 0 {
      report(&world, &stats);
    }
  }

  let elapsed = start.elapsed();
  log::info!(
    "Done: {} ticks in {:.2?} ({:.2?}/tick), {} moves, {} chunks created, {} evicted",
    ticks,
    elapsed,
    per_tick(elapsed, ticks),
    totals.moves_applied,
    totals.chunks_created,
    totals.chunks_evicted
  );

  if let Some(path) = &args.png {
    let options = RenderOptions {
      temperature_overlay: !args.no_heat,
    };
    write_png(&world, options, path)?;
    log::info!("Wrote {}", path.display());
  }
  Ok(())
}

/// Mean wall time per tick. Divides in floating point since tick counts can
/// exceed `u32`.
fn per_tick(elapsed: Duration, ticks: u64) -> Duration {
  Duration::from_secs_f64(elapsed.as_secs_f64() / ticks.max(1) as f64)
}

fn report(world: &World, stats: &TickStats) {
  log::info!(
    "tick {:>6}: {} chunks ({} active), {} cells, {} moves",
    world.tick_count(),
    world.chunk_count(),
    stats.active_chunks,
    world.live_cell_count(),
    stats.moves_applied
  );
}

fn write_png(world: &World, options: RenderOptions, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
  let pixels = world.render_to_vec(options);
  let image = image::RgbaImage::from_raw(world.width(), world.height(), pixels)
    .ok_or("frame buffer does not match world size")?;
  image.save(path)?;
  Ok(())
}
