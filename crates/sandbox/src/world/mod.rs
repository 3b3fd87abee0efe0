//! World - the chunked sandbox.
//!
//! Owns the chunk table, the tick counter and the seed. Chunks are created
//! lazily on first write inside the grid extent and evicted once they hold
//! no cells and nothing touched them for a whole tick.
//!
//! Sub-modules split `World` methods by responsibility:
//! - [`access`]: global-coordinate cell read/write/move
//! - [`overlay`]: debug introspection

mod access;
mod overlay;
mod table;

use rand::SeedableRng;
use rand::rngs::SmallRng;

pub use overlay::ChunkOverlay;
pub use table::ChunkTable;

use crate::config::{ConfigError, SandboxConfig};
use crate::simulation::hash::hash21uu64;
use crate::simulation::{self, TickStats};

/// A falling-sand world.
pub struct World {
  config: SandboxConfig,
  chunks: ChunkTable,
  /// Current simulation tick.
  tick: u64,
  /// Number of resets, mixed into the placement seed.
  generation: u64,
  /// Randomness for cells spawned through the public API.
  rng: SmallRng,
}

impl World {
  /// Creates an empty world from a validated configuration.
  pub fn new(config: SandboxConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    log::debug!(
      "Creating world {}x{} cells ({}x{} chunks of {}x{}), seed {}",
      config.world_width(),
      config.world_height(),
      config.grid_width,
      config.grid_height,
      config.chunk_width,
      config.chunk_height,
      config.seed
    );
    Ok(Self {
      chunks: ChunkTable::new(&config),
      tick: 0,
      generation: 0,
      rng: SmallRng::seed_from_u64(hash21uu64(config.seed, 0)),
      config,
    })
  }

  /// Creates a world covering `width × height` cells on an 8×8 chunk grid.
  pub fn with_size(width: u32, height: u32, seed: u64) -> Result<Self, ConfigError> {
    Self::new(SandboxConfig::for_world_size(width, height).with_seed(seed))
  }

  #[inline]
  pub fn config(&self) -> &SandboxConfig {
    &self.config
  }

  #[inline]
  pub fn seed(&self) -> u64 {
    self.config.seed
  }

  /// Number of completed ticks.
  #[inline]
  pub fn tick_count(&self) -> u64 {
    self.tick
  }

  /// World width in cells.
  #[inline]
  pub fn width(&self) -> u32 {
    self.config.world_width()
  }

  /// World height in cells.
  #[inline]
  pub fn height(&self) -> u32 {
    self.config.world_height()
  }

  /// Number of live chunks.
  #[inline]
  pub fn chunk_count(&self) -> usize {
    self.chunks.len()
  }

  /// Number of non-AIR cells across all live chunks.
  pub fn live_cell_count(&self) -> usize {
    self.chunks.iter().map(|chunk| chunk.filled()).sum()
  }

  pub(crate) fn table(&self) -> &ChunkTable {
    &self.chunks
  }

  /// Advances the simulation by one tick.
  pub fn tick(&mut self) -> TickStats {
    let stats = simulation::simulate_tick(&mut self.chunks, self.config.seed, self.tick);
    self.tick += 1;
    if stats.chunks_evicted > 0 {
      log::trace!(
        "Tick {}: evicted {} chunks, {} live",
        self.tick,
        stats.chunks_evicted,
        self.chunks.len()
      );
    }
    stats
  }

  /// Advances the simulation by `ticks` ticks.
  pub fn step(&mut self, ticks: u64) {
    for _ in 0..ticks {
      self.tick();
    }
  }

  /// Removes chunks that hold no cells and were not touched during the last
  /// tick, except the ring around chunks still due for a scan. Calling it
  /// again without an intervening tick removes nothing.
  pub fn evict_empty_chunks(&mut self) -> usize {
    self.chunks.evict_idle()
  }

  /// Discards every chunk and restarts the tick counter.
  pub fn reset(&mut self) {
    log::debug!("Resetting world after {} ticks", self.tick);
    self.chunks.clear();
    self.tick = 0;
    self.generation += 1;
    self.rng = SmallRng::seed_from_u64(hash21uu64(self.config.seed, self.generation));
  }
}

impl std::fmt::Debug for World {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("World")
      .field("config", &self.config)
      .field("tick", &self.tick)
      .field("chunks", &self.chunks.len())
      .finish()
  }
}
