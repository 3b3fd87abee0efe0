//! Cellular automata simulation.
//!
//! One tick runs four barrier-separated phases, each fanned out over live
//! chunks with rayon:
//!
//! 1. movement: workers record move decisions on destination chunks
//! 2. move application: each chunk resolves conflicts and executes its moves,
//!    then dirty rects are committed
//! 3. thermal diffusion
//! 4. state transitions
//!
//! The chunk set only changes between phases, on the sequential path, where
//! the halo of neighbors around active chunks is created and idle chunks
//! outside that halo are evicted.

pub(crate) mod behavior;
pub(crate) mod hash;
pub(crate) mod heat;
pub(crate) mod movement;
mod worker;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;

pub use behavior::{IGNITE_CHANCE, boil_chance};
pub use movement::effective_state;
use worker::{CellRule, Worker};

use crate::primitives::{Chunk, DirtyRect};
use crate::world::ChunkTable;

/// Cardinal neighbor offsets.
pub(crate) const CARDINAL: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Barrier-separated stage of a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
  Movement,
  ApplyMoves,
  Diffusion,
  Transition,
}

impl Phase {
  /// Independent random stream per phase.
  const fn channel(self) -> u64 {
    match self {
      Phase::Movement => 0x9e37_79b9_7f4a_7c15,
      Phase::ApplyMoves => 0x3c6e_f372_fe94_f82a,
      Phase::Diffusion => 0xdaa6_6d2c_7ddf_743f,
      Phase::Transition => 0x78dd_e6e5_fd29_f05f,
    }
  }
}

/// Counters describing one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
  /// Chunks scanned by the movement phase.
  pub active_chunks: usize,
  /// Moves executed after conflict resolution.
  pub moves_applied: usize,
  /// Halo chunks instantiated this tick.
  pub chunks_created: usize,
  /// Chunks evicted at the end of the tick.
  pub chunks_evicted: usize,
}

/// Seeds the random stream of one chunk for one phase.
fn phase_rng(seed: u64, tick: u64, phase: Phase, chunk: &Chunk) -> SmallRng {
  SmallRng::seed_from_u64(hash::hash41uu64(
    seed,
    tick,
    phase.channel(),
    hash::chunk_key(chunk.pos()),
  ))
}

/// Runs one full tick over `table`.
#[cfg_attr(feature = "tracy", tracing::instrument(skip_all, fields(tick = tick)))]
pub(crate) fn simulate_tick(table: &mut ChunkTable, seed: u64, tick: u64) -> TickStats {
  let mut stats = TickStats::default();

  for chunk in table.iter() {
    chunk.reset_accessed();
  }

  stats.chunks_created += table.ensure_halo(|chunk| !chunk.scan_rect().is_empty());
  let scans = snapshot_rects(table, Chunk::scan_rect);
  stats.active_chunks = scans.len();
  run_phase(table, &scans, Phase::Movement, seed, tick, movement::update);

  stats.moves_applied = apply_moves(table, seed, tick);

  stats.chunks_created += table.ensure_halo(|chunk| !chunk.committed_rect().is_empty());
  let scans = snapshot_rects(table, Chunk::committed_rect);
  run_phase(table, &scans, Phase::Diffusion, seed, tick, heat::diffuse);
  run_phase(table, &scans, Phase::Transition, seed, tick, behavior::update);

  stats.chunks_evicted = table.evict_idle();
  stats
}

/// Captures each chunk's scan rect before a phase starts, so rects growing
/// mid-phase from neighbors' writes don't change what gets scanned.
fn snapshot_rects(table: &ChunkTable, rect_of: fn(&Chunk) -> DirtyRect) -> Vec<(Arc<Chunk>, DirtyRect)> {
  table
    .sorted()
    .into_iter()
    .filter_map(|chunk| {
      let rect = rect_of(&chunk);
      (!rect.is_empty()).then_some((chunk, rect))
    })
    .collect()
}

#[cfg_attr(feature = "tracy", tracing::instrument(skip_all, fields(phase = ?phase)))]
fn run_phase(
  table: &ChunkTable,
  scans: &[(Arc<Chunk>, DirtyRect)],
  phase: Phase,
  seed: u64,
  tick: u64,
  rule: CellRule,
) {
  // Implicit barrier: par_iter returns only after every chunk is done.
  scans.par_iter().for_each(|(chunk, rect)| {
    let rng = phase_rng(seed, tick, phase, chunk);
    Worker::new(chunk, table, rng).run(*rect, rule);
  });
}

/// Resolves every chunk's pending moves in parallel, then commits dirty rects.
#[cfg_attr(feature = "tracy", tracing::instrument(skip_all))]
fn apply_moves(table: &ChunkTable, seed: u64, tick: u64) -> usize {
  let chunks = table.sorted();
  let applied = chunks
    .par_iter()
    .map(|chunk| {
      if chunk.pending_moves() == 0 {
        return 0;
      }
      let mut rng = phase_rng(seed, tick, Phase::ApplyMoves, chunk);
      chunk.apply_moves(&mut rng)
    })
    .sum();

  for chunk in &chunks {
    chunk.commit_dirty_rect();
  }
  applied
}
