//! Chunk table: sparse storage of live chunks.
//!
//! Structural changes (insert, evict, clear) need `&mut ChunkTable`; the
//! parallel phases only ever receive `&ChunkTable`, so the chunk set cannot
//! change while workers run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::cell::Cell;
use crate::config::SandboxConfig;
use crate::coords::ChunkPos;
use crate::primitives::{Chunk, PendingMove};

/// Live chunks keyed by grid position, bounded by a fixed grid extent.
pub struct ChunkTable {
  chunks: HashMap<ChunkPos, Arc<Chunk>>,
  chunk_width: u32,
  chunk_height: u32,
  grid_width: u32,
  grid_height: u32,
}

impl ChunkTable {
  pub fn new(config: &SandboxConfig) -> Self {
    Self {
      chunks: HashMap::new(),
      chunk_width: config.chunk_width,
      chunk_height: config.chunk_height,
      grid_width: config.grid_width,
      grid_height: config.grid_height,
    }
  }

  #[inline]
  pub fn chunk_size(&self) -> (u32, u32) {
    (self.chunk_width, self.chunk_height)
  }

  /// Returns true if the chunk position lies inside the grid extent.
  #[inline]
  pub fn in_grid(&self, pos: ChunkPos) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.grid_width && (pos.y as u32) < self.grid_height
  }

  /// Returns true if the global cell coordinate lies inside the grid extent.
  #[inline]
  pub fn in_bounds(&self, x: i32, y: i32) -> bool {
    self.in_grid(self.pos_of(x, y))
  }

  /// Chunk position owning a global cell coordinate.
  #[inline]
  pub fn pos_of(&self, x: i32, y: i32) -> ChunkPos {
    ChunkPos::containing(x, y, self.chunk_width, self.chunk_height)
  }

  #[inline]
  pub fn get(&self, pos: ChunkPos) -> Option<&Arc<Chunk>> {
    self.chunks.get(&pos)
  }

  /// Live chunk owning a global cell coordinate.
  #[inline]
  pub fn chunk_at(&self, x: i32, y: i32) -> Option<&Arc<Chunk>> {
    self.chunks.get(&self.pos_of(x, y))
  }

  /// Returns the chunk at `pos`, creating it if absent and inside the grid.
  pub fn get_or_create(&mut self, pos: ChunkPos) -> Option<&Arc<Chunk>> {
    if !self.in_grid(pos) {
      return None;
    }
    let (width, height) = (self.chunk_width, self.chunk_height);
    Some(self.chunks.entry(pos).or_insert_with(|| {
      log::trace!("Creating chunk {:?}", pos);
      Arc::new(Chunk::new(pos, width, height))
    }))
  }

  /// Creates the in-grid neighbors of every chunk for which `active` holds,
  /// so workers scanning those chunks always find their surroundings.
  /// Returns the number of chunks created.
  pub fn ensure_halo(&mut self, active: impl Fn(&Chunk) -> bool) -> usize {
    let wanted: Vec<ChunkPos> = self
      .chunks
      .values()
      .map(Arc::as_ref)
      .filter(|&chunk| active(chunk))
      .flat_map(|chunk| chunk.pos().neighbors())
      .filter(|pos| self.in_grid(*pos) && !self.chunks.contains_key(pos))
      .collect();

    let before = self.chunks.len();
    for pos in wanted {
      self.get_or_create(pos);
    }
    self.chunks.len() - before
  }

  /// Live chunks in row-major grid order.
  pub fn sorted(&self) -> Vec<Arc<Chunk>> {
    let mut chunks: Vec<_> = self.chunks.values().cloned().collect();
    chunks.sort_by_key(|chunk| chunk.pos());
    chunks
  }

  pub fn iter(&self) -> impl Iterator<Item = &Arc<Chunk>> {
    self.chunks.values()
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }

  /// Removes every chunk for which `evict` returns true. Returns the number
  /// removed.
  pub fn evict_where(&mut self, evict: impl Fn(&Chunk) -> bool) -> usize {
    let before = self.chunks.len();
    self.chunks.retain(|pos, chunk| {
      let remove = evict(&**chunk);
      if remove {
        log::trace!("Evicting chunk {:?}", pos);
      }
      !remove
    });
    before - self.chunks.len()
  }

  /// Evicts chunks that hold no cells, have no pending writes and were not
  /// touched since the last accessed-flag reset. Chunks bordering a surviving
  /// chunk that will be scanned next tick are kept, since the next tick's
  /// halo would recreate them straight away.
  pub fn evict_idle(&mut self) -> usize {
    let halo: HashSet<ChunkPos> = self
      .chunks
      .values()
      .filter(|chunk| !chunk.is_evictable() && !chunk.scan_rect().is_empty())
      .flat_map(|chunk| chunk.pos().neighbors())
      .collect();
    self.evict_where(|chunk| chunk.is_evictable() && !halo.contains(&chunk.pos()))
  }

  pub fn clear(&mut self) {
    self.chunks.clear();
  }

  // Cell access through live chunks only. Absent chunks read as AIR and
  // swallow writes; callers that must create chunks go through
  // `get_or_create` first.

  pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
    if !self.in_bounds(x, y) {
      return None;
    }
    Some(
      self
        .chunk_at(x, y)
        .and_then(|chunk| chunk.get_cell(x, y))
        .unwrap_or(Cell::AIR),
    )
  }

  pub fn set_cell(&self, x: i32, y: i32, cell: Cell) -> bool {
    self
      .chunk_at(x, y)
      .is_some_and(|chunk| chunk.set_cell(x, y, cell))
  }

  pub fn modify_cell<R>(&self, x: i32, y: i32, f: impl FnOnce(&mut Cell) -> R) -> Option<R> {
    self.chunk_at(x, y)?.modify_cell(x, y, f)
  }

  pub fn keep_alive(&self, x: i32, y: i32) {
    if let Some(chunk) = self.chunk_at(x, y) {
      chunk.keep_alive(x, y);
    }
  }

  /// Records a move from `(x, y)` to `(to_x, to_y)` on the destination chunk.
  /// Returns false if either chunk is absent.
  pub fn record_move(&self, x: i32, y: i32, to_x: i32, to_y: i32) -> bool {
    let (Some(src_chunk), Some(dst_chunk)) = (self.chunk_at(x, y), self.chunk_at(to_x, to_y)) else {
      return false;
    };
    let (Some(src), Some(dst)) = (src_chunk.local_index(x, y), dst_chunk.local_index(to_x, to_y)) else {
      return false;
    };
    dst_chunk.record_move(PendingMove {
      dst,
      src,
      src_chunk: Arc::clone(src_chunk),
    });
    true
  }
}
