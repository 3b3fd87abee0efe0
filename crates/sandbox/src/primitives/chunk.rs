//! Chunk - a fixed-size tile of cells.
//!
//! A chunk owns its cells exclusively. Everything that can be touched from
//! another chunk's worker (cells, live counter, dirty rects) sits behind one
//! mutex, and the pending move list behind a second one. Every operation
//! takes at most one chunk lock at a time, so workers can never deadlock on
//! each other regardless of the order they reach shared borders.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;

use super::rect::DirtyRect;
use crate::cell::Cell;
use crate::coords::{CellRect, ChunkPos};

/// Margin added around every write when extending the working rect.
pub const DIRTY_MARGIN: u32 = 2;

/// A deferred movement decision, recorded on the destination chunk.
#[derive(Clone)]
pub struct PendingMove {
  /// Cell index in the destination chunk.
  pub dst: usize,
  /// Cell index in `src_chunk`.
  pub src: usize,
  pub src_chunk: Arc<Chunk>,
}

impl PendingMove {
  fn sort_key(&self) -> (usize, ChunkPos, usize) {
    (self.dst, self.src_chunk.pos(), self.src)
  }
}

/// Lock-protected chunk state.
pub(crate) struct ChunkState {
  cells: Box<[Cell]>,
  /// Number of non-AIR cells.
  filled: usize,
  /// Rect accumulating this tick's changes.
  working: DirtyRect,
  /// Rect scanned by the current tick.
  committed: DirtyRect,
}

impl ChunkState {
  #[inline]
  pub fn cells(&self) -> &[Cell] {
    &self.cells
  }
}

/// A chunk of the world.
pub struct Chunk {
  pos: ChunkPos,
  width: u32,
  height: u32,
  /// Global coordinate of the top-left cell.
  origin: (i32, i32),
  state: Mutex<ChunkState>,
  moves: Mutex<Vec<PendingMove>>,
  /// Set by any write, keep-alive or recorded move since the last reset.
  accessed: AtomicBool,
}

/// Row-major index of a local coordinate. Computed in `usize`; the row
/// offset alone can exceed `u32` on large chunks.
#[inline]
fn cell_index(width: u32, lx: u32, ly: u32) -> usize {
  ly as usize * width as usize + lx as usize
}

impl Chunk {
  /// Creates an all-AIR chunk at `pos`.
  pub fn new(pos: ChunkPos, width: u32, height: u32) -> Self {
    Self {
      pos,
      width,
      height,
      origin: pos.origin(width, height),
      state: Mutex::new(ChunkState {
        cells: vec![Cell::AIR; width as usize * height as usize].into_boxed_slice(),
        filled: 0,
        working: DirtyRect::empty(),
        committed: DirtyRect::empty(),
      }),
      moves: Mutex::new(Vec::new()),
      accessed: AtomicBool::new(false),
    }
  }

  #[inline]
  pub fn pos(&self) -> ChunkPos {
    self.pos
  }

  #[inline]
  pub fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Global rectangle covered by this chunk.
  pub fn bounds(&self) -> CellRect {
    CellRect::new(self.origin.0, self.origin.1, self.width, self.height)
  }

  /// Returns true if the global coordinate lies inside this chunk.
  #[inline]
  pub fn in_bounds(&self, x: i32, y: i32) -> bool {
    self.to_local(x, y).is_some()
  }

  /// Converts a global coordinate to chunk-local coordinates.
  #[inline]
  pub fn to_local(&self, x: i32, y: i32) -> Option<(u32, u32)> {
    let lx = x.checked_sub(self.origin.0)?;
    let ly = y.checked_sub(self.origin.1)?;
    if lx < 0 || ly < 0 || lx as u32 >= self.width || ly as u32 >= self.height {
      return None;
    }
    Some((lx as u32, ly as u32))
  }

  /// Converts a local coordinate back to global.
  #[inline]
  pub fn to_global(&self, lx: u32, ly: u32) -> (i32, i32) {
    (self.origin.0 + lx as i32, self.origin.1 + ly as i32)
  }

  /// Returns the cell index of a global coordinate, if inside this chunk.
  #[inline]
  pub fn local_index(&self, x: i32, y: i32) -> Option<usize> {
    self
      .to_local(x, y)
      .map(|(lx, ly)| cell_index(self.width, lx, ly))
  }

  #[inline]
  fn index_to_local(&self, index: usize) -> (u32, u32) {
    let width = self.width as usize;
    ((index % width) as u32, (index / width) as u32)
  }

  /// Locks the chunk state. A poisoned lock only means another worker
  /// panicked mid-phase; the cell data itself is still consistent.
  #[inline]
  pub(crate) fn lock(&self) -> MutexGuard<'_, ChunkState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  #[inline]
  fn touch(&self) {
    self.accessed.store(true, Ordering::Relaxed);
  }

  /// Reads the cell at a global coordinate.
  pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
    let index = self.local_index(x, y)?;
    Some(self.lock().cells[index])
  }

  /// Returns true if the global coordinate is inside this chunk and AIR.
  pub fn is_empty(&self, x: i32, y: i32) -> bool {
    self.get_cell(x, y).is_some_and(|c| c.is_air())
  }

  /// Writes a cell at a global coordinate. Returns false outside the chunk.
  pub fn set_cell(&self, x: i32, y: i32, cell: Cell) -> bool {
    let Some(index) = self.local_index(x, y) else {
      return false;
    };
    self.set_cell_at(index, cell);
    true
  }

  /// Writes a cell by index, maintaining the live counter and working rect.
  pub fn set_cell_at(&self, index: usize, cell: Cell) {
    let mut state = self.lock();
    self.write_locked(&mut state, index, cell);
  }

  fn write_locked(&self, state: &mut ChunkState, index: usize, cell: Cell) {
    let cell = cell.normalized();
    let was_air = state.cells[index].is_air();
    match (was_air, cell.is_air()) {
      (true, false) => state.filled += 1,
      (false, true) => {
        assert!(state.filled > 0, "live counter underflow in chunk {:?}", self.pos);
        state.filled -= 1;
      }
      _ => {}
    }
    state.cells[index] = cell;
    let (lx, ly) = self.index_to_local(index);
    state
      .working
      .expand_around(lx, ly, DIRTY_MARGIN, self.width, self.height);
    self.touch();
  }

  /// Read-modify-write of one cell under the chunk lock.
  ///
  /// The closure may change any field including the material; the counter
  /// and working rect are updated as for [`Chunk::set_cell`].
  pub fn modify_cell<R>(&self, x: i32, y: i32, f: impl FnOnce(&mut Cell) -> R) -> Option<R> {
    let index = self.local_index(x, y)?;
    let mut state = self.lock();
    let mut cell = state.cells[index];
    let out = f(&mut cell);
    self.write_locked(&mut state, index, cell);
    Some(out)
  }

  /// Removes and returns the cell at `index`, leaving AIR.
  pub(crate) fn take_cell(&self, index: usize) -> Cell {
    let mut state = self.lock();
    let cell = state.cells[index];
    if !cell.is_air() {
      self.write_locked(&mut state, index, Cell::AIR);
    }
    cell
  }

  /// Extends the working rect around a global coordinate without writing.
  pub fn keep_alive(&self, x: i32, y: i32) {
    let Some((lx, ly)) = self.to_local(x, y) else {
      return;
    };
    self
      .lock()
      .working
      .expand_around(lx, ly, DIRTY_MARGIN, self.width, self.height);
    self.touch();
  }

  /// Appends a move targeting this chunk. Cells are not touched.
  pub fn record_move(&self, mv: PendingMove) {
    self
      .moves
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(mv);
    self.touch();
  }

  /// Number of moves waiting for [`Chunk::apply_moves`].
  pub fn pending_moves(&self) -> usize {
    self
      .moves
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  /// Resolves and executes the pending move list.
  ///
  /// Moves into occupied cells are dropped. Candidates sharing a destination
  /// are ordered canonically and one winner is drawn uniformly from `rng`;
  /// losing sources stay where they are. Returns the number of moves
  /// executed.
  pub fn apply_moves<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
    let mut moves = std::mem::take(&mut *self.moves.lock().unwrap_or_else(PoisonError::into_inner));
    if moves.is_empty() {
      return 0;
    }

    {
      let state = self.lock();
      moves.retain(|mv| state.cells[mv.dst].is_air());
    }
    moves.sort_by_key(PendingMove::sort_key);

    let mut applied = 0;
    for candidates in moves.chunk_by(|a, b| a.dst == b.dst) {
      let winner = if candidates.len() == 1 {
        &candidates[0]
      } else {
        &candidates[rng.random_range(0..candidates.len())]
      };

      // Other chunks only ever clear cells of this chunk during move
      // application, so the destination stays AIR until we write it.
      let cell = winner.src_chunk.take_cell(winner.src);
      if cell.is_air() {
        // Source already left through a move registered on another chunk.
        continue;
      }
      self.set_cell_at(winner.dst, cell);
      applied += 1;
    }
    applied
  }

  /// Promotes the working rect to the committed rect and clears it.
  pub fn commit_dirty_rect(&self) {
    let mut state = self.lock();
    state.committed = state.working;
    state.working = DirtyRect::empty();
  }

  /// Rect scanned by the diffusion and state phases.
  pub fn committed_rect(&self) -> DirtyRect {
    self.lock().committed
  }

  /// Rect accumulating changes for the next tick.
  pub fn working_rect(&self) -> DirtyRect {
    self.lock().working
  }

  /// Rect scanned by the movement phase: everything committed last tick plus
  /// anything written since.
  pub fn scan_rect(&self) -> DirtyRect {
    let state = self.lock();
    state.committed.union(&state.working)
  }

  /// Number of non-AIR cells.
  pub fn filled(&self) -> usize {
    self.lock().filled
  }

  /// Returns true if anything touched this chunk since the last reset.
  #[inline]
  pub fn was_accessed(&self) -> bool {
    self.accessed.load(Ordering::Relaxed)
  }

  pub(crate) fn reset_accessed(&self) {
    self.accessed.store(false, Ordering::Relaxed);
  }

  /// Returns true if the chunk holds nothing and nothing kept it alive.
  pub fn is_evictable(&self) -> bool {
    if self.was_accessed() {
      return false;
    }
    let state = self.lock();
    state.filled == 0 && state.working.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use rand::SeedableRng;
  use rand::rngs::SmallRng;

  use super::*;
  use crate::material::Material;

  fn chunk_at(x: i32, y: i32) -> Arc<Chunk> {
    Arc::new(Chunk::new(ChunkPos::new(x, y), 8, 8))
  }

  #[test]
  fn counter_tracks_air_transitions() {
    let chunk = chunk_at(0, 0);
    chunk.set_cell(1, 1, Cell::of(Material::Sand));
    chunk.set_cell(1, 1, Cell::of(Material::Water));
    chunk.set_cell(2, 1, Cell::of(Material::Stone));
    assert_eq!(chunk.filled(), 2);
    chunk.set_cell(1, 1, Cell::AIR);
    chunk.set_cell(3, 3, Cell::AIR);
    assert_eq!(chunk.filled(), 1);
  }

  #[test]
  fn global_coordinates_map_into_chunk() {
    let chunk = chunk_at(-1, 2);
    assert!(chunk.in_bounds(-8, 16));
    assert!(chunk.in_bounds(-1, 23));
    assert!(!chunk.in_bounds(0, 16));
    assert_eq!(chunk.local_index(-7, 17), Some(9));
    assert_eq!(chunk.to_global(1, 1), (-7, 17));
  }

  #[test]
  fn cell_index_does_not_wrap_for_huge_chunks() {
    assert_eq!(cell_index(70_000, 5, 69_999), 4_899_930_005);
    assert_eq!(cell_index(8, 3, 2), 19);
  }

  #[test]
  fn writes_extend_working_rect_with_margin() {
    let chunk = chunk_at(0, 0);
    chunk.set_cell(4, 4, Cell::of(Material::Sand));
    let rect = chunk.working_rect();
    assert_eq!((rect.min_x, rect.min_y, rect.max_x, rect.max_y), (2, 2, 7, 7));
    chunk.commit_dirty_rect();
    assert!(chunk.working_rect().is_empty());
    assert_eq!(chunk.committed_rect(), rect);
  }

  #[test]
  fn modify_cell_updates_counter_on_material_change() {
    let chunk = chunk_at(0, 0);
    chunk.set_cell(0, 0, Cell::of(Material::Smoke));
    let decayed = chunk.modify_cell(0, 0, |cell| {
      cell.material = Material::Air;
      true
    });
    assert_eq!(decayed, Some(true));
    assert_eq!(chunk.filled(), 0);
    assert_eq!(chunk.get_cell(0, 0), Some(Cell::AIR));
  }

  #[test]
  fn occupied_destination_discards_move() {
    let chunk = chunk_at(0, 0);
    chunk.set_cell(0, 0, Cell::of(Material::Sand));
    chunk.set_cell(0, 1, Cell::of(Material::Stone));
    chunk.record_move(PendingMove {
      dst: chunk.local_index(0, 1).unwrap(),
      src: chunk.local_index(0, 0).unwrap(),
      src_chunk: Arc::clone(&chunk),
    });
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(chunk.apply_moves(&mut rng), 0);
    assert_eq!(chunk.pending_moves(), 0);
    assert_eq!(chunk.get_cell(0, 0).unwrap().material, Material::Sand);
  }

  #[test]
  fn contested_destination_has_single_winner() {
    let left = chunk_at(0, 0);
    let right = chunk_at(1, 0);
    left.set_cell(7, 0, Cell::of(Material::Sand));
    right.set_cell(9, 0, Cell::of(Material::Water));
    right.record_move(PendingMove {
      dst: right.local_index(8, 1).unwrap(),
      src: right.local_index(9, 0).unwrap(),
      src_chunk: Arc::clone(&right),
    });
    right.record_move(PendingMove {
      dst: right.local_index(8, 1).unwrap(),
      src: left.local_index(7, 0).unwrap(),
      src_chunk: Arc::clone(&left),
    });

    let mut rng = SmallRng::seed_from_u64(42);
    assert_eq!(right.apply_moves(&mut rng), 1);
    assert_eq!(left.filled() + right.filled(), 2);

    let landed = right.get_cell(8, 1).unwrap().material;
    match landed {
      Material::Sand => assert!(left.is_empty(7, 0) && !right.is_empty(9, 0)),
      Material::Water => assert!(right.is_empty(9, 0) && !left.is_empty(7, 0)),
      other => panic!("unexpected {other:?} at destination"),
    }
  }

  #[test]
  fn eviction_requires_quiet_empty_chunk() {
    let chunk = chunk_at(0, 0);
    assert!(chunk.is_evictable());
    chunk.keep_alive(3, 3);
    assert!(!chunk.is_evictable());
    chunk.reset_accessed();
    assert!(!chunk.is_evictable(), "working rect still pending");
    chunk.commit_dirty_rect();
    assert!(chunk.is_evictable());
  }
}
