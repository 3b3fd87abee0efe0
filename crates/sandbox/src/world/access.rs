//! Cell read/write API for `World`.
//!
//! Reads never create chunks: an in-bounds coordinate without a live chunk
//! is AIR. Writes and moves create the owning chunk on demand.

use std::sync::Arc;

use super::World;
use crate::cell::Cell;
use crate::coords::CellRect;
use crate::material::Material;
use crate::primitives::Chunk;

impl World {
  /// Returns true if `(x, y)` lies inside the world.
  #[inline]
  pub fn in_bounds(&self, x: i32, y: i32) -> bool {
    self.chunks.in_bounds(x, y)
  }

  /// Returns the cell at `(x, y)`, or None outside the world.
  pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
    self.chunks.get_cell(x, y)
  }

  /// Returns true if `(x, y)` is inside the world and AIR.
  pub fn is_empty(&self, x: i32, y: i32) -> bool {
    self.get_cell(x, y).is_some_and(|cell| cell.is_air())
  }

  /// Returns the live chunk owning `(x, y)` without creating it.
  pub fn chunk_at(&self, x: i32, y: i32) -> Option<&Arc<Chunk>> {
    self.chunks.chunk_at(x, y)
  }

  /// Returns the chunk owning `(x, y)`, creating it if needed.
  ///
  /// Returns None outside the world.
  pub fn get_chunk(&mut self, x: i32, y: i32) -> Option<&Arc<Chunk>> {
    let pos = self.chunks.pos_of(x, y);
    self.chunks.get_or_create(pos)
  }

  /// Writes a cell. Returns false (and does nothing) outside the world.
  pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
    if cell.is_air() && self.chunks.chunk_at(x, y).is_none() {
      // Clearing a cell of an absent chunk is already a no-op.
      return self.in_bounds(x, y);
    }
    self
      .get_chunk(x, y)
      .is_some_and(|chunk| chunk.set_cell(x, y, cell))
  }

  /// Places a freshly initialized cell of `material`.
  pub fn spawn(&mut self, x: i32, y: i32, material: Material) -> bool {
    let cell = Cell::spawn(material, &mut self.rng);
    self.set_cell(x, y, cell)
  }

  /// Read-modify-write of one cell. Returns None outside the world.
  pub fn modify_cell<R>(&mut self, x: i32, y: i32, f: impl FnOnce(&mut Cell) -> R) -> Option<R> {
    self.get_chunk(x, y)?.modify_cell(x, y, f)
  }

  /// Records a move from `(x, y)` to `(to_x, to_y)`, executed during the
  /// next tick's move application. Returns false if either end lies outside
  /// the world or the source is AIR.
  pub fn move_cell(&mut self, x: i32, y: i32, to_x: i32, to_y: i32) -> bool {
    if self.is_empty(x, y) || !self.in_bounds(to_x, to_y) {
      return false;
    }
    let dst_pos = self.chunks.pos_of(to_x, to_y);
    if self.chunks.get_or_create(dst_pos).is_none() {
      return false;
    }
    self.chunks.record_move(x, y, to_x, to_y)
  }

  /// Schedules `(x, y)` for scanning next tick without changing it.
  pub fn keep_alive(&self, x: i32, y: i32) {
    self.chunks.keep_alive(x, y);
  }

  /// Fills `rect` with fresh cells of `material`, clipped to the world.
  ///
  /// `temperature` overrides the spawn temperature when set. Returns the
  /// number of cells written.
  pub fn fill_rect(&mut self, rect: CellRect, material: Material, temperature: Option<i32>) -> usize {
    let mut written = 0;
    for (x, y) in rect.cells() {
      let mut cell = Cell::spawn(material, &mut self.rng);
      if let Some(temperature) = temperature.filter(|_| !cell.is_air()) {
        cell.temperature = temperature;
      }
      if self.in_bounds(x, y) && self.set_cell(x, y, cell) {
        written += 1;
      }
    }
    written
  }
}
