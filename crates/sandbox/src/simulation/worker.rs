//! Per-chunk, per-phase simulation context.
//!
//! A worker wraps one chunk and the tick's read-only chunk table. Cell
//! access is boundary transparent: coordinates inside the wrapped chunk go
//! straight to it, everything else is routed through the table to whichever
//! chunk owns the coordinate.

use std::sync::Arc;

use rand::rngs::SmallRng;

use crate::cell::Cell;
use crate::primitives::{Chunk, DirtyRect, PendingMove};
use crate::world::ChunkTable;

pub(crate) struct Worker<'a> {
  chunk: &'a Arc<Chunk>,
  table: &'a ChunkTable,
  rng: SmallRng,
}

impl<'a> Worker<'a> {
  pub fn new(chunk: &'a Arc<Chunk>, table: &'a ChunkTable, rng: SmallRng) -> Self {
    Self { chunk, table, rng }
  }

  #[inline]
  pub fn rng(&mut self) -> &mut SmallRng {
    &mut self.rng
  }

  #[inline]
  pub fn in_bounds(&self, x: i32, y: i32) -> bool {
    self.chunk.in_bounds(x, y) || self.table.in_bounds(x, y)
  }

  /// Returns true if the cell exists and is AIR. Coordinates outside the
  /// world, or in a chunk that is not live, count as occupied.
  pub fn is_empty(&self, x: i32, y: i32) -> bool {
    if self.chunk.in_bounds(x, y) {
      return self.chunk.is_empty(x, y);
    }
    self
      .table
      .chunk_at(x, y)
      .is_some_and(|chunk| chunk.is_empty(x, y))
  }

  pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
    if self.chunk.in_bounds(x, y) {
      return self.chunk.get_cell(x, y);
    }
    self.table.chunk_at(x, y)?.get_cell(x, y)
  }

  pub fn set_cell(&self, x: i32, y: i32, cell: Cell) {
    if !self.chunk.set_cell(x, y, cell) {
      self.table.set_cell(x, y, cell);
    }
  }

  pub fn modify_cell<R>(&self, x: i32, y: i32, f: impl FnOnce(&mut Cell) -> R) -> Option<R> {
    if self.chunk.in_bounds(x, y) {
      return self.chunk.modify_cell(x, y, f);
    }
    self.table.modify_cell(x, y, f)
  }

  pub fn keep_alive(&self, x: i32, y: i32) {
    if self.chunk.in_bounds(x, y) {
      self.chunk.keep_alive(x, y);
    } else {
      self.table.keep_alive(x, y);
    }
  }

  /// Records a move of the cell at `(x, y)` to `(to_x, to_y)`.
  ///
  /// A source on the chunk border also keeps alive the cells across that
  /// border, so a neighbor whose only change is a particle arriving next to
  /// it still gets scanned next tick.
  pub fn move_cell(&self, x: i32, y: i32, to_x: i32, to_y: i32) {
    let bounds = self.chunk.bounds();
    let right = bounds.x + bounds.width as i32 - 1;
    let bottom = bounds.y + bounds.height as i32 - 1;

    let ping_x = if x == bounds.x {
      -1
    } else if x == right {
      1
    } else {
      0
    };
    let ping_y = if y == bounds.y {
      -1
    } else if y == bottom {
      1
    } else {
      0
    };

    if ping_x != 0 {
      self.table.keep_alive(x + ping_x, y);
    }
    if ping_y != 0 {
      self.table.keep_alive(x, y + ping_y);
    }
    if ping_x != 0 && ping_y != 0 {
      self.table.keep_alive(x + ping_x, y + ping_y);
    }

    match (
      self.chunk.local_index(x, y),
      self.chunk.local_index(to_x, to_y),
    ) {
      (Some(src), Some(dst)) => self.chunk.record_move(PendingMove {
        dst,
        src,
        src_chunk: Arc::clone(self.chunk),
      }),
      _ => {
        self.table.record_move(x, y, to_x, to_y);
      }
    }
  }

  /// Scans `rect` of the wrapped chunk, handing every non-AIR cell to `rule`.
  pub fn run(&mut self, rect: DirtyRect, rule: CellRule) {
    for (lx, ly) in rect.cells() {
      let (x, y) = self.chunk.to_global(lx, ly);
      let Some(cell) = self.chunk.get_cell(x, y) else {
        continue;
      };
      if cell.is_air() {
        continue;
      }
      rule(self, x, y, cell);
    }
  }
}

/// Per-cell rule applied by [`Worker::run`].
pub(crate) type CellRule = fn(&mut Worker<'_>, i32, i32, Cell);
