//! Coordinate types.
//!
//! Defines the coordinate system for the world:
//! - global cell coordinates are plain `(i32, i32)` pairs, X+ right, Y+ down
//! - [`ChunkPos`]: chunk grid position
//! - [`CellRect`]: global axis-aligned rectangle, used by the debug overlay
//!   and scene fills

/// Position in the chunk grid.
///
/// Orders by row, then column, so sorted chunk lists scan top-to-bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
  pub y: i32,
  pub x: i32,
}

impl ChunkPos {
  /// Creates a new chunk position.
  pub const fn new(x: i32, y: i32) -> Self {
    Self { x, y }
  }

  /// Returns the chunk containing the global cell `(x, y)`.
  ///
  /// Uses floor division so negative coordinates land in negative chunks
  /// instead of being folded into chunk 0.
  #[inline]
  pub fn containing(x: i32, y: i32, chunk_width: u32, chunk_height: u32) -> Self {
    Self::new(
      x.div_euclid(chunk_width as i32),
      y.div_euclid(chunk_height as i32),
    )
  }

  /// Returns the global coordinate of this chunk's top-left cell.
  #[inline]
  pub fn origin(self, chunk_width: u32, chunk_height: u32) -> (i32, i32) {
    (self.x * chunk_width as i32, self.y * chunk_height as i32)
  }

  /// Returns the eight surrounding chunk positions.
  pub fn neighbors(self) -> impl Iterator<Item = ChunkPos> {
    (-1..=1)
      .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
      .filter(|&(dx, dy)| dx != 0 || dy != 0)
      .map(move |(dx, dy)| ChunkPos::new(self.x + dx, self.y + dy))
  }
}

/// Global cell rectangle, half-open: `[x, x + width) × [y, y + height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
  pub x: i32,
  pub y: i32,
  pub width: u32,
  pub height: u32,
}

impl CellRect {
  /// Creates a new rectangle.
  pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  /// Returns true if the rectangle covers no cells.
  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  /// Returns true if `(x, y)` lies inside the rectangle.
  pub fn contains(&self, x: i32, y: i32) -> bool {
    x >= self.x
      && y >= self.y
      && (x as i64) < self.x as i64 + self.width as i64
      && (y as i64) < self.y as i64 + self.height as i64
  }

  /// Iterates every cell coordinate, row by row.
  pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
    (self.y..self.y + self.height as i32)
      .flat_map(move |y| (self.x..self.x + self.width as i32).map(move |x| (x, y)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn containing_uses_floor_division() {
    assert_eq!(ChunkPos::containing(0, 0, 10, 8), ChunkPos::new(0, 0));
    assert_eq!(ChunkPos::containing(9, 7, 10, 8), ChunkPos::new(0, 0));
    assert_eq!(ChunkPos::containing(10, 8, 10, 8), ChunkPos::new(1, 1));
    assert_eq!(ChunkPos::containing(-1, -1, 10, 8), ChunkPos::new(-1, -1));
  }

  #[test]
  fn neighbors_excludes_self() {
    let center = ChunkPos::new(3, 4);
    let all: Vec<_> = center.neighbors().collect();
    assert_eq!(all.len(), 8);
    assert!(!all.contains(&center));
    assert!(all.contains(&ChunkPos::new(2, 3)));
    assert!(all.contains(&ChunkPos::new(4, 5)));
  }

  #[test]
  fn rect_cells_cover_area() {
    let rect = CellRect::new(-1, 2, 3, 2);
    let cells: Vec<_> = rect.cells().collect();
    assert_eq!(cells.len(), 6);
    assert!(cells.iter().all(|&(x, y)| rect.contains(x, y)));
    assert!(!rect.contains(2, 2));
  }
}
