/// Chunk-local dirty rectangle, half-open: `[min_x, max_x) × [min_y, max_y)`.
///
/// The empty rect is inverted (`min > max`) so that expanding it by a single
/// coordinate yields exactly that coordinate's neighborhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRect {
  pub min_x: u32,
  pub min_y: u32,
  pub max_x: u32,
  pub max_y: u32,
}

impl DirtyRect {
  /// Creates an empty (inverted) rect.
  #[inline]
  pub const fn empty() -> Self {
    Self {
      min_x: u32::MAX,
      min_y: u32::MAX,
      max_x: 0,
      max_y: 0,
    }
  }

  /// Creates a rect covering a whole `width × height` chunk.
  #[inline]
  pub const fn full(width: u32, height: u32) -> Self {
    Self {
      min_x: 0,
      min_y: 0,
      max_x: width,
      max_y: height,
    }
  }

  /// Returns true if the rect covers no cells.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.min_x >= self.max_x || self.min_y >= self.max_y
  }

  /// Returns true if the local coordinate lies inside the rect.
  #[inline]
  pub const fn contains(&self, x: u32, y: u32) -> bool {
    x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
  }

  /// Expands the rect to include `(x, y)` plus `margin` cells on each side,
  /// clamped to a `width × height` chunk.
  pub fn expand_around(&mut self, x: u32, y: u32, margin: u32, width: u32, height: u32) {
    self.min_x = self.min_x.min(x.saturating_sub(margin));
    self.min_y = self.min_y.min(y.saturating_sub(margin));
    self.max_x = self.max_x.max(x.saturating_add(margin + 1).min(width));
    self.max_y = self.max_y.max(y.saturating_add(margin + 1).min(height));
  }

  /// Returns the smallest rect covering both rects.
  pub fn union(&self, other: &Self) -> Self {
    if self.is_empty() {
      return *other;
    }
    if other.is_empty() {
      return *self;
    }
    Self {
      min_x: self.min_x.min(other.min_x),
      min_y: self.min_y.min(other.min_y),
      max_x: self.max_x.max(other.max_x),
      max_y: self.max_y.max(other.max_y),
    }
  }

  /// Width of the rect, zero when empty.
  #[inline]
  pub fn width(&self) -> u32 {
    self.max_x.saturating_sub(self.min_x)
  }

  /// Height of the rect, zero when empty.
  #[inline]
  pub fn height(&self) -> u32 {
    self.max_y.saturating_sub(self.min_y)
  }

  /// Iterates the covered local coordinates column by column.
  ///
  /// Columns are the outer loop so a falling cell is visited before the
  /// cell that lands on top of it in the same scan.
  pub fn cells(self) -> impl Iterator<Item = (u32, u32)> {
    let (min_y, max_y) = if self.is_empty() {
      (0, 0)
    } else {
      (self.min_y, self.max_y)
    };
    let xs = if self.is_empty() {
      0..0
    } else {
      self.min_x..self.max_x
    };
    xs.flat_map(move |x| (min_y..max_y).map(move |y| (x, y)))
  }
}

impl Default for DirtyRect {
  fn default() -> Self {
    Self::empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_rect_has_no_cells() {
    let rect = DirtyRect::empty();
    assert!(rect.is_empty());
    assert_eq!(rect.cells().count(), 0);
    assert_eq!(rect.width(), 0);
    assert!(!rect.contains(0, 0));
  }

  #[test]
  fn expand_applies_margin_and_clamps() {
    let mut rect = DirtyRect::empty();
    rect.expand_around(0, 5, 2, 8, 8);
    assert_eq!(
      rect,
      DirtyRect {
        min_x: 0,
        min_y: 3,
        max_x: 3,
        max_y: 8,
      }
    );
    rect.expand_around(7, 0, 2, 8, 8);
    assert_eq!(rect, DirtyRect::full(8, 8));
  }

  #[test]
  fn union_ignores_empty_side() {
    let mut a = DirtyRect::empty();
    a.expand_around(4, 4, 0, 16, 16);
    assert_eq!(a.union(&DirtyRect::empty()), a);
    assert_eq!(DirtyRect::empty().union(&a), a);

    let mut b = DirtyRect::empty();
    b.expand_around(10, 1, 0, 16, 16);
    let u = a.union(&b);
    assert!(u.contains(4, 4) && u.contains(10, 1) && u.contains(7, 2));
    assert_eq!(u.cells().count(), (u.width() * u.height()) as usize);
  }
}
