//! RGBA color type.

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Rgba {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Rgba {
  /// Creates a new RGBA color.
  #[inline]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// Creates an opaque RGB color (alpha = 255).
  #[inline]
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b, a: 255 }
  }

  /// Transparent black.
  pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

  /// Adds signed offsets to each color channel, clamping to `[0, 255]`.
  /// Alpha is kept.
  #[inline]
  pub fn offset(self, dr: i32, dg: i32, db: i32) -> Self {
    #[inline]
    fn channel(base: u8, delta: i32) -> u8 {
      (base as i32).saturating_add(delta).clamp(0, 255) as u8
    }
    Self {
      r: channel(self.r, dr),
      g: channel(self.g, dg),
      b: channel(self.b, db),
      a: self.a,
    }
  }

  #[inline]
  pub const fn to_array(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }
}
