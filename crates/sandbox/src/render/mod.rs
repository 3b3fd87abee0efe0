//! Rendering of the world into an RGBA byte buffer.
//!
//! The buffer is row-major with `stride` pixels per row and 4 bytes per
//! pixel. Only live chunks are written; pixels of absent chunks keep
//! whatever the caller put there.

mod rgba;

pub use rgba::Rgba;

use crate::cell::Cell;
use crate::material::Material;
use crate::world::World;

/// Alternate base color of wet sand.
const WET_SAND: Rgba = Rgba::rgb(0xb1, 0x9d, 0x5e);
/// Alternate base color of a young plant.
const YOUNG_PLANT: Rgba = Rgba::rgb(0x06, 0x59, 0x09);

/// Rendering switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
  /// Tint cells by temperature (red when hot, blue-green when cold).
  pub temperature_overlay: bool,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      temperature_overlay: true,
    }
  }
}

/// Error rendering into a caller-provided buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
  /// `stride` is narrower than the world.
  StrideTooSmall { stride: usize, width: usize },
  /// The buffer can't hold `height` rows of `stride` pixels.
  BufferTooSmall { needed: usize, actual: usize },
}

impl std::fmt::Display for RenderError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::StrideTooSmall { stride, width } => {
        write!(f, "stride {} is smaller than world width {}", stride, width)
      }
      Self::BufferTooSmall { needed, actual } => {
        write!(f, "buffer holds {} bytes, {} needed", actual, needed)
      }
    }
  }
}

impl std::error::Error for RenderError {}

/// Color of a single cell.
pub fn cell_color(cell: &Cell, options: RenderOptions) -> Rgba {
  let base = match cell.material {
    Material::Air => return Rgba::TRANSPARENT,
    Material::Sand if cell.aux1 != 0 => WET_SAND,
    Material::Plant if cell.aux1 < 2 => YOUNG_PLANT,
    material => material.color(),
  };

  let (mut r, mut g, mut b) = (0i32, 0i32, 0i32);
  if options.temperature_overlay {
    if cell.temperature < 0 {
      b = -cell.temperature;
      g = -cell.temperature / 30;
    } else {
      r = cell.temperature;
    }
  }
  if cell.material == Material::Fire {
    g += cell.aux1;
    let fade = cell.aux2 / 3;
    r -= fade;
    g -= fade;
    b -= fade;
  }

  let jitter = cell.color_jitter as i32;
  base.offset(r + jitter, g + jitter, b + jitter)
}

/// Number of bytes a buffer needs to hold a `width × height` image with
/// `stride` pixels per row.
pub fn required_len(width: usize, height: usize, stride: usize) -> usize {
  if width == 0 || height == 0 {
    return 0;
  }
  ((height - 1) * stride + width) * 4
}

impl World {
  /// Renders with default options.
  pub fn render(&self, buffer: &mut [u8], stride: usize) -> Result<(), RenderError> {
    self.render_with(buffer, stride, RenderOptions::default())
  }

  /// Writes every cell of every live chunk into `buffer`.
  #[cfg_attr(feature = "tracy", tracing::instrument(skip_all))]
  pub fn render_with(&self, buffer: &mut [u8], stride: usize, options: RenderOptions) -> Result<(), RenderError> {
    let width = self.width() as usize;
    let height = self.height() as usize;
    if stride < width {
      return Err(RenderError::StrideTooSmall { stride, width });
    }
    let needed = required_len(width, height, stride);
    if buffer.len() < needed {
      return Err(RenderError::BufferTooSmall {
        needed,
        actual: buffer.len(),
      });
    }

    for chunk in self.table().iter() {
      let state = chunk.lock();
      let cw = chunk.width() as usize;
      for (index, cell) in state.cells().iter().enumerate() {
        let (x, y) = chunk.to_global((index % cw) as u32, (index / cw) as u32);
        let offset = (x as usize + y as usize * stride) * 4;
        buffer[offset..offset + 4].copy_from_slice(&cell_color(cell, options).to_array());
      }
    }
    Ok(())
  }

  /// Renders into a freshly allocated, tightly packed buffer.
  pub fn render_to_vec(&self, options: RenderOptions) -> Vec<u8> {
    let width = self.width() as usize;
    let mut buffer = vec![0; required_len(width, self.height() as usize, width)];
    // The buffer is sized for the world, so this cannot fail.
    let _ = self.render_with(&mut buffer, width, options);
    buffer
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn air_is_transparent() {
    let hot_air = Cell::AIR.with_temperature(500);
    assert_eq!(cell_color(&hot_air, RenderOptions::default()), Rgba::TRANSPARENT);
  }

  #[test]
  fn temperature_tints_by_sign() {
    let opts = RenderOptions::default();
    let stone = Cell::of(Material::Stone);
    assert_eq!(cell_color(&stone, opts), Rgba::rgb(0x80, 0x80, 0x80));
    assert_eq!(
      cell_color(&stone.with_temperature(40), opts),
      Rgba::rgb(0xa8, 0x80, 0x80)
    );
    assert_eq!(
      cell_color(&stone.with_temperature(-60), opts),
      Rgba::rgb(0x80, 0x82, 0xbc)
    );

    let no_overlay = RenderOptions {
      temperature_overlay: false,
    };
    assert_eq!(
      cell_color(&stone.with_temperature(40), no_overlay),
      Rgba::rgb(0x80, 0x80, 0x80)
    );
  }

  #[test]
  fn alternate_bases_and_fire_tint() {
    let opts = RenderOptions {
      temperature_overlay: false,
    };
    let wet = Cell {
      aux1: 1,
      ..Cell::of(Material::Sand)
    };
    assert_eq!(cell_color(&wet, opts), WET_SAND);

    let sprout = Cell {
      aux1: 1,
      ..Cell::of(Material::Plant)
    };
    assert_eq!(cell_color(&sprout, opts), YOUNG_PLANT);

    let fire = Cell {
      aux1: 20,
      aux2: 30,
      ..Cell::of(Material::Fire)
    };
    assert_eq!(cell_color(&fire, opts), Rgba::rgb(0xf4 - 10, 0x4d + 10, 0x2b - 10));
  }

  #[test]
  fn undersized_buffer_is_rejected() {
    let world = World::with_size(16, 16, 0).unwrap();
    let mut small = vec![0u8; 10];
    assert_eq!(
      world.render(&mut small, 16),
      Err(RenderError::BufferTooSmall {
        needed: 16 * 16 * 4,
        actual: 10,
      })
    );
    assert!(matches!(
      world.render(&mut small, 8),
      Err(RenderError::StrideTooSmall { .. })
    ));
  }
}
