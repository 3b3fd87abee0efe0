//! Simulation cell format.

use rand::Rng;

use crate::material::Material;

/// Temperature a freshly spawned STEAM cell starts at.
pub const STEAM_SPAWN_TEMPERATURE: i32 = 100;
/// Temperature a freshly spawned FIRE cell starts at.
pub const FIRE_SPAWN_TEMPERATURE: i32 = 130;

/// A single grid cell.
///
/// `aux1`/`aux2` are material-specific:
/// - SAND: `aux1` wet flag
/// - SMOKE: `aux1` birth delay, `aux2` remaining lifetime
/// - FIRE: `aux1` flicker tint, `aux2` heat accumulator
/// - PLANT: `aux1` growth counter, `aux2` growth lock
/// - CLONE: `aux1` active this tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
  pub material: Material,
  pub temperature: i32,
  pub aux1: i32,
  pub aux2: i32,
  /// Fixed at creation, only used for rendering variety.
  pub color_jitter: i8,
}

impl Cell {
  pub const AIR: Self = Self {
    material: Material::Air,
    temperature: 0,
    aux1: 0,
    aux2: 0,
    color_jitter: 0,
  };

  /// Creates a cell with material-specific initial state and no jitter.
  ///
  /// Deterministic counterpart of [`Cell::spawn`], handy for tests and
  /// for placing cells whose fields are set explicitly afterwards.
  pub const fn of(material: Material) -> Self {
    Self {
      material,
      temperature: 0,
      aux1: 0,
      aux2: 0,
      color_jitter: 0,
    }
  }

  /// Creates a fresh cell with its material's randomized initial fields.
  pub fn spawn<R: Rng + ?Sized>(material: Material, rng: &mut R) -> Self {
    if material.is_air() {
      return Self::AIR;
    }

    let mut cell = Self {
      material,
      color_jitter: rng.random_range(-10..10),
      ..Self::AIR
    };
    match material {
      Material::Smoke => {
        cell.aux1 = 90 + rng.random_range(-20..20);
        cell.aux2 = 90;
      }
      Material::Steam => cell.temperature = STEAM_SPAWN_TEMPERATURE,
      Material::Fire => {
        cell.aux1 = rng.random_range(0..60);
        cell.temperature = FIRE_SPAWN_TEMPERATURE;
      }
      Material::Plant => cell.aux1 = rng.random_range(1..=18),
      _ => {}
    }
    cell
  }

  /// Sets the temperature, builder style.
  pub const fn with_temperature(mut self, temperature: i32) -> Self {
    self.temperature = temperature;
    self
  }

  /// Returns true if the cell is air (empty space).
  #[inline]
  pub const fn is_air(&self) -> bool {
    self.material.is_air()
  }

  /// Collapses any AIR cell to the canonical [`Cell::AIR`].
  #[inline]
  pub(crate) fn normalized(self) -> Self {
    if self.is_air() { Self::AIR } else { self }
  }
}
