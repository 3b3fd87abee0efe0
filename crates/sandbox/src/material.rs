//! Material definitions.
//!
//! The material set is closed: every rule in the simulation matches on
//! [`Material`] exhaustively, so adding a variant is a compile error until
//! each phase decides what the new material does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::render::Rgba;

/// Discrete type tag of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
  /// No particle. Always equivalent to an absent cell.
  #[default]
  Air,
  Sand,
  Glass,
  Water,
  Wall,
  Stone,
  Smoke,
  Steam,
  Wood,
  Fire,
  Iron,
  Clone,
  Plant,
}

/// How a material moves during the movement phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsState {
  /// Never moves.
  Static,
  /// Falls straight down only.
  Solid,
  /// Falls, slides diagonally, piles.
  Powder,
  /// Falls, slides diagonally, spreads sideways.
  Liquid,
  /// Rises, drifts diagonally and sideways.
  Gas,
}

impl Material {
  /// Every material, AIR first.
  pub const ALL: [Material; 13] = [
    Material::Air,
    Material::Sand,
    Material::Glass,
    Material::Water,
    Material::Wall,
    Material::Stone,
    Material::Smoke,
    Material::Steam,
    Material::Wood,
    Material::Fire,
    Material::Iron,
    Material::Clone,
    Material::Plant,
  ];

  /// Lowercase name, matching the serialized form.
  pub const fn name(self) -> &'static str {
    match self {
      Material::Air => "air",
      Material::Sand => "sand",
      Material::Glass => "glass",
      Material::Water => "water",
      Material::Wall => "wall",
      Material::Stone => "stone",
      Material::Smoke => "smoke",
      Material::Steam => "steam",
      Material::Wood => "wood",
      Material::Fire => "fire",
      Material::Iron => "iron",
      Material::Clone => "clone",
      Material::Plant => "plant",
    }
  }

  #[inline]
  pub const fn is_air(self) -> bool {
    matches!(self, Material::Air)
  }

  /// Heat transfer weight used by diffusion. Zero blocks transfer entirely
  /// when both sides are zero.
  pub const fn conductivity(self) -> i32 {
    match self {
      Material::Sand | Material::Clone | Material::Plant => 3,
      Material::Water => 5,
      Material::Stone | Material::Wood => 1,
      Material::Fire | Material::Glass => 2,
      Material::Steam | Material::Smoke => 6,
      Material::Iron => 8,
      Material::Wall | Material::Air => 0,
    }
  }

  /// Whether fire can spread into this material.
  pub const fn is_flammable(self) -> bool {
    matches!(self, Material::Wood | Material::Plant)
  }

  /// Default movement class, before per-cell state overrides it.
  ///
  /// Sand, glass, water and plant switch class depending on temperature and
  /// aux fields; see `simulation::movement`.
  pub const fn physics_state(self) -> PhysicsState {
    match self {
      Material::Sand | Material::Plant => PhysicsState::Powder,
      Material::Water => PhysicsState::Liquid,
      Material::Glass | Material::Stone => PhysicsState::Solid,
      Material::Smoke | Material::Steam | Material::Fire => PhysicsState::Gas,
      Material::Wall | Material::Wood | Material::Iron | Material::Clone | Material::Air => {
        PhysicsState::Static
      }
    }
  }

  /// Base render color.
  pub const fn color(self) -> Rgba {
    match self {
      Material::Sand => Rgba::rgb(0xc2, 0xb2, 0x80),
      Material::Water => Rgba::rgb(0x07, 0xa9, 0xbe),
      Material::Wall => Rgba::rgb(0x25, 0x25, 0x25),
      Material::Stone => Rgba::rgb(0x80, 0x80, 0x80),
      Material::Smoke => Rgba::rgb(0x10, 0x10, 0x10),
      Material::Steam => Rgba::rgb(0xad, 0xd8, 0xe6),
      Material::Wood => Rgba::rgb(0xba, 0x8c, 0x63),
      Material::Fire => Rgba::rgb(0xf4, 0x4d, 0x2b),
      Material::Glass => Rgba::rgb(0x9f, 0xc6, 0xc5),
      Material::Iron => Rgba::rgb(0x9c, 0x9c, 0x9c),
      Material::Clone => Rgba::rgb(0xe0, 0xc0, 0x30),
      Material::Plant => Rgba::rgb(0x14, 0x3d, 0x15),
      Material::Air => Rgba::TRANSPARENT,
    }
  }
}

impl fmt::Display for Material {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Error returned when parsing an unknown material name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMaterial(pub String);

impl fmt::Display for UnknownMaterial {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown material {:?}", self.0)
  }
}

impl std::error::Error for UnknownMaterial {}

impl FromStr for Material {
  type Err = UnknownMaterial;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let lower = s.trim().to_ascii_lowercase();
    Material::ALL
      .into_iter()
      .find(|m| m.name() == lower)
      .ok_or(UnknownMaterial(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_round_trip_through_from_str() {
    for material in Material::ALL {
      assert_eq!(material.name().parse::<Material>(), Ok(material));
    }
    assert_eq!("  WATER ".parse::<Material>(), Ok(Material::Water));
    assert!("lava".parse::<Material>().is_err());
  }

  #[test]
  fn conductivity_table() {
    assert_eq!(Material::Iron.conductivity(), 8);
    assert_eq!(Material::Wall.conductivity(), 0);
    assert_eq!(Material::Air.conductivity(), 0);
    assert_eq!(Material::Steam.conductivity(), 6);
  }

  #[test]
  fn only_wood_and_plant_burn() {
    let flammable: Vec<_> = Material::ALL.into_iter().filter(|m| m.is_flammable()).collect();
    assert_eq!(flammable, vec![Material::Wood, Material::Plant]);
  }
}
