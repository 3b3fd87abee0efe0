//! State transitions (phase 3): decay, phase changes, combustion and
//! replication.

use rand::Rng;

use super::CARDINAL;
use super::worker::Worker;
use crate::cell::Cell;
use crate::material::Material;

/// Per-neighbor chance that fire spreads into a flammable cell.
pub const IGNITE_CHANCE: f64 = 0.35;
/// Chance that burnt-out fire leaves smoke behind.
pub const SMOKE_CHANCE: f64 = 0.1;
/// Water at or above this temperature may boil.
pub const BOILING_POINT: i32 = 100;
/// Sand at or above this temperature melts into glass.
pub const MELTING_POINT: i32 = 120;
/// Wet sand at or above this temperature dries.
pub const DRYING_POINT: i32 = 30;

/// Chance per tick that water at `temperature` turns to steam.
///
/// Interpolates from 30% at the boiling point to 70% at 150 and above.
pub fn boil_chance(temperature: i32) -> f64 {
  let t = (temperature as f64 / 150.0).clamp(0.0, 1.0);
  0.3 + 0.4 * t
}

pub(crate) fn update(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  match cell.material {
    Material::Smoke => smoke(worker, x, y),
    Material::Steam => {
      if cell.temperature < BOILING_POINT {
        let water = Cell::spawn(Material::Water, worker.rng());
        worker.set_cell(x, y, water);
      }
    }
    Material::Water => water(worker, x, y, cell),
    Material::Sand => sand(worker, x, y, cell),
    Material::Fire => fire(worker, x, y, cell),
    Material::Clone => replicate(worker, x, y, cell),
    Material::Plant
    | Material::Stone
    | Material::Wood
    | Material::Wall
    | Material::Iron
    | Material::Glass
    | Material::Air => {}
  }
}

fn smoke(worker: &mut Worker<'_>, x: i32, y: i32) {
  worker.modify_cell(x, y, |smoke| {
    if smoke.material != Material::Smoke {
      return;
    }
    if smoke.aux1 > 0 {
      smoke.aux1 -= 1;
    } else {
      smoke.aux2 -= 1;
      if smoke.aux2 <= 0 {
        *smoke = Cell::AIR;
      }
    }
  });
}

fn water(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  if cell.temperature >= BOILING_POINT && worker.rng().random_bool(boil_chance(cell.temperature)) {
    let steam = Cell::spawn(Material::Steam, worker.rng());
    worker.set_cell(x, y, steam);
  }

  // Soak into the first dry grain of the sand column below. Runs whether or
  // not the cell boiled; soaking always leaves AIR behind.
  let mut below = y + 1;
  while let Some(under) = worker.get_cell(x, below) {
    if under.material != Material::Sand {
      return;
    }
    if under.aux1 == 0 {
      let soaked = worker.modify_cell(x, below, |sand| {
        let dry = sand.material == Material::Sand && sand.aux1 == 0;
        if dry {
          sand.aux1 = 1;
        }
        dry
      });
      if soaked == Some(true) {
        worker.set_cell(x, y, Cell::AIR);
      }
      return;
    }
    below += 1;
  }
}

fn sand(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  if cell.temperature >= MELTING_POINT {
    let glass = Cell::spawn(Material::Glass, worker.rng());
    worker.set_cell(x, y, glass);
    return;
  }
  if cell.temperature >= DRYING_POINT && cell.aux1 != 0 {
    worker.modify_cell(x, y, |sand| {
      if sand.material == Material::Sand {
        sand.aux1 = 0;
      }
    });
  }
}

fn fire(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  if cell.temperature < 40 || cell.aux2 > 60 {
    let remains = if worker.rng().random_bool(SMOKE_CHANCE) {
      Cell::spawn(Material::Smoke, worker.rng())
    } else {
      Cell::AIR
    };
    worker.set_cell(x, y, remains);
  }

  // Burnt-out fire still gets its ignition rolls.
  for &(dx, dy) in &CARDINAL {
    let (nx, ny) = (x + dx, y + dy);
    let flammable = worker
      .get_cell(nx, ny)
      .is_some_and(|other| other.material.is_flammable());
    if !flammable || !worker.rng().random_bool(IGNITE_CHANCE) {
      continue;
    }
    let flame = Cell::spawn(Material::Fire, worker.rng());
    let ignited = worker.modify_cell(nx, ny, |other| {
      let burns = other.material.is_flammable();
      if burns {
        *other = flame;
      }
      burns
    });
    if ignited == Some(true) {
      worker.set_cell(x, y, Cell::AIR);
    }
  }
}

/// CLONE copies any non-CLONE neighbor into the free cell one step further
/// out along the same axis.
fn replicate(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  let mut active = false;
  for &(dx, dy) in &CARDINAL {
    let Some(near) = worker.get_cell(x + dx, y + dy) else {
      continue;
    };
    if near.is_air() || near.material == Material::Clone {
      continue;
    }
    let (fx, fy) = (x + 2 * dx, y + 2 * dy);
    if !worker.is_empty(fx, fy) {
      continue;
    }
    let copy = Cell::spawn(near.material, worker.rng());
    worker.set_cell(fx, fy, copy);
    active = true;
  }

  let flag = i32::from(active);
  if cell.aux1 != flag {
    worker.modify_cell(x, y, |clone| {
      if clone.material == Material::Clone {
        clone.aux1 = flag;
      }
    });
  }
}
