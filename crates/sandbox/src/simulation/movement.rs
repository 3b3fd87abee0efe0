//! Movement rules (phase 1).
//!
//! Rules only decide; every move is recorded on the destination chunk and
//! executed after all workers finish, so decisions never observe each other.

use rand::Rng;

use super::worker::Worker;
use crate::cell::Cell;
use crate::material::{Material, PhysicsState};

/// Movement class of a cell after its temperature and aux state are taken
/// into account.
pub fn effective_state(cell: &Cell) -> PhysicsState {
  match cell.material {
    // Wet sand clumps until it dries out.
    Material::Sand if cell.aux1 == 1 && cell.temperature < 30 => PhysicsState::Solid,
    Material::Glass if cell.temperature >= 30 => PhysicsState::Liquid,
    Material::Water if cell.temperature <= -80 => PhysicsState::Solid,
    Material::Plant if cell.aux2 != 0 => PhysicsState::Static,
    material => material.physics_state(),
  }
}

pub(crate) fn update(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  match effective_state(&cell) {
    PhysicsState::Static => {}
    PhysicsState::Solid => solid_fall(worker, x, y),
    PhysicsState::Powder => powder_fall(worker, x, y),
    PhysicsState::Liquid => liquid_fall(worker, x, y),
    PhysicsState::Gas => {
      let (_, to_y) = gas_rise(worker, x, y);
      if cell.material == Material::Fire {
        // Fire that can't rise builds up heat and eventually burns out.
        worker.modify_cell(x, y, |fire| {
          fire.aux2 = if to_y == y { fire.aux2 + 1 } else { fire.aux2 - 1 };
        });
      }
    }
  }
}

/// Picks a free diagonal neighbor at vertical offset `y_offset`.
///
/// A side is free only if both the cell beside `(x, y)` and the target cell
/// are empty. With both sides free one is chosen uniformly.
fn random_open_neighbor(worker: &mut Worker<'_>, x: i32, y: i32, y_offset: i32) -> Option<(i32, i32)> {
  let target_y = y + y_offset;
  let left_free =
    worker.in_bounds(x - 1, target_y) && worker.is_empty(x - 1, y) && worker.is_empty(x - 1, target_y);
  let right_free =
    worker.in_bounds(x + 1, target_y) && worker.is_empty(x + 1, y) && worker.is_empty(x + 1, target_y);

  match (left_free, right_free) {
    (true, true) => {
      if worker.rng().random_bool(0.5) {
        Some((x - 1, target_y))
      } else {
        Some((x + 1, target_y))
      }
    }
    (true, false) => Some((x - 1, target_y)),
    (false, true) => Some((x + 1, target_y)),
    (false, false) => None,
  }
}

fn solid_fall(worker: &mut Worker<'_>, x: i32, y: i32) {
  if worker.is_empty(x, y + 1) {
    worker.move_cell(x, y, x, y + 1);
  }
}

fn powder_fall(worker: &mut Worker<'_>, x: i32, y: i32) {
  if worker.is_empty(x, y + 1) {
    worker.move_cell(x, y, x, y + 1);
  } else if let Some((to_x, to_y)) = random_open_neighbor(worker, x, y, 1) {
    worker.move_cell(x, y, to_x, to_y);
  }
}

fn liquid_fall(worker: &mut Worker<'_>, x: i32, y: i32) {
  if worker.is_empty(x, y + 1) {
    worker.move_cell(x, y, x, y + 1);
  } else if let Some((to_x, to_y)) =
    random_open_neighbor(worker, x, y, 1).or_else(|| random_open_neighbor(worker, x, y, 0))
  {
    worker.move_cell(x, y, to_x, to_y);
  }
}

/// Rises with 50% chance when the cell above is free, otherwise drifts
/// diagonally up or sideways. Returns the chosen destination, or `(x, y)`
/// if the cell stays.
fn gas_rise(worker: &mut Worker<'_>, x: i32, y: i32) -> (i32, i32) {
  let to = if worker.is_empty(x, y - 1) && worker.rng().random_bool(0.5) {
    Some((x, y - 1))
  } else {
    random_open_neighbor(worker, x, y, -1).or_else(|| random_open_neighbor(worker, x, y, 0))
  };
  match to {
    Some((to_x, to_y)) => {
      worker.move_cell(x, y, to_x, to_y);
      (to_x, to_y)
    }
    None => (x, y),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_overrides() {
    let wet_cold_sand = Cell {
      aux1: 1,
      ..Cell::of(Material::Sand)
    };
    assert_eq!(effective_state(&wet_cold_sand), PhysicsState::Solid);
    assert_eq!(
      effective_state(&wet_cold_sand.with_temperature(30)),
      PhysicsState::Powder
    );

    let glass = Cell::of(Material::Glass);
    assert_eq!(effective_state(&glass), PhysicsState::Solid);
    assert_eq!(effective_state(&glass.with_temperature(30)), PhysicsState::Liquid);

    let water = Cell::of(Material::Water);
    assert_eq!(effective_state(&water.with_temperature(-79)), PhysicsState::Liquid);
    assert_eq!(effective_state(&water.with_temperature(-80)), PhysicsState::Solid);

    let locked_plant = Cell {
      aux2: 1,
      ..Cell::of(Material::Plant)
    };
    assert_eq!(effective_state(&locked_plant), PhysicsState::Static);
    assert_eq!(effective_state(&Cell::of(Material::Plant)), PhysicsState::Powder);
    assert_eq!(effective_state(&Cell::of(Material::Clone)), PhysicsState::Static);
  }
}
