//! Thermal diffusion (phase 2).
//!
//! Each hot or cold cell pushes `temperature / (k_self + k_neighbor)` into
//! every non-AIR cardinal neighbor. The amount is computed from the cell's
//! temperature as it was when the scan reached it, once per direction, so the
//! total transfer is not energy conserving.

use super::CARDINAL;
use super::worker::Worker;
use crate::cell::Cell;

/// Amount moved from a cell at `temperature` into a neighbor. Zero when
/// neither side conducts.
#[inline]
pub fn transfer(temperature: i32, k_self: i32, k_neighbor: i32) -> i32 {
  let k = k_self + k_neighbor;
  if k == 0 { 0 } else { temperature / k }
}

pub(crate) fn diffuse(worker: &mut Worker<'_>, x: i32, y: i32, cell: Cell) {
  if cell.temperature == 0 {
    return;
  }
  let snapshot = cell.temperature;
  let k_self = cell.material.conductivity();
  let mut given = 0i32;

  for &(dx, dy) in &CARDINAL {
    let (nx, ny) = (x + dx, y + dy);
    let Some(other) = worker.get_cell(nx, ny) else {
      continue;
    };
    if other.is_air() {
      continue;
    }
    let t = transfer(snapshot, k_self, other.material.conductivity());
    if t == 0 {
      continue;
    }
    let received = worker.modify_cell(nx, ny, |neighbor| {
      if neighbor.is_air() {
        return false;
      }
      neighbor.temperature = neighbor.temperature.saturating_add(t);
      true
    });
    if received == Some(true) {
      worker.keep_alive(nx, ny);
      given = given.saturating_add(t);
    }
  }

  if given != 0 {
    worker.modify_cell(x, y, |source| {
      if !source.is_air() {
        source.temperature = source.temperature.saturating_sub(given);
      }
    });
  }
}
