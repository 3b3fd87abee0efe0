//! Debug introspection of live chunks.
//!
//! For visualization only; nothing in the simulation reads it back.

use super::World;
use crate::coords::CellRect;
use crate::coords::ChunkPos;

/// Snapshot of one live chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkOverlay {
  pub pos: ChunkPos,
  /// Global rectangle covered by the chunk.
  pub bounds: CellRect,
  /// Committed dirty rect in global coordinates, `None` when idle.
  pub dirty: Option<CellRect>,
  /// Non-AIR cells in the chunk.
  pub filled: usize,
}

impl World {
  /// Lists every live chunk in row-major grid order.
  pub fn debug_overlay(&self) -> Vec<ChunkOverlay> {
    self
      .table()
      .sorted()
      .iter()
      .map(|chunk| {
        let rect = chunk.committed_rect();
        let dirty = (!rect.is_empty()).then(|| {
          let (x, y) = chunk.to_global(rect.min_x, rect.min_y);
          CellRect::new(x, y, rect.width(), rect.height())
        });
        ChunkOverlay {
          pos: chunk.pos(),
          bounds: chunk.bounds(),
          dirty,
          filled: chunk.filled(),
        }
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use crate::config::SandboxConfig;
  use crate::material::Material;
  use crate::world::World;

  #[test]
  fn overlay_reports_dirty_region_after_tick() {
    let mut world = World::new(SandboxConfig {
      chunk_width: 16,
      chunk_height: 16,
      grid_width: 2,
      grid_height: 2,
      seed: 3,
    })
    .unwrap();
    world.spawn(20, 20, Material::Wall);
    world.tick();

    let overlay = world.debug_overlay();
    let owner = overlay
      .iter()
      .find(|o| o.bounds.contains(20, 20))
      .expect("owning chunk listed");
    assert_eq!(owner.filled, 1);
    let dirty = owner.dirty.expect("wall write still committed");
    assert!(dirty.contains(20, 20));
    assert!(overlay.windows(2).all(|w| w[0].pos < w[1].pos));
  }
}
