//! Sandbox - chunked falling-sand simulation engine.
//!
//! A 2D grid of typed cells split into lazily created chunks. Each tick runs
//! movement, move resolution, heat diffusion and state transitions in
//! parallel over the chunks whose dirty rects say something may change.
//!
//! ```
//! use sandbox::{Material, World};
//!
//! let mut world = World::with_size(64, 64, 7).unwrap();
//! world.spawn(5, 0, Material::Sand);
//! world.tick();
//! assert_eq!(world.get_cell(5, 1).unwrap().material, Material::Sand);
//! ```

pub mod cell;
pub mod config;
pub mod coords;
pub mod material;
pub mod primitives;
pub mod render;
pub mod simulation;
pub mod world;

pub use cell::Cell;
pub use config::{ConfigError, SandboxConfig};
pub use coords::{CellRect, ChunkPos};
pub use material::{Material, PhysicsState, UnknownMaterial};
pub use primitives::{Chunk, DirtyRect};
pub use render::{RenderError, RenderOptions, Rgba};
pub use simulation::{Phase, TickStats};
pub use world::{ChunkOverlay, World};
