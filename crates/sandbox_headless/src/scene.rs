//! Scene files: a world configuration plus the regions to fill before the
//! first tick.
//!
//! ```toml
//! ticks = 600
//! report_every = 100
//!
//! [world]
//! chunk_width = 32
//! chunk_height = 32
//! grid_width = 8
//! grid_height = 8
//!
//! [[fill]]
//! x = 0
//! y = 240
//! width = 256
//! height = 16
//! material = "stone"
//!
//! [[fill]]
//! x = 100
//! y = 200
//! width = 8
//! height = 8
//! material = "fire"
//! temperature = 400
//! ```

use std::io;
use std::path::Path;

use sandbox::{CellRect, ConfigError, Material, SandboxConfig, UnknownMaterial, World};
use serde::Deserialize;

/// Scene used when no file is given on the command line.
pub const DEMO_SCENE: &str = include_str!("../scenes/demo.toml");

/// A rectangle filled with fresh cells of one material.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Fill {
  pub x: i32,
  pub y: i32,
  pub width: u32,
  pub height: u32,
  /// Material name, case-insensitive.
  pub material: String,
  /// Overrides the material's spawn temperature.
  #[serde(default)]
  pub temperature: Option<i32>,
}

/// A loadable scene.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Scene {
  pub world: SandboxConfig,
  /// Ticks to run.
  pub ticks: u64,
  /// Log progress every this many ticks; 0 disables it.
  pub report_every: u64,
  pub fill: Vec<Fill>,
}

impl Default for Scene {
  fn default() -> Self {
    Self {
      world: SandboxConfig::default(),
      ticks: 300,
      report_every: 60,
      fill: Vec::new(),
    }
  }
}

impl Scene {
  pub fn from_toml_str(contents: &str) -> Result<Self, SceneError> {
    Ok(toml::from_str(contents)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
    let path = path.as_ref();
    log::debug!("Loading scene from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    Self::from_toml_str(&contents)
  }

  pub fn demo() -> Result<Self, SceneError> {
    Self::from_toml_str(DEMO_SCENE)
  }

  /// Creates the world and applies every fill in file order.
  ///
  /// `seed` replaces the configured seed when set.
  pub fn build(&self, seed: Option<u64>) -> Result<World, SceneError> {
    let mut config = self.world.clone();
    if let Some(seed) = seed {
      config.seed = seed;
    }
    let mut world = World::new(config)?;

    for fill in &self.fill {
      let material: Material = fill.material.parse()?;
      let rect = CellRect::new(fill.x, fill.y, fill.width, fill.height);
      let written = world.fill_rect(rect, material, fill.temperature);
      log::debug!(
        "Filled {} cells of {} at ({}, {}) {}x{}",
        written,
        material,
        fill.x,
        fill.y,
        fill.width,
        fill.height
      );
    }
    Ok(world)
  }
}

/// Error loading or building a scene.
#[derive(Debug)]
pub enum SceneError {
  Io(io::Error),
  Parse(toml::de::Error),
  Config(ConfigError),
  Material(UnknownMaterial),
}

impl std::fmt::Display for SceneError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SceneError::Io(e) => write!(f, "I/O error: {}", e),
      SceneError::Parse(e) => write!(f, "scene parse error: {}", e),
      SceneError::Config(e) => write!(f, "invalid world: {}", e),
      SceneError::Material(e) => write!(f, "invalid fill: {}", e),
    }
  }
}

impl std::error::Error for SceneError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      SceneError::Io(e) => Some(e),
      SceneError::Parse(e) => Some(e),
      SceneError::Config(e) => Some(e),
      SceneError::Material(e) => Some(e),
    }
  }
}

impl From<io::Error> for SceneError {
  fn from(e: io::Error) -> Self {
    SceneError::Io(e)
  }
}

impl From<toml::de::Error> for SceneError {
  fn from(e: toml::de::Error) -> Self {
    SceneError::Parse(e)
  }
}

impl From<ConfigError> for SceneError {
  fn from(e: ConfigError) -> Self {
    SceneError::Config(e)
  }
}

impl From<UnknownMaterial> for SceneError {
  fn from(e: UnknownMaterial) -> Self {
    SceneError::Material(e)
  }
}
