//! World configuration.
//!
//! Loaded from TOML; every field has a default so partial files are valid.
//!
//! ```toml
//! chunk_width = 64
//! chunk_height = 64
//! grid_width = 8
//! grid_height = 8
//! seed = 42
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Chunk-grid extent used when deriving a config from a world size.
pub const DEFAULT_GRID: u32 = 8;

/// Smallest allowed chunk side. CLONE writes two cells away, which must land
/// at most one chunk over.
pub const MIN_CHUNK_SIDE: u32 = 2;

/// Configuration for a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
  /// Cells per chunk along X.
  pub chunk_width: u32,
  /// Cells per chunk along Y.
  pub chunk_height: u32,
  /// Maximum number of chunk columns.
  pub grid_width: u32,
  /// Maximum number of chunk rows.
  pub grid_height: u32,
  /// Seed for all simulation randomness.
  pub seed: u64,
}

impl Default for SandboxConfig {
  fn default() -> Self {
    Self {
      chunk_width: 64,
      chunk_height: 64,
      grid_width: DEFAULT_GRID,
      grid_height: DEFAULT_GRID,
      seed: 0,
    }
  }
}

impl SandboxConfig {
  /// Splits a `width × height` world into an 8×8 chunk grid.
  ///
  /// Sizes that don't divide evenly round the chunk size up, so the grid
  /// always covers the requested area.
  pub fn for_world_size(width: u32, height: u32) -> Self {
    let config = Self {
      chunk_width: width.div_ceil(DEFAULT_GRID).max(MIN_CHUNK_SIDE),
      chunk_height: height.div_ceil(DEFAULT_GRID).max(MIN_CHUNK_SIDE),
      ..Self::default()
    };
    if config.world_width() != width || config.world_height() != height {
      log::warn!(
        "World size {}x{} rounded up to {}x{}",
        width,
        height,
        config.world_width(),
        config.world_height()
      );
    }
    config
  }

  /// Sets the seed, builder style.
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = seed;
    self
  }

  /// Width of the whole world in cells.
  pub fn world_width(&self) -> u32 {
    self.chunk_width.saturating_mul(self.grid_width)
  }

  /// Height of the whole world in cells.
  pub fn world_height(&self) -> u32 {
    self.chunk_height.saturating_mul(self.grid_height)
  }

  /// Checks the invariants the engine relies on.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.chunk_width < MIN_CHUNK_SIDE || self.chunk_height < MIN_CHUNK_SIDE {
      return Err(ConfigError::Invalid(format!(
        "chunk size {}x{} is below the {MIN_CHUNK_SIDE}x{MIN_CHUNK_SIDE} minimum",
        self.chunk_width, self.chunk_height
      )));
    }
    if self.grid_width == 0 || self.grid_height == 0 {
      return Err(ConfigError::Invalid(format!(
        "chunk grid {}x{} is empty",
        self.grid_width, self.grid_height
      )));
    }
    let cells = self.world_width() as u64 * self.world_height() as u64;
    if self.world_width() > i32::MAX as u32 / 2 || self.world_height() > i32::MAX as u32 / 2 {
      return Err(ConfigError::Invalid(format!(
        "world of {cells} cells exceeds the coordinate range"
      )));
    }
    let chunk_cells = self.chunk_width as u64 * self.chunk_height as u64;
    if chunk_cells > u32::MAX as u64 {
      return Err(ConfigError::Invalid(format!(
        "chunk of {chunk_cells} cells is too large to index"
      )));
    }
    Ok(())
  }

  /// Parses and validates a TOML document.
  pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
    let config: Self = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  /// Reads, parses and validates a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config = Self::from_toml_str(&contents)?;
    log::debug!("Loaded sandbox config from {}", path.display());
    Ok(config)
  }

  /// Serializes to TOML.
  pub fn to_toml_string(&self) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(self)?)
  }
}

/// Error loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
  Io(io::Error),
  Parse(toml::de::Error),
  Serialize(toml::ser::Error),
  Invalid(String),
}

impl From<io::Error> for ConfigError {
  fn from(err: io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(err: toml::de::Error) -> Self {
    Self::Parse(err)
  }
}

impl From<toml::ser::Error> for ConfigError {
  fn from(err: toml::ser::Error) -> Self {
    Self::Serialize(err)
  }
}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Io(e) => write!(f, "I/O error: {}", e),
      Self::Parse(e) => write!(f, "parse error: {}", e),
      Self::Serialize(e) => write!(f, "serialize error: {}", e),
      Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
    }
  }
}

impl std::error::Error for ConfigError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      Self::Serialize(e) => Some(e),
      Self::Invalid(_) => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  #[test]
  fn partial_file_uses_defaults() {
    let config = SandboxConfig::from_toml_str("seed = 9\nchunk_width = 16\n").unwrap();
    assert_eq!(config.seed, 9);
    assert_eq!(config.chunk_width, 16);
    assert_eq!(config.chunk_height, 64);
    assert_eq!(config.grid_width, DEFAULT_GRID);
  }

  #[test]
  fn rejects_tiny_chunks_and_empty_grid() {
    let tiny = SandboxConfig {
      chunk_width: 1,
      ..SandboxConfig::default()
    };
    assert!(matches!(tiny.validate(), Err(ConfigError::Invalid(_))));

    let empty = SandboxConfig {
      grid_height: 0,
      ..SandboxConfig::default()
    };
    assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));
  }

  #[test]
  fn rejects_chunks_too_large_to_index() {
    let huge = SandboxConfig {
      chunk_width: 70_000,
      chunk_height: 70_000,
      grid_width: 1,
      grid_height: 1,
      seed: 0,
    };
    assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));

    let tall = SandboxConfig {
      chunk_width: 16,
      chunk_height: 65_536,
      ..huge
    };
    assert!(tall.validate().is_ok());
  }

  #[test]
  fn world_size_is_covered() {
    let config = SandboxConfig::for_world_size(500, 300);
    assert_eq!(config.chunk_width, 63);
    assert_eq!(config.chunk_height, 38);
    assert!(config.world_width() >= 500);
    assert!(config.world_height() >= 300);
  }

  #[test]
  fn load_reports_parse_and_io_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "chunk_width = \"wide\"").unwrap();
    assert!(matches!(
      SandboxConfig::load(file.path()),
      Err(ConfigError::Parse(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
      SandboxConfig::load(dir.path().join("missing.toml")),
      Err(ConfigError::Io(_))
    ));
  }

  #[test]
  fn saved_config_loads_back() {
    let config = SandboxConfig::for_world_size(128, 64).with_seed(77);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sandbox.toml");
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();
    assert_eq!(SandboxConfig::load(&path).unwrap(), config);
  }
}
