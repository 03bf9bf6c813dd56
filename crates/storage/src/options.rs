//! Chunk configuration
//!
//! ```toml
//! data_size = 65536
//! verify_on_recover = true
//! ```

use cellchunk_core::{Error, Result};
use cellchunk_durability::CHUNK_HEADER_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default data region size (2 MiB)
pub const DEFAULT_DATA_SIZE: usize = 2 * 1024 * 1024;

/// Largest data region whose offsets still fit the i32 frame fields
pub const MAX_DATA_SIZE: usize = i32::MAX as usize - CHUNK_HEADER_SIZE;

/// Options for creating and recovering chunks
///
/// Use the builder pattern or load from TOML:
///
/// ```ignore
/// use cellchunk_storage::ChunkOptions;
///
/// let opts = ChunkOptions::new().data_size(64 * 1024);
/// let opts = ChunkOptions::from_toml_str("data_size = 4096")?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkOptions {
    /// Bytes available for record frames, excluding the header
    pub data_size: usize,
    /// Walk every frame of a recovered chunk before accepting it
    pub verify_on_recover: bool,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        ChunkOptions {
            data_size: DEFAULT_DATA_SIZE,
            verify_on_recover: true,
        }
    }
}

impl ChunkOptions {
    /// Default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Small chunks (64 KiB), for tests and low-volume stores
    pub fn small() -> Self {
        ChunkOptions {
            data_size: 64 * 1024,
            ..Default::default()
        }
    }

    /// Large chunks (8 MiB)
    pub fn large() -> Self {
        ChunkOptions {
            data_size: 8 * 1024 * 1024,
            ..Default::default()
        }
    }

    /// Set the data region size
    pub fn data_size(mut self, data_size: usize) -> Self {
        self.data_size = data_size;
        self
    }

    /// Enable or disable frame verification on recovery
    pub fn verify_on_recover(mut self, verify: bool) -> Self {
        self.verify_on_recover = verify;
        self
    }

    /// Check the options for values no chunk can honor
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an empty or oversized data region.
    pub fn validate(&self) -> Result<()> {
        if self.data_size == 0 {
            return Err(Error::InvalidConfig("data_size must be positive".into()));
        }
        if self.data_size > MAX_DATA_SIZE {
            return Err(Error::InvalidConfig(format!(
                "data_size {} exceeds maximum {}",
                self.data_size, MAX_DATA_SIZE
            )));
        }
        Ok(())
    }

    /// Parse and validate options from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let options: ChunkOptions =
            toml::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Parse and validate options from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
