//! Configuration for SlotKV
//!
//! Centralized container configuration with sensible defaults.

use std::path::{Path, PathBuf};

/// Configuration for a single file-backed container
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding both container files
    /// Internal structure:
    ///   {directory}/
    ///     ├── {prefix}_data.dat   (fixed-width slots)
    ///     └── {prefix}_meta.dat   (metadata side file)
    pub directory: PathBuf,

    /// File name prefix shared by the data and metadata files
    pub prefix: String,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// When the data file is fsynced
    pub sync_policy: SyncPolicy,
}

/// Data file sync policy
///
/// The metadata side file is always synced when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Leave flushing to the OS
    Never,

    /// fsync once when the container is closed
    OnClose,

    /// fsync after every reserve/update/remove (safest, slowest)
    EveryWrite,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./slotkv_data"),
            prefix: "container".to_string(),
            sync_policy: SyncPolicy::OnClose,
        }
    }
}

impl ContainerConfig {
    const DATA_SUFFIX: &'static str = "_data.dat";
    const META_SUFFIX: &'static str = "_meta.dat";

    /// Create a new config builder
    pub fn builder() -> ContainerConfigBuilder {
        ContainerConfigBuilder::default()
    }

    /// Path of the slot data file
    pub fn data_path(&self) -> PathBuf {
        self.file_path(Self::DATA_SUFFIX)
    }

    /// Path of the metadata side file
    pub fn meta_path(&self) -> PathBuf {
        self.file_path(Self::META_SUFFIX)
    }

    /// The container directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_path(&self, suffix: &str) -> PathBuf {
        self.directory.join(format!("{}{}", self.prefix, suffix))
    }
}

/// Builder for ContainerConfig
#[derive(Default)]
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Set the directory holding the container files
    pub fn directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.directory = path.into();
        self
    }

    /// Set the file name prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Set the data file sync policy
    pub fn sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.config.sync_policy = policy;
        self
    }

    pub fn build(self) -> ContainerConfig {
        self.config
    }
}
