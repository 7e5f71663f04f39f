//! Configuration for tinycol
//!
//! Construction-time knobs with sensible defaults.

use crate::column::{ColumnType, TypeSet};

/// Configuration applied when a table is created or loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Type Configuration
    // -------------------------------------------------------------------------
    /// Column types accepted by insert, query and index entry points.
    /// Defaults to everything the build compiled in (see Cargo features).
    pub enabled_types: TypeSet,

    // -------------------------------------------------------------------------
    // Snapshot Configuration
    // -------------------------------------------------------------------------
    /// Re-derive the primary-key index and free list after `load`.
    /// When false a loaded table has an empty hash index and free list.
    pub reindex_on_load: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_types: TypeSet::compiled(),
            reindex_on_load: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Replace the enabled type set (clamped to what the build compiled in)
    pub fn enabled_types(mut self, types: TypeSet) -> Self {
        self.config.enabled_types = types.intersect(TypeSet::compiled());
        self
    }

    /// Disable a single column type
    pub fn disable(mut self, column_type: ColumnType) -> Self {
        self.config.enabled_types = self.config.enabled_types.without(column_type);
        self
    }

    /// Rebuild the hash index and free list when loading snapshots
    pub fn reindex_on_load(mut self, enabled: bool) -> Self {
        self.config.reindex_on_load = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
