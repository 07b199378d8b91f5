//! Active configuration with atomic replacement.
//!
//! # Responsibilities
//! - Hold the last known-good configuration
//! - Swap in a new configuration as a whole, never partially
//! - Keep the current configuration when a reload fails
//!
//! # Design Decisions
//! - Readers take an `Arc` snapshot; a reload never changes a snapshot in hand
//! - A reload producing an identical configuration is not counted as a change

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::document::DocumentFormat;
use crate::config::loader::{load_config_file, ConfigError, LoadedConfig};
use crate::observability::metrics;

/// What a reload did to the active configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// A different configuration is now active.
    Applied { generation: u64 },
    /// The new document normalized to the active configuration.
    Unchanged,
}

/// Shared holder of the active configuration.
pub struct ConfigStore {
    current: ArcSwap<LoadedConfig>,
    generation: AtomicU64,
}

impl ConfigStore {
    pub fn new(initial: LoadedConfig) -> Self {
        metrics::record_generation(1);
        Self {
            current: ArcSwap::from_pointee(initial),
            generation: AtomicU64::new(1),
        }
    }

    /// Load the initial configuration from disk. Fails if it does not validate.
    pub fn open(path: &Path, format: Option<DocumentFormat>) -> Result<Self, ConfigError> {
        load_config_file(path, format).map(Self::new)
    }

    /// Snapshot of the active configuration.
    pub fn current(&self) -> Arc<LoadedConfig> {
        self.current.load_full()
    }

    /// Number of configurations applied so far, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Apply the result of a load.
    ///
    /// On error the active configuration stays in place and the error is
    /// handed back for the caller to surface.
    pub fn apply(
        &self,
        result: Result<LoadedConfig, ConfigError>,
    ) -> Result<ReloadOutcome, ConfigError> {
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(
                    generation = self.generation(),
                    outcome = e.outcome(),
                    "Failed to reload config: {}. Keeping current configuration.",
                    e
                );
                return Err(e);
            }
        };

        if *self.current.load_full() == loaded {
            tracing::debug!("Reloaded configuration is unchanged");
            return Ok(ReloadOutcome::Unchanged);
        }

        self.current.store(Arc::new(loaded));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        metrics::record_generation(generation);
        tracing::info!(generation, "Configuration applied");
        Ok(ReloadOutcome::Applied { generation })
    }

    /// Re-read a file and apply it.
    pub fn reload_from(
        &self,
        path: &Path,
        format: Option<DocumentFormat>,
    ) -> Result<ReloadOutcome, ConfigError> {
        self.apply(load_config_file(path, format))
    }
}
