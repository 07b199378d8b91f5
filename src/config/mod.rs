//! Cluster autoscaler configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config document (YAML/JSON/TOML)
//!     → document.rs (parse into an untyped tree)
//!     → structure.rs (required fields, primitive kinds, unknown-field warnings)
//!     → validation.rs (semantic checks, every violation collected)
//!     → commands.rs (start command lists)
//!     → defaults.rs + resources.rs (fill optional fields, autodetect CPU/GPU)
//!     → ClusterConfig (validated, immutable)
//!
//! On reload:
//!     watcher.rs detects change (or SIGHUP)
//!     → loader.rs loads new config
//!     → store.rs swaps it in whole, or keeps the last known-good one
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Parse errors abort immediately; everything after is collected
//! - Defaults are applied only to documents with no errors

pub mod commands;
mod defaults;
pub mod document;
pub mod loader;
pub mod resources;
pub mod schema;
pub mod store;
mod structure;
pub mod validation;
pub mod watcher;

pub use commands::{render_start_commands, HEAD_ADDRESS_PLACEHOLDER};
pub use document::{DocumentFormat, ParseError};
pub use loader::{load_config, load_config_file, ConfigError, LoadedConfig};
pub use schema::{ClusterConfig, NodeRole, PodType};
pub use store::{ConfigStore, ReloadOutcome};
pub use validation::{
    ReportEntry, SemanticRule, ValidationError, ValidationReport, ValidationWarning,
};
