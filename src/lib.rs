//! Loader and validator for cluster autoscaler configuration.
//!
//! Turns a cluster document into a validated, normalized [`ClusterConfig`]
//! for an external reconciler, or into a report listing every defect found.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{load_config, load_config_file, ClusterConfig, ConfigError, LoadedConfig};
