//! Configuration loading.
//!
//! `load_config` is the whole pipeline for one document and has no side
//! effects. `load_config_file` adds the disk read, logging and metrics.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::config::commands::check_start_commands;
use crate::config::defaults::normalize;
use crate::config::document::{parse_document, DocumentFormat, ParseError};
use crate::config::schema::ClusterConfig;
use crate::config::structure::extract;
use crate::config::validation::{validate_config, ValidationReport, ValidationWarning};
use crate::observability::metrics;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Invalid(ValidationReport),
}

impl ConfigError {
    /// The full error list, when the document parsed but did not validate.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            ConfigError::Invalid(report) => Some(report),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "io_error",
            ConfigError::Parse(_) => "parse_error",
            ConfigError::Invalid(_) => "invalid",
        }
    }
}

/// A validated configuration together with the warnings raised while loading it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedConfig {
    pub config: ClusterConfig,
    pub warnings: Vec<ValidationWarning>,
}

/// Parse, validate and normalize one document.
pub fn load_config(raw: &str, format: DocumentFormat) -> Result<LoadedConfig, ConfigError> {
    let document = parse_document(raw, format)?;

    let mut report = ValidationReport::default();
    let raw_config = extract(&document, &mut report);
    validate_config(&raw_config, &mut report);
    check_start_commands(&raw_config, &mut report);

    if report.has_errors() {
        return Err(ConfigError::Invalid(report));
    }

    match normalize(raw_config) {
        Some(config) => Ok(LoadedConfig {
            config,
            warnings: report.warnings,
        }),
        None => Err(ConfigError::Invalid(report)),
    }
}

/// Load and validate configuration from a file.
///
/// The format is inferred from the extension unless given.
pub fn load_config_file(
    path: &Path,
    format: Option<DocumentFormat>,
) -> Result<LoadedConfig, ConfigError> {
    let format = format.unwrap_or_else(|| DocumentFormat::from_path(path));
    let result = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|content| load_config(&content, format));

    match &result {
        Ok(loaded) => {
            tracing::info!(
                path = %path.display(),
                cluster = %loaded.config.name,
                pod_types = loaded.config.pod_types.len(),
                max_workers = loaded.config.max_workers,
                warnings = loaded.warnings.len(),
                "Configuration loaded"
            );
            for warning in &loaded.warnings {
                tracing::warn!(kind = warning.kind(), "{}", warning);
            }
            metrics::record_load("ok");
            metrics::record_warnings(loaded.warnings.len());
        }
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                outcome = e.outcome(),
                "Configuration rejected"
            );
            metrics::record_load(e.outcome());
            if let Some(report) = e.report() {
                metrics::record_validation_errors(report);
            }
        }
    }

    result
}
