//! Configuration file watcher for hot reload.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::document::DocumentFormat;
use crate::config::loader::{load_config_file, ConfigError, LoadedConfig};

/// A watcher that monitors the configuration file for changes.
///
/// Every reload attempt, successful or not, is forwarded so the receiver can
/// decide what stays active.
pub struct ConfigWatcher {
    path: PathBuf,
    format: Option<DocumentFormat>,
    update_tx: mpsc::UnboundedSender<Result<LoadedConfig, ConfigError>>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for reload results.
    pub fn new(
        path: &Path,
        format: Option<DocumentFormat>,
    ) -> (Self, mpsc::UnboundedReceiver<Result<LoadedConfig, ConfigError>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                format,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The parent directory is watched rather than the file itself, so that
    /// editors which save by renaming a temporary file are still seen.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let format = self.format;
        let file_name = self.path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if is_relevant(&event, file_name.as_ref()) {
                        tracing::info!("Config file change detected, reloading...");
                        let _ = tx.send(load_config_file(&path, format));
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watch_dir(&self.path), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Content-changing event that touches the watched file.
fn is_relevant(event: &Event, file_name: Option<&OsString>) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    match file_name {
        Some(file_name) => event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str())),
        None => false,
    }
}
