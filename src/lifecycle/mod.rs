//! Lifecycle management for the long-running `watch` command.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop watching, exit
//!     SIGHUP → re-read the configuration file now
//! ```

pub mod signals;
