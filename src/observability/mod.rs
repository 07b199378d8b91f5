//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! loader / store / watcher produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (load outcomes, error kinds, active generation)
//!
//! Consumers:
//!     → stderr (human-readable or JSON lines)
//!     → Prometheus scrape endpoint (optional, `watch` only)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so command output on stdout stays machine-readable
//! - Metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
