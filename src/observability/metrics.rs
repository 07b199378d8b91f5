//! Metrics collection and exposition.
//!
//! # Metrics
//! - `autoscaler_config_loads_total` (counter): load attempts by outcome
//! - `autoscaler_config_validation_errors_total` (counter): rejected-load errors by kind
//! - `autoscaler_config_warnings` (gauge): warnings on the last successful load
//! - `autoscaler_config_generation` (gauge): generation of the active configuration

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::config::validation::ValidationReport;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_load(outcome: &'static str) {
    counter!("autoscaler_config_loads_total", "outcome" => outcome).increment(1);
}

pub fn record_validation_errors(report: &ValidationReport) {
    for error in &report.errors {
        counter!("autoscaler_config_validation_errors_total", "kind" => error.kind()).increment(1);
    }
}

pub fn record_warnings(count: usize) {
    gauge!("autoscaler_config_warnings").set(count as f64);
}

pub fn record_generation(generation: u64) {
    gauge!("autoscaler_config_generation").set(generation as f64);
}
