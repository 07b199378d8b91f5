//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use autoscaler_config::config::{load_config, ConfigError, DocumentFormat, LoadedConfig};
use serde_json::{json, Value};

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Minimal pod manifest that satisfies the required sub-fields.
pub fn pod_config(cpu: &str) -> Value {
    json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "spec": {
            "restartPolicy": "Never",
            "containers": [{
                "name": "ray-node",
                "image": "rayproject/ray:nightly",
                "resources": {"requests": {"cpu": cpu, "memory": "512Mi"}}
            }]
        }
    })
}

/// A valid flat document: one head type and one worker type.
pub fn valid_document() -> Value {
    json!({
        "name": "example-cluster",
        "maxWorkers": 3,
        "upscalingSpeed": 1.0,
        "idleTimeoutMinutes": 5,
        "headPodType": "head-node",
        "workerDefaultPodType": "worker-node",
        "podTypes": [
            {"name": "head-node", "podConfig": pod_config("1000m")},
            {"name": "worker-node", "minWorkers": 2, "maxWorkers": 3, "podConfig": pod_config("2")}
        ],
        "headStartRayCommands": [
            "ray stop",
            "ulimit -n 65536; ray start --head --port=6379"
        ],
        "workerStartRayCommands": [
            "ray stop",
            "ulimit -n 65536; ray start --address=$RAY_HEAD_IP:6379"
        ]
    })
}

/// Load a document tree through the JSON front end.
pub fn load(document: &Value) -> Result<LoadedConfig, ConfigError> {
    load_config(&document.to_string(), DocumentFormat::Json)
}

/// Errors from a load that is expected to fail validation.
pub fn errors(document: &Value) -> Vec<autoscaler_config::config::ValidationError> {
    match load(document) {
        Err(ConfigError::Invalid(report)) => report.errors,
        Err(other) => panic!("expected validation failure, got {other}"),
        Ok(loaded) => panic!("expected validation failure, loaded {:?}", loaded.config.name),
    }
}
