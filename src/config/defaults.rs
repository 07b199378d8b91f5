//! Defaulting of optional fields.
//!
//! Runs only once every pass has come back clean, so a default never hides an
//! omission that should have been reported.

use serde_json::{Map, Value};

use crate::config::resources::autodetect_resources;
use crate::config::schema::{ClusterConfig, PodType};
use crate::config::structure::{RawClusterConfig, RawPodType};

/// Build the normalized configuration from a validated raw document.
///
/// Returns `None` if a required field is absent, which the structural pass
/// has already reported.
pub(crate) fn normalize(raw: RawClusterConfig) -> Option<ClusterConfig> {
    let namespace = raw.namespace;
    let pod_types = raw
        .pod_types?
        .into_iter()
        .map(|pod_type| normalize_pod_type(pod_type, namespace.as_deref()))
        .collect::<Option<Vec<_>>>()?;

    Some(ClusterConfig {
        name: raw.name?,
        namespace,
        max_workers: u64::try_from(raw.max_workers?).ok()?,
        upscaling_speed: raw.upscaling_speed?,
        idle_timeout_minutes: u64::try_from(raw.idle_timeout_minutes?).ok()?,
        head_pod_type: raw.head_pod_type?,
        worker_default_pod_type: raw.worker_default_pod_type?,
        pod_types,
        head_start_ray_commands: raw.head_start_ray_commands?,
        worker_start_ray_commands: raw.worker_start_ray_commands?,
    })
}

fn normalize_pod_type(raw: RawPodType, namespace: Option<&str>) -> Option<PodType> {
    let mut pod_config = raw.pod_config?;
    if let Some(namespace) = namespace {
        fill_namespace(&mut pod_config, namespace);
    }

    // Operator-specified quantities win over autodetected ones.
    let mut ray_resources = raw.ray_resources.unwrap_or_default();
    for (name, count) in autodetect_resources(&pod_config) {
        ray_resources.entry(name).or_insert(count);
    }

    let max_workers = match raw.max_workers {
        Some(max) => Some(u64::try_from(max).ok()?),
        None => None,
    };

    Some(PodType {
        name: raw.name?,
        min_workers: u64::try_from(raw.min_workers.unwrap_or(0)).ok()?,
        max_workers,
        ray_resources,
        setup_commands: raw.setup_commands.unwrap_or_default(),
        pod_config,
    })
}

fn fill_namespace(pod_config: &mut Value, namespace: &str) {
    let Some(pod) = pod_config.as_object_mut() else {
        return;
    };
    let metadata = pod
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(metadata) = metadata.as_object_mut() {
        metadata
            .entry("namespace")
            .or_insert_with(|| Value::String(namespace.to_string()));
    }
}
