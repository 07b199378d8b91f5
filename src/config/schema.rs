//! Normalized configuration types.
//!
//! These are the fully-populated values handed to the reconciler after the
//! document has been parsed, validated and defaulted. Field names serialize in
//! camelCase, matching the document.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Launch cap applied when few nodes are running yet.
pub const UPSCALING_INITIAL_NUM_NODES: u64 = 5;

/// Root configuration for an autoscaled cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// Cluster identifier.
    pub name: String,

    /// Namespace the cluster's pods are created in, when pinned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Global upper bound on non-head nodes.
    pub max_workers: u64,

    /// Per-cycle growth multiplier relative to the running-node count.
    pub upscaling_speed: f64,

    /// Minutes a worker may sit idle before it is eligible for removal.
    pub idle_timeout_minutes: u64,

    /// Name of the pod type used for the head node.
    pub head_pod_type: String,

    /// Name of the pod type used when no specific worker type is requested.
    pub worker_default_pod_type: String,

    /// Node templates, in document order.
    pub pod_types: Vec<PodType>,

    /// Commands run, in order, to start the head node.
    pub head_start_ray_commands: Vec<String>,

    /// Commands run, in order, to start a worker node.
    pub worker_start_ray_commands: Vec<String>,
}

/// A named node template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodType {
    pub name: String,

    /// Lower bound on workers of this type. Always 0 for the head type.
    #[serde(default)]
    pub min_workers: u64,

    /// Upper bound on workers of this type. `None` means only the global bound applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_workers: Option<u64>,

    /// Custom resources advertised to the scheduler, including autodetected `CPU`/`GPU`.
    #[serde(default)]
    pub ray_resources: BTreeMap<String, f64>,

    /// Commands run once before the node's start commands.
    #[serde(default)]
    pub setup_commands: Vec<String>,

    /// Pod manifest passed through to the orchestration platform.
    pub pod_config: Value,
}

/// Role a node plays in the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Head,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Head => "head",
            NodeRole::Worker => "worker",
        }
    }

    /// Document field holding this role's start commands.
    pub fn start_commands_field(&self) -> &'static str {
        match self {
            NodeRole::Head => "headStartRayCommands",
            NodeRole::Worker => "workerStartRayCommands",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClusterConfig {
    /// Look up a pod type by name.
    pub fn pod_type(&self, name: &str) -> Option<&PodType> {
        self.pod_types.iter().find(|pod_type| pod_type.name == name)
    }

    pub fn head_pod_type(&self) -> Option<&PodType> {
        self.pod_type(&self.head_pod_type)
    }

    pub fn worker_default_pod_type(&self) -> Option<&PodType> {
        self.pod_type(&self.worker_default_pod_type)
    }

    /// Every pod type except the head.
    pub fn worker_pod_types(&self) -> impl Iterator<Item = &PodType> {
        self.pod_types
            .iter()
            .filter(move |pod_type| pod_type.name != self.head_pod_type)
    }

    pub fn start_commands(&self, role: NodeRole) -> &[String] {
        match role {
            NodeRole::Head => &self.head_start_ray_commands,
            NodeRole::Worker => &self.worker_start_ray_commands,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes.saturating_mul(60))
    }

    /// Maximum number of nodes that may be launched in one scaling cycle.
    ///
    /// `ceil(upscalingSpeed * running)`, never below
    /// [`UPSCALING_INITIAL_NUM_NODES`] so an empty cluster can still grow.
    pub fn max_concurrent_launches(&self, running: u64) -> u64 {
        let scaled = (self.upscaling_speed * running as f64).ceil();
        (scaled as u64).max(UPSCALING_INITIAL_NUM_NODES)
    }
}

impl PodType {
    pub fn is_head(&self, config: &ClusterConfig) -> bool {
        self.name == config.head_pod_type
    }

    /// Clamp a desired worker count into this type's bounds.
    ///
    /// `maxWorkers` wins when the bounds conflict.
    pub fn clamp_workers(&self, desired: u64) -> u64 {
        let at_least_min = desired.max(self.min_workers);
        match self.max_workers {
            Some(max) => at_least_min.min(max),
            None => at_least_min,
        }
    }
}
