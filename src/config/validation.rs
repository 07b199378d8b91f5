//! Configuration validation.
//!
//! # Responsibilities
//! - Error and warning taxonomy shared by every pass
//! - Semantic validation (the structural pass handles shape)
//! - Check referential integrity (head and default worker types resolve)
//! - Validate value ranges (worker bounds, upscaling speed, idle timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Rules run on whatever the structural pass could read, so one broken
//!   field never hides another rule's violation
//! - Nothing is clamped or corrected here

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::config::resources::{parse_quantity, AUTODETECTED_RESOURCES};
use crate::config::schema::NodeRole;
use crate::config::structure::{join, RawClusterConfig, RawPodType};

/// Named invariant checked by the semantic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticRule {
    NameNotEmpty,
    UniquePodTypeNames,
    HeadPodTypeResolves,
    WorkerDefaultPodTypeResolves,
    MaxWorkersNonNegative,
    MinWorkersNonNegative,
    MinWorkersNotAboveMaxWorkers,
    UpscalingSpeedPositive,
    IdleTimeoutPositive,
    HeadHasNoWorkerBounds,
    PodConfigHasContainer,
    ResourceRequestsSet,
    ResourceQuantityValid,
    NamespaceMatches,
}

impl SemanticRule {
    /// Stable rule name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRule::NameNotEmpty => "name non-empty",
            SemanticRule::UniquePodTypeNames => "podTypes names unique",
            SemanticRule::HeadPodTypeResolves => "headPodType resolves",
            SemanticRule::WorkerDefaultPodTypeResolves => "workerDefaultPodType resolves",
            SemanticRule::MaxWorkersNonNegative => "maxWorkers>=0",
            SemanticRule::MinWorkersNonNegative => "minWorkers>=0",
            SemanticRule::MinWorkersNotAboveMaxWorkers => "minWorkers<=maxWorkers",
            SemanticRule::UpscalingSpeedPositive => "upscalingSpeed>0",
            SemanticRule::IdleTimeoutPositive => "idleTimeoutMinutes>0",
            SemanticRule::HeadHasNoWorkerBounds => "head pod type has no worker bounds",
            SemanticRule::PodConfigHasContainer => "podConfig has a container",
            SemanticRule::ResourceRequestsSet => "resource requests set",
            SemanticRule::ResourceQuantityValid => "resource quantity valid",
            SemanticRule::NamespaceMatches => "namespace matches",
        }
    }
}

impl fmt::Display for SemanticRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SemanticRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A defect that makes the document unusable.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationError {
    #[error("missing required field `{field}` at {path}")]
    MissingField { field: String, path: String },

    #[error("field `{field}` at {path} expected {expected}, found {actual}")]
    TypeMismatch {
        field: String,
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("rule `{rule}` violated at {path}: {offending_value}")]
    Semantic {
        rule: SemanticRule,
        offending_value: String,
        path: String,
    },

    #[error("{role} start command list at {path} is empty")]
    EmptyCommandList { role: NodeRole, path: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "missingField",
            ValidationError::TypeMismatch { .. } => "typeMismatch",
            ValidationError::Semantic { .. } => "semantic",
            ValidationError::EmptyCommandList { .. } => "emptyCommandList",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingField { path, .. }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::Semantic { path, .. }
            | ValidationError::EmptyCommandList { path, .. } => path,
        }
    }

    /// The field or rule the error is about.
    pub fn subject(&self) -> String {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::TypeMismatch { field, .. } => field.clone(),
            ValidationError::Semantic { rule, .. } => rule.as_str().to_string(),
            ValidationError::EmptyCommandList { role, .. } => {
                role.start_commands_field().to_string()
            }
        }
    }

    fn semantic(
        rule: SemanticRule,
        path: impl Into<String>,
        offending_value: impl fmt::Display,
    ) -> Self {
        ValidationError::Semantic {
            rule,
            offending_value: offending_value.to_string(),
            path: path.into(),
        }
    }
}

/// Something an operator should look at that does not block the load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationWarning {
    /// Field not part of the schema; tolerated for forward compatibility.
    UnknownField { path: String },

    /// Per-type worker bounds add up to more than the global `maxWorkers`.
    WorkerBoundsExceedGlobal {
        bound: &'static str,
        per_type_sum: u64,
        global: u64,
    },

    /// No worker start command references the head-address placeholder.
    HeadAddressNotReferenced { placeholder: &'static str },
}

impl ValidationWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationWarning::UnknownField { .. } => "unknownField",
            ValidationWarning::WorkerBoundsExceedGlobal { .. } => "workerBoundsExceedGlobal",
            ValidationWarning::HeadAddressNotReferenced { .. } => "headAddressNotReferenced",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::UnknownField { path } => write!(f, "unknown field {path} ignored"),
            ValidationWarning::WorkerBoundsExceedGlobal { bound, per_type_sum, global } => write!(
                f,
                "sum of per-type {bound} ({per_type_sum}) exceeds global maxWorkers ({global})"
            ),
            ValidationWarning::HeadAddressNotReferenced { placeholder } => write!(
                f,
                "no worker start command references {placeholder}; workers may not find the head"
            ),
        }
    }
}

/// One line of a report, in the shape operators and reconcilers consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub severity: &'static str,
    pub kind: &'static str,
    /// Field or rule name.
    pub subject: String,
    pub message: String,
    pub path: String,
}

/// Every error and warning found while loading one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Flatten errors then warnings into report entries.
    pub fn entries(&self) -> Vec<ReportEntry> {
        let errors = self.errors.iter().map(|error| ReportEntry {
            severity: "error",
            kind: error.kind(),
            subject: error.subject(),
            message: error.to_string(),
            path: error.path().to_string(),
        });
        let warnings = self.warnings.iter().map(|warning| ReportEntry {
            severity: "warning",
            kind: warning.kind(),
            subject: match warning {
                ValidationWarning::UnknownField { path } => path.clone(),
                ValidationWarning::WorkerBoundsExceedGlobal { bound, .. } => bound.to_string(),
                ValidationWarning::HeadAddressNotReferenced { .. } => {
                    NodeRole::Worker.start_commands_field().to_string()
                }
            },
            message: warning.to_string(),
            path: match warning {
                ValidationWarning::UnknownField { path } => path.clone(),
                _ => String::new(),
            },
        });
        errors.chain(warnings).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        for warning in &self.warnings {
            write!(f, "\n  ! {warning}")?;
        }
        Ok(())
    }
}

/// Semantic pass. Appends every violation found to `report`.
pub(crate) fn validate_config(raw: &RawClusterConfig, report: &mut ValidationReport) {
    if let Some(name) = &raw.name {
        if name.trim().is_empty() {
            report.push_error(ValidationError::semantic(
                SemanticRule::NameNotEmpty,
                raw.name_path.clone(),
                format!("{name:?}"),
            ));
        }
    }

    if let Some(max_workers) = raw.max_workers {
        if max_workers < 0 {
            report.push_error(ValidationError::semantic(
                SemanticRule::MaxWorkersNonNegative,
                raw.field_path("maxWorkers"),
                max_workers,
            ));
        }
    }

    if let Some(speed) = raw.upscaling_speed {
        // NaN fails this comparison too.
        if !(speed > 0.0) {
            report.push_error(ValidationError::semantic(
                SemanticRule::UpscalingSpeedPositive,
                raw.field_path("upscalingSpeed"),
                speed,
            ));
        }
    }

    if let Some(idle) = raw.idle_timeout_minutes {
        if idle <= 0 {
            report.push_error(ValidationError::semantic(
                SemanticRule::IdleTimeoutPositive,
                raw.field_path("idleTimeoutMinutes"),
                idle,
            ));
        }
    }

    let Some(pod_types) = &raw.pod_types else {
        return;
    };

    check_unique_names(pod_types, report);

    let names: HashSet<&str> = pod_types.iter().filter_map(|p| p.name.as_deref()).collect();
    for (field, rule, reference) in [
        ("headPodType", SemanticRule::HeadPodTypeResolves, &raw.head_pod_type),
        (
            "workerDefaultPodType",
            SemanticRule::WorkerDefaultPodTypeResolves,
            &raw.worker_default_pod_type,
        ),
    ] {
        if let Some(reference) = reference {
            if !names.contains(reference.as_str()) {
                report.push_error(ValidationError::semantic(
                    rule,
                    raw.field_path(field),
                    format!("{field} {reference:?} does not match any podTypes name"),
                ));
            }
        }
    }

    for pod_type in pod_types {
        let is_head = raw.head_pod_type.is_some() && pod_type.name == raw.head_pod_type;
        check_worker_bounds(pod_type, is_head, report);
        if let Some(pod_config) = &pod_type.pod_config {
            check_pod_config(pod_type, pod_config, raw.namespace.as_deref(), report);
        }
        if let Some(resources) = &pod_type.ray_resources {
            for (resource, quantity) in resources {
                if !quantity.is_finite() || *quantity < 0.0 {
                    report.push_error(ValidationError::semantic(
                        SemanticRule::ResourceQuantityValid,
                        join(&join(&pod_type.path, "rayResources"), resource),
                        quantity,
                    ));
                }
            }
        }
    }

    check_global_bounds(raw, pod_types, report);
}

fn check_unique_names(pod_types: &[RawPodType], report: &mut ValidationReport) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for pod_type in pod_types {
        let Some(name) = pod_type.name.as_deref() else {
            continue;
        };
        let count = seen.entry(name).or_insert(0);
        *count += 1;
        // Report each duplicated name once, at its second occurrence.
        if *count == 2 {
            report.push_error(ValidationError::semantic(
                SemanticRule::UniquePodTypeNames,
                pod_type.path.clone(),
                format!("{name:?} is used by more than one pod type"),
            ));
        }
    }
}

fn label(pod_type: &RawPodType) -> &str {
    pod_type.name.as_deref().unwrap_or("<unnamed>")
}

fn check_worker_bounds(pod_type: &RawPodType, is_head: bool, report: &mut ValidationReport) {
    let name = label(pod_type);

    if is_head {
        if pod_type.min_workers.is_some() || pod_type.max_workers.is_some() {
            report.push_error(ValidationError::semantic(
                SemanticRule::HeadHasNoWorkerBounds,
                pod_type.path.clone(),
                format!("head pod type {name:?} sets minWorkers/maxWorkers"),
            ));
        }
        return;
    }

    if let Some(min) = pod_type.min_workers.filter(|min| *min < 0) {
        report.push_error(ValidationError::semantic(
            SemanticRule::MinWorkersNonNegative,
            join(&pod_type.path, "minWorkers"),
            format!("{name} (minWorkers {min})"),
        ));
    }
    if let Some(max) = pod_type.max_workers.filter(|max| *max < 0) {
        report.push_error(ValidationError::semantic(
            SemanticRule::MaxWorkersNonNegative,
            join(&pod_type.path, "maxWorkers"),
            format!("{name} (maxWorkers {max})"),
        ));
    }
    if let (Some(min), Some(max)) = (pod_type.min_workers, pod_type.max_workers) {
        if min > max {
            report.push_error(ValidationError::semantic(
                SemanticRule::MinWorkersNotAboveMaxWorkers,
                pod_type.path.clone(),
                format!("{name} (minWorkers {min} > maxWorkers {max})"),
            ));
        }
    }
}

fn check_pod_config(
    pod_type: &RawPodType,
    pod_config: &Value,
    namespace: Option<&str>,
    report: &mut ValidationReport,
) {
    let name = label(pod_type);
    let config_path = join(&pod_type.path, "podConfig");

    if let (Some(expected), Some(actual)) = (
        namespace,
        pod_config.pointer("/metadata/namespace").and_then(Value::as_str),
    ) {
        if expected != actual {
            report.push_error(ValidationError::semantic(
                SemanticRule::NamespaceMatches,
                join(&config_path, "metadata.namespace"),
                format!("{name}: {actual:?} differs from cluster namespace {expected:?}"),
            ));
        }
    }

    let Some(containers) = pod_config.pointer("/spec/containers").and_then(Value::as_array) else {
        return;
    };
    let containers_path = join(&config_path, "spec.containers");
    let Some(first) = containers.first() else {
        report.push_error(ValidationError::semantic(
            SemanticRule::PodConfigHasContainer,
            containers_path,
            format!("{name}: containers is empty"),
        ));
        return;
    };

    let resources_path = format!("{containers_path}[0].resources");
    if let Some(requests) = first.pointer("/resources/requests").and_then(Value::as_object) {
        if requests.is_empty() {
            report.push_error(ValidationError::semantic(
                SemanticRule::ResourceRequestsSet,
                join(&resources_path, "requests"),
                format!("{name}: requests is empty"),
            ));
        }
    }

    for section in ["requests", "limits"] {
        for resource in AUTODETECTED_RESOURCES {
            let pointer = format!("/resources/{section}/{resource}");
            if let Some(quantity) = first.pointer(&pointer) {
                if parse_quantity(quantity).is_none() {
                    report.push_error(ValidationError::semantic(
                        SemanticRule::ResourceQuantityValid,
                        format!("{resources_path}.{section}.{resource}"),
                        quantity,
                    ));
                }
            }
        }
    }
}

fn check_global_bounds(
    raw: &RawClusterConfig,
    pod_types: &[RawPodType],
    report: &mut ValidationReport,
) {
    let Some(global) = raw.max_workers.and_then(|g| u64::try_from(g).ok()) else {
        return;
    };
    let workers: Vec<&RawPodType> = pod_types
        .iter()
        .filter(|p| raw.head_pod_type.is_none() || p.name != raw.head_pod_type)
        .collect();

    let sum = |bound: fn(&RawPodType) -> Option<i64>| -> u64 {
        workers
            .iter()
            .filter_map(|p| bound(p))
            .filter_map(|v| u64::try_from(v).ok())
            .fold(0u64, u64::saturating_add)
    };

    let max_sum = sum(|p| p.max_workers);
    if max_sum > global {
        report.push_warning(ValidationWarning::WorkerBoundsExceedGlobal {
            bound: "maxWorkers",
            per_type_sum: max_sum,
            global,
        });
    }
    let min_sum = sum(|p| p.min_workers);
    if min_sum > global {
        report.push_warning(ValidationWarning::WorkerBoundsExceedGlobal {
            bound: "minWorkers",
            per_type_sum: min_sum,
            global,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pod_config() -> Value {
        json!({
            "spec": {
                "restartPolicy": "Never",
                "containers": [{
                    "name": "ray-node",
                    "resources": {
                        "requests": {"cpu": "1000m", "memory": "512Mi"},
                        "limits": {"cpu": 2}
                    }
                }]
            }
        })
    }

    fn pod(path: &str, name: &str, min: Option<i64>, max: Option<i64>) -> RawPodType {
        RawPodType {
            path: path.to_string(),
            name: Some(name.to_string()),
            min_workers: min,
            max_workers: max,
            ray_resources: None,
            setup_commands: None,
            pod_config: Some(pod_config()),
        }
    }

    fn raw() -> RawClusterConfig {
        RawClusterConfig {
            base: String::new(),
            name: Some("example-cluster".into()),
            name_path: "name".into(),
            namespace: None,
            max_workers: Some(3),
            upscaling_speed: Some(1.0),
            idle_timeout_minutes: Some(5),
            head_pod_type: Some("head-node".into()),
            worker_default_pod_type: Some("worker-node".into()),
            pod_types: Some(vec![
                pod("podTypes[0]", "head-node", None, None),
                pod("podTypes[1]", "worker-node", Some(2), Some(3)),
            ]),
            head_start_ray_commands: Some(vec!["ray start --head".into()]),
            worker_start_ray_commands: Some(vec!["ray start --address=$RAY_HEAD_IP:6379".into()]),
        }
    }

    fn run(raw: &RawClusterConfig) -> ValidationReport {
        let mut report = ValidationReport::default();
        validate_config(raw, &mut report);
        report
    }

    fn rules(report: &ValidationReport) -> Vec<SemanticRule> {
        report
            .errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::Semantic { rule, .. } => Some(*rule),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_valid_config_passes() {
        let report = run(&raw());
        assert!(report.is_empty(), "{report}");
    }

    #[test]
    fn test_all_violations_collected() {
        let mut config = raw();
        config.upscaling_speed = Some(0.0);
        config.idle_timeout_minutes = Some(0);
        config.head_pod_type = Some("missing".into());
        config.pod_types.as_mut().unwrap()[1].min_workers = Some(5);

        let report = run(&config);
        assert_eq!(
            rules(&report),
            vec![
                SemanticRule::UpscalingSpeedPositive,
                SemanticRule::IdleTimeoutPositive,
                SemanticRule::HeadPodTypeResolves,
                SemanticRule::MinWorkersNotAboveMaxWorkers,
            ]
        );
    }

    #[test]
    fn test_min_above_max_cites_pod_type() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap()[1].min_workers = Some(5);
        let report = run(&config);
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            ValidationError::Semantic { rule, offending_value, path } => {
                assert_eq!(*rule, SemanticRule::MinWorkersNotAboveMaxWorkers);
                assert!(offending_value.contains("worker-node"));
                assert_eq!(path, "podTypes[1]");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_names_reported_once() {
        let mut config = raw();
        let pods = config.pod_types.as_mut().unwrap();
        pods.push(pod("podTypes[2]", "worker-node", None, Some(1)));
        pods.push(pod("podTypes[3]", "worker-node", None, Some(1)));
        let report = run(&config);
        assert_eq!(rules(&report), vec![SemanticRule::UniquePodTypeNames]);
        assert_eq!(report.errors[0].path(), "podTypes[2]");
    }

    #[test]
    fn test_head_with_worker_bounds_rejected() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap()[0].max_workers = Some(1);
        assert_eq!(rules(&run(&config)), vec![SemanticRule::HeadHasNoWorkerBounds]);
    }

    #[test]
    fn test_negative_bounds_rejected() {
        let mut config = raw();
        config.max_workers = Some(-1);
        config.pod_types.as_mut().unwrap()[1].min_workers = Some(-2);
        assert_eq!(
            rules(&run(&config)),
            vec![SemanticRule::MaxWorkersNonNegative, SemanticRule::MinWorkersNonNegative]
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut config = raw();
        config.name = Some("  ".into());
        assert_eq!(rules(&run(&config)), vec![SemanticRule::NameNotEmpty]);
    }

    #[test]
    fn test_nan_upscaling_speed_rejected() {
        let mut config = raw();
        config.upscaling_speed = Some(f64::NAN);
        assert_eq!(rules(&run(&config)), vec![SemanticRule::UpscalingSpeedPositive]);
    }

    #[test]
    fn test_empty_containers_rejected() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap()[1].pod_config =
            Some(json!({"spec": {"restartPolicy": "Never", "containers": []}}));
        let report = run(&config);
        assert_eq!(rules(&report), vec![SemanticRule::PodConfigHasContainer]);
        assert_eq!(report.errors[0].path(), "podTypes[1].podConfig.spec.containers");
    }

    #[test]
    fn test_bad_cpu_quantity_rejected() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap()[1].pod_config = Some(json!({
            "spec": {
                "restartPolicy": "Never",
                "containers": [{"resources": {"requests": {"cpu": "lots"}}}]
            }
        }));
        let report = run(&config);
        assert_eq!(rules(&report), vec![SemanticRule::ResourceQuantityValid]);
        assert_eq!(
            report.errors[0].path(),
            "podTypes[1].podConfig.spec.containers[0].resources.requests.cpu"
        );
    }

    #[test]
    fn test_empty_requests_rejected() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap()[1].pod_config = Some(json!({
            "spec": {
                "restartPolicy": "Never",
                "containers": [{"resources": {"requests": {}}}]
            }
        }));
        let report = run(&config);
        assert_eq!(rules(&report), vec![SemanticRule::ResourceRequestsSet]);
        assert_eq!(
            report.errors[0].path(),
            "podTypes[1].podConfig.spec.containers[0].resources.requests"
        );
    }

    #[test]
    fn test_namespace_mismatch_rejected() {
        let mut config = raw();
        config.namespace = Some("ray".into());
        config.pod_types.as_mut().unwrap()[1].pod_config = Some(json!({
            "metadata": {"namespace": "default"},
            "spec": {
                "restartPolicy": "Never",
                "containers": [{"resources": {"requests": {"cpu": 1}}}]
            }
        }));
        assert_eq!(rules(&run(&config)), vec![SemanticRule::NamespaceMatches]);
    }

    #[test]
    fn test_per_type_sum_above_global_warns() {
        let mut config = raw();
        config.pod_types.as_mut().unwrap().push(pod("podTypes[2]", "gpu-node", Some(2), Some(4)));
        let report = run(&config);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                ValidationWarning::WorkerBoundsExceedGlobal {
                    bound: "maxWorkers",
                    per_type_sum: 7,
                    global: 3,
                },
                ValidationWarning::WorkerBoundsExceedGlobal {
                    bound: "minWorkers",
                    per_type_sum: 4,
                    global: 3,
                },
            ]
        );
    }

    #[test]
    fn test_missing_inputs_skip_only_their_rules() {
        let mut config = raw();
        config.upscaling_speed = None;
        config.head_pod_type = None;
        config.worker_default_pod_type = Some("nope".into());
        assert_eq!(rules(&run(&config)), vec![SemanticRule::WorkerDefaultPodTypeResolves]);
    }

    #[test]
    fn test_report_entries() {
        let mut report = ValidationReport::default();
        report.push_error(ValidationError::semantic(
            SemanticRule::UpscalingSpeedPositive,
            "upscalingSpeed",
            0.0,
        ));
        report.push_warning(ValidationWarning::UnknownField { path: "provider".into() });
        let entries = report.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].severity, "error");
        assert_eq!(entries[0].subject, "upscalingSpeed>0");
        assert_eq!(entries[0].path, "upscalingSpeed");
        assert_eq!(entries[1].severity, "warning");
        assert_eq!(entries[1].kind, "unknownField");
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let error = ValidationError::EmptyCommandList {
            role: NodeRole::Head,
            path: "headStartRayCommands".into(),
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            json!({"kind": "emptyCommandList", "role": "head", "path": "headStartRayCommands"})
        );
        assert_eq!(error.to_string(), "head start command list at headStartRayCommands is empty");
    }

    #[test]
    fn test_type_mismatch_message() {
        let error = ValidationError::TypeMismatch {
            field: "maxWorkers".into(),
            path: "maxWorkers".into(),
            expected: "integer",
            actual: "out-of-range integer",
        };
        assert_eq!(
            error.to_string(),
            "field `maxWorkers` at maxWorkers expected integer, found out-of-range integer"
        );
    }

    #[test]
    fn test_semantic_serializes_rule_name() {
        let error =
            ValidationError::semantic(SemanticRule::UpscalingSpeedPositive, "upscalingSpeed", 0);
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["rule"], "upscalingSpeed>0");
        assert_eq!(json["offendingValue"], "0");
    }
}
