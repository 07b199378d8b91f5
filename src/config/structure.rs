//! Structural pass over the parsed tree.
//!
//! Walks the untyped document against the expected shape and extracts a
//! [`RawClusterConfig`] whose fields stay optional. Missing required fields and
//! wrong primitive kinds are recorded in the report; extraction carries on so
//! that later passes can still check whatever was readable.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::document::kind_of;
use crate::config::validation::{ValidationError, ValidationReport, ValidationWarning};

const CLUSTER_FIELDS: &[&str] = &[
    "name",
    "namespace",
    "maxWorkers",
    "upscalingSpeed",
    "idleTimeoutMinutes",
    "headPodType",
    "workerDefaultPodType",
    "podTypes",
    "headStartRayCommands",
    "workerStartRayCommands",
];

const POD_TYPE_FIELDS: &[&str] = &[
    "name",
    "minWorkers",
    "maxWorkers",
    "rayResources",
    "setupCommands",
    "podConfig",
];

const ENVELOPE_FIELDS: &[&str] = &["apiVersion", "kind", "metadata", "spec", "status"];

/// Cluster fields as found in the document, before any defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawClusterConfig {
    /// Path prefix of the cluster body ("" or "spec").
    pub base: String,
    pub name: Option<String>,
    /// Where `name` came from ("name" or "metadata.name").
    pub name_path: String,
    pub namespace: Option<String>,
    pub max_workers: Option<i64>,
    pub upscaling_speed: Option<f64>,
    pub idle_timeout_minutes: Option<i64>,
    pub head_pod_type: Option<String>,
    pub worker_default_pod_type: Option<String>,
    pub pod_types: Option<Vec<RawPodType>>,
    pub head_start_ray_commands: Option<Vec<String>>,
    pub worker_start_ray_commands: Option<Vec<String>>,
}

/// Pod type fields as found in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawPodType {
    /// Path of this entry, e.g. `podTypes[1]`.
    pub path: String,
    pub name: Option<String>,
    pub min_workers: Option<i64>,
    pub max_workers: Option<i64>,
    pub ray_resources: Option<BTreeMap<String, f64>>,
    pub setup_commands: Option<Vec<String>>,
    pub pod_config: Option<Value>,
}

impl RawClusterConfig {
    /// Path of a cluster-level field.
    pub fn field_path(&self, field: &str) -> String {
        join(&self.base, field)
    }
}

pub(crate) fn join(base: &str, field: &str) -> String {
    if base.is_empty() {
        field.to_string()
    } else {
        format!("{base}.{field}")
    }
}

fn index(base: &str, i: usize) -> String {
    format!("{base}[{i}]")
}

/// A mapping being read at a known path.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: &'a str,
}

impl<'a> Fields<'a> {
    fn new(map: &'a Map<String, Value>, path: &'a str) -> Self {
        Self { map, path }
    }

    /// Fetch a field, treating an explicit `null` as absent.
    fn get(&self, field: &str, required: bool, report: &mut ValidationReport) -> Option<&'a Value> {
        match self.map.get(field) {
            Some(Value::Null) | None => {
                if required {
                    report.push_error(ValidationError::MissingField {
                        field: field.to_string(),
                        path: join(self.path, field),
                    });
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    fn read<T>(
        &self,
        field: &str,
        required: bool,
        expected: &'static str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
        report: &mut ValidationReport,
    ) -> Option<T> {
        let value = self.get(field, required, report)?;
        let extracted = extract(value);
        if extracted.is_none() {
            report.push_error(mismatch(field, &join(self.path, field), expected, value));
        }
        extracted
    }

    fn string(&self, field: &str, required: bool, report: &mut ValidationReport) -> Option<String> {
        self.read(field, required, "string", |v| v.as_str().map(str::to_string), report)
    }

    fn integer(&self, field: &str, required: bool, report: &mut ValidationReport) -> Option<i64> {
        self.read(field, required, "integer", Value::as_i64, report)
    }

    fn number(&self, field: &str, required: bool, report: &mut ValidationReport) -> Option<f64> {
        self.read(field, required, "number", Value::as_f64, report)
    }

    fn mapping(
        &self,
        field: &str,
        required: bool,
        report: &mut ValidationReport,
    ) -> Option<&'a Map<String, Value>> {
        self.read(field, required, "mapping", Value::as_object, report)
    }

    /// A sequence of strings. Every non-string element is reported.
    fn string_list(
        &self,
        field: &str,
        required: bool,
        report: &mut ValidationReport,
    ) -> Option<Vec<String>> {
        let items = self.read(field, required, "sequence", Value::as_array, report)?;
        let path = join(self.path, field);
        let mut commands = Vec::with_capacity(items.len());
        let mut all_strings = true;
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(command) => commands.push(command.to_string()),
                None => {
                    all_strings = false;
                    report.push_error(mismatch(field, &index(&path, i), "string", item));
                }
            }
        }
        all_strings.then_some(commands)
    }

    /// Mapping of resource name to numeric quantity.
    fn resources(
        &self,
        field: &str,
        report: &mut ValidationReport,
    ) -> Option<BTreeMap<String, f64>> {
        let map = self.mapping(field, false, report)?;
        let path = join(self.path, field);
        let mut resources = BTreeMap::new();
        let mut all_numeric = true;
        for (name, quantity) in map {
            match quantity.as_f64() {
                Some(q) => {
                    resources.insert(name.clone(), q);
                }
                None => {
                    all_numeric = false;
                    report.push_error(mismatch(name, &join(&path, name), "number", quantity));
                }
            }
        }
        all_numeric.then_some(resources)
    }

    fn warn_unknown(&self, known: &[&str], report: &mut ValidationReport) {
        for key in self.map.keys() {
            if !known.contains(&key.as_str()) {
                report.push_warning(ValidationWarning::UnknownField {
                    path: join(self.path, key),
                });
            }
        }
    }
}

fn mismatch(field: &str, path: &str, expected: &'static str, actual: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        path: path.to_string(),
        expected,
        actual: kind_of(actual),
    }
}

/// Whether the document wraps the cluster body in a custom-resource envelope.
///
/// Only a `spec` mapping with no cluster body fields beside it counts. A flat
/// document carrying `apiVersion` or `kind` stays flat and those fields are
/// reported as unknown.
fn is_envelope(root: &Map<String, Value>) -> bool {
    root.get("spec").is_some_and(Value::is_object)
        && !CLUSTER_FIELDS
            .iter()
            .filter(|field| **field != "name" && **field != "namespace")
            .any(|field| root.contains_key(*field))
}

/// Walk the document and extract the raw cluster fields.
pub(crate) fn extract(document: &Value, report: &mut ValidationReport) -> RawClusterConfig {
    let Some(root) = document.as_object() else {
        report.push_error(ValidationError::TypeMismatch {
            field: "<document>".to_string(),
            path: String::new(),
            expected: "mapping",
            actual: kind_of(document),
        });
        return RawClusterConfig::default();
    };

    if !is_envelope(root) {
        let fields = Fields::new(root, "");
        fields.warn_unknown(CLUSTER_FIELDS, report);
        let mut raw = extract_body(&fields, report);
        raw.name = fields.string("name", true, report);
        raw.name_path = "name".to_string();
        raw.namespace = fields.string("namespace", false, report);
        return raw;
    }

    let envelope = Fields::new(root, "");
    envelope.warn_unknown(ENVELOPE_FIELDS, report);

    let metadata = envelope.mapping("metadata", true, report);
    let (name, namespace) = match metadata {
        Some(metadata) => {
            let metadata = Fields::new(metadata, "metadata");
            (
                metadata.string("name", true, report),
                metadata.string("namespace", false, report),
            )
        }
        None => (None, None),
    };

    let mut raw = match envelope.mapping("spec", true, report) {
        Some(spec) => {
            let body = Fields::new(spec, "spec");
            // name and namespace live in metadata for the envelope form.
            let known: Vec<&str> = CLUSTER_FIELDS
                .iter()
                .copied()
                .filter(|field| *field != "name" && *field != "namespace")
                .collect();
            body.warn_unknown(&known, report);
            extract_body(&body, report)
        }
        None => RawClusterConfig {
            base: "spec".to_string(),
            ..RawClusterConfig::default()
        },
    };
    raw.name = name;
    raw.name_path = "metadata.name".to_string();
    raw.namespace = namespace;
    raw
}

fn extract_body(fields: &Fields<'_>, report: &mut ValidationReport) -> RawClusterConfig {
    let pod_types = fields
        .read("podTypes", true, "sequence", Value::as_array, report)
        .map(|entries| {
            let list_path = join(fields.path, "podTypes");
            entries
                .iter()
                .enumerate()
                .filter_map(|(i, entry)| extract_pod_type(entry, &index(&list_path, i), report))
                .collect()
        });

    RawClusterConfig {
        base: fields.path.to_string(),
        max_workers: fields.integer("maxWorkers", true, report),
        upscaling_speed: fields.number("upscalingSpeed", true, report),
        idle_timeout_minutes: fields.integer("idleTimeoutMinutes", true, report),
        head_pod_type: fields.string("headPodType", true, report),
        worker_default_pod_type: fields.string("workerDefaultPodType", true, report),
        pod_types,
        head_start_ray_commands: fields.string_list("headStartRayCommands", true, report),
        worker_start_ray_commands: fields.string_list("workerStartRayCommands", true, report),
        ..RawClusterConfig::default()
    }
}

fn extract_pod_type(
    entry: &Value,
    path: &str,
    report: &mut ValidationReport,
) -> Option<RawPodType> {
    let Some(map) = entry.as_object() else {
        report.push_error(mismatch("podTypes", path, "mapping", entry));
        return None;
    };
    let fields = Fields::new(map, path);
    fields.warn_unknown(POD_TYPE_FIELDS, report);

    let name = fields.string("name", true, report);
    let pod_config = fields.mapping("podConfig", true, report);
    if let Some(pod_config) = pod_config {
        check_pod_config(pod_config, &join(path, "podConfig"), report);
    }

    Some(RawPodType {
        path: path.to_string(),
        name,
        min_workers: fields.integer("minWorkers", false, report),
        max_workers: fields.integer("maxWorkers", false, report),
        ray_resources: fields.resources("rayResources", report),
        setup_commands: fields.string_list("setupCommands", false, report),
        pod_config: pod_config.map(|map| Value::Object(map.clone())),
    })
}

/// Check the few pod manifest fields the loader relies on.
///
/// `spec.restartPolicy`, `spec.containers` and `resources.requests` on the
/// first container. Whether `containers` is empty is a semantic rule.
fn check_pod_config(pod_config: &Map<String, Value>, path: &str, report: &mut ValidationReport) {
    let fields = Fields::new(pod_config, path);
    if let Some(metadata) = fields.mapping("metadata", false, report) {
        Fields::new(metadata, &join(path, "metadata")).string("namespace", false, report);
    }
    let Some(spec) = fields.mapping("spec", true, report) else {
        return;
    };
    let spec_path = join(path, "spec");
    let spec = Fields::new(spec, &spec_path);
    spec.string("restartPolicy", true, report);

    let Some(containers) = spec.read("containers", true, "sequence", Value::as_array, report) else {
        return;
    };
    let Some(first) = containers.first() else {
        return;
    };
    let container_path = index(&join(&spec_path, "containers"), 0);
    let Some(container) = first.as_object() else {
        report.push_error(mismatch("containers", &container_path, "mapping", first));
        return;
    };
    let container = Fields::new(container, &container_path);
    if let Some(resources) = container.mapping("resources", true, report) {
        let resources_path = join(&container_path, "resources");
        Fields::new(resources, &resources_path).mapping("requests", true, report);
    }
}
