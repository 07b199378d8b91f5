//! Resource autodetection from the pod manifest.
//!
//! The scheduler needs `CPU` and `GPU` counts for every pod type. Operators
//! rarely repeat them in `rayResources`, so they are derived from the first
//! container's requests and limits.

use std::collections::BTreeMap;

use serde_json::Value;

/// Container resource names read from the manifest.
pub const AUTODETECTED_RESOURCES: [&str; 2] = ["cpu", "gpu"];

/// Parse a container resource quantity into a whole count.
///
/// Milli-quantities (`"500m"`) round up; plain values are truncated.
/// Returns `None` for anything else, including negative values.
pub fn parse_quantity(quantity: &Value) -> Option<u64> {
    let whole = match quantity {
        Value::Number(n) => n.as_f64()?.trunc(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('m') {
                Some(milli) => (milli.parse::<f64>().ok()? / 1000.0).ceil(),
                None => s.parse::<f64>().ok()?.trunc(),
            }
        }
        _ => return None,
    };
    (whole.is_finite() && whole >= 0.0).then_some(whole as u64)
}

/// Smaller of request and limit; 0 when neither is set.
fn container_resource(resources: &Value, name: &str) -> u64 {
    let request = resources.get("requests").and_then(|r| r.get(name)).and_then(parse_quantity);
    let limit = resources.get("limits").and_then(|r| r.get(name)).and_then(parse_quantity);
    match (request, limit) {
        (Some(request), Some(limit)) => request.min(limit),
        (Some(value), None) | (None, Some(value)) => value,
        (None, None) => 0,
    }
}

/// `CPU` and `GPU` counts derived from the first container of a pod manifest.
pub fn autodetect_resources(pod_config: &Value) -> BTreeMap<String, f64> {
    let resources = pod_config.pointer("/spec/containers/0/resources");
    AUTODETECTED_RESOURCES
        .iter()
        .map(|name| {
            let count = resources.map_or(0, |r| container_resource(r, name));
            (name.to_ascii_uppercase(), count as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!(2)), Some(2));
        assert_eq!(parse_quantity(&json!(1.9)), Some(1));
        assert_eq!(parse_quantity(&json!("4")), Some(4));
        assert_eq!(parse_quantity(&json!("500m")), Some(1));
        assert_eq!(parse_quantity(&json!("2000m")), Some(2));
        assert_eq!(parse_quantity(&json!("2001m")), Some(3));
        assert_eq!(parse_quantity(&json!("lots")), None);
        assert_eq!(parse_quantity(&json!(-1)), None);
        assert_eq!(parse_quantity(&json!(true)), None);
    }

    #[test]
    fn test_autodetect_min_of_request_and_limit() {
        let pod = json!({
            "spec": {"containers": [{
                "resources": {
                    "requests": {"cpu": "1000m", "memory": "512Mi"},
                    "limits": {"cpu": 2, "gpu": 1}
                }
            }]}
        });
        let detected = autodetect_resources(&pod);
        assert_eq!(detected.get("CPU"), Some(&1.0));
        assert_eq!(detected.get("GPU"), Some(&1.0));
        assert_eq!(detected.len(), 2);
    }

    #[test]
    fn test_autodetect_without_resources() {
        let detected = autodetect_resources(&json!({"spec": {"containers": [{"name": "ray"}]}}));
        assert_eq!(detected.get("CPU"), Some(&0.0));
        assert_eq!(detected.get("GPU"), Some(&0.0));
    }
}
