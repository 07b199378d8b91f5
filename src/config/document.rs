//! Raw document parsing.
//!
//! # Responsibilities
//! - Turn YAML, JSON or TOML text into an untyped `serde_json::Value` tree
//! - Report syntax errors with a line/column where the format provides one
//!
//! # Design Decisions
//! - One tree type for every format, so the structural pass walks a single shape
//! - YAML is the default: it is what cluster operators write by hand

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Text formats accepted by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Infer the format from a file extension, falling back to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => DocumentFormat::Json,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Json => "json",
            DocumentFormat::Toml => "toml",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            "toml" => Ok(DocumentFormat::Toml),
            other => Err(format!(
                "unknown document format '{other}' (expected yaml, json or toml)"
            )),
        }
    }
}

/// Malformed input. Parsing cannot continue past this.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {format} document{}: {message}", location_suffix(.line, .column))]
pub struct ParseError {
    pub format: DocumentFormat,
    pub message: String,
    /// 1-based line of the failure, when known.
    pub line: Option<usize>,
    /// 1-based column of the failure, when known.
    pub column: Option<usize>,
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// Parse raw text into an untyped tree.
pub fn parse_document(raw: &str, format: DocumentFormat) -> Result<Value, ParseError> {
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(raw).map_err(|e| {
            let location = e.location();
            ParseError {
                format,
                message: e.to_string(),
                line: location.as_ref().map(|l| l.line()),
                column: location.as_ref().map(|l| l.column()),
            }
        }),
        DocumentFormat::Json => serde_json::from_str::<Value>(raw).map_err(|e| ParseError {
            format,
            message: e.to_string(),
            line: (e.line() > 0).then(|| e.line()),
            column: (e.column() > 0).then(|| e.column()),
        }),
        DocumentFormat::Toml => toml::from_str::<Value>(raw).map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| offset_to_line_column(raw, span.start))
                .unzip();
            ParseError {
                format,
                message: e.message().to_string(),
                line,
                column,
            }
        }),
    }
}

fn offset_to_line_column(raw: &str, offset: usize) -> (usize, usize) {
    let prefix = &raw[..offset.min(raw.len())];
    let line = prefix.matches('\n').count() + 1;
    let column = prefix.rfind('\n').map_or(prefix.len(), |nl| prefix.len() - nl - 1) + 1;
    (line, column)
}

/// Human-readable name of a value's primitive kind.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        // Readers take signed 64-bit integers; anything above is unusable.
        Value::Number(n) if n.as_i64().is_none() => "out-of-range integer",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
