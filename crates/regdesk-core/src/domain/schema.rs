//! Tool argument schemas.
//!
//! MCP servers describe tool arguments with a JSON-Schema-like object:
//! `{"properties": {...}, "required": [...]}`. The console needs to render
//! those as rows and to coerce operator-typed text into properly typed JSON
//! values, so the known primitive kinds are modeled as a tagged union
//! rather than an untyped map.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// The argument kinds a tool schema can describe.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// String restricted to a fixed option list.
    Enum(Vec<String>),
}

impl ArgKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Enum(_) => "enum",
        }
    }
}

/// One argument of a tool, flattened from the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub description: Option<String>,
    pub kind: ArgKind,
    pub required: bool,
    pub default: Option<Value>,
}

/// Coercion failures for a single argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgValueError {
    #[error("argument '{0}' is required")]
    Missing(String),
    #[error("argument '{name}' expects {expected}: {detail}")]
    Invalid {
        name: String,
        expected: &'static str,
        detail: String,
    },
    #[error("argument '{name}' must be one of: {options}")]
    NotInEnum { name: String, options: String },
}

/// Flatten a schema's `properties`/`required` into argument specs.
///
/// Unknown or missing `type` values fall back to `String`, which matches
/// how the registry renders them.
pub fn parse_arg_specs(schema: &Value) -> Vec<ArgSpec> {
    let Some(schema) = schema.as_object() else {
        return Vec::new();
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };

    props
        .iter()
        .map(|(name, def)| ArgSpec {
            name: name.clone(),
            description: def
                .get("description")
                .or_else(|| def.get("title"))
                .and_then(Value::as_str)
                .map(str::to_string),
            kind: kind_of(def),
            required: required.contains(&name.as_str()),
            default: def.get("default").cloned(),
        })
        .collect()
}

fn kind_of(def: &Value) -> ArgKind {
    if let Some(options) = def.get("enum").and_then(Value::as_array) {
        if !options.is_empty() {
            return ArgKind::Enum(
                options
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            );
        }
    }

    match def.get("type").and_then(Value::as_str) {
        Some("integer") => ArgKind::Integer,
        Some("number") => ArgKind::Number,
        Some("boolean") => ArgKind::Boolean,
        Some("array") => ArgKind::Array,
        Some("object") => ArgKind::Object,
        _ => ArgKind::String,
    }
}

impl ArgSpec {
    /// Coerce raw operator input into a typed JSON value.
    pub fn coerce(&self, raw: &str) -> Result<Value, ArgValueError> {
        let trimmed = raw.trim();
        match &self.kind {
            ArgKind::String => Ok(Value::String(raw.to_string())),
            ArgKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "off" | "" => Ok(Value::Bool(false)),
                other => Err(self.invalid("a boolean", other)),
            },
            ArgKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.invalid("an integer", trimmed)),
            ArgKind::Number => trimmed
                .parse::<f64>()
                .map(Value::from)
                .map_err(|_| self.invalid("a number", trimmed)),
            ArgKind::Array => {
                // JSON array input wins; otherwise split on commas
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return Ok(Value::Array(items));
                }
                let items = trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect();
                Ok(Value::Array(items))
            }
            ArgKind::Object => match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(map)) => Ok(Value::Object(map)),
                _ => Err(self.invalid("a JSON object", trimmed)),
            },
            ArgKind::Enum(options) => {
                if options.iter().any(|o| o == trimmed) {
                    Ok(Value::String(trimmed.to_string()))
                } else {
                    Err(ArgValueError::NotInEnum {
                        name: self.name.clone(),
                        options: options.join(", "),
                    })
                }
            }
        }
    }

    fn invalid(&self, expected: &'static str, detail: &str) -> ArgValueError {
        ArgValueError::Invalid {
            name: self.name.clone(),
            expected,
            detail: detail.to_string(),
        }
    }
}

/// Assemble a typed argument map from raw text inputs.
///
/// Required arguments must be present and non-blank. Optional arguments
/// left blank are omitted; schema defaults fill absent optional values.
pub fn build_args(
    specs: &[ArgSpec],
    inputs: &BTreeMap<String, String>,
) -> Result<Map<String, Value>, ArgValueError> {
    let mut args = Map::new();

    for spec in specs {
        let raw = inputs.get(&spec.name).map(String::as_str);
        let blank = raw.is_none_or(|r| r.trim().is_empty());

        if blank {
            if let Some(default) = &spec.default {
                args.insert(spec.name.clone(), default.clone());
                continue;
            }
            // Blank booleans read as unchecked, never as missing
            if spec.required && spec.kind != ArgKind::Boolean {
                return Err(ArgValueError::Missing(spec.name.clone()));
            }
            if spec.required {
                args.insert(spec.name.clone(), Value::Bool(false));
            }
            continue;
        }

        let value = spec.coerce(raw.unwrap_or_default())?;
        args.insert(spec.name.clone(), value);
    }

    Ok(args)
}
