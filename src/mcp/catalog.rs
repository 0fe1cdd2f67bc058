use crate::errors::ToolError;
use crate::utils::suggest::suggest;
use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    /// Argument that carries the introspection sentinel for this tool.
    #[serde(rename = "primaryArg", default, skip_serializing)]
    pub primary_arg: Option<String>,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

/// Checks argument types, enums and unknown fields against the catalog.
///
/// Missing required fields are left to the managers, which report them with
/// tool-specific messages such as `Title and content are required`.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let (Some(tool), Some(schema)) = (tool_by_name(tool_name), TOOL_VALIDATORS.get(tool_name))
    else {
        return Ok(());
    };
    let problems = match schema.validate(args) {
        Ok(()) => return Ok(()),
        Err(errors) => collect_problems(args, errors, &tool.input_schema),
    };
    match problems.as_slice() {
        [] => Ok(()),
        [single] if single.starts_with("Invalid ") => Err(ToolError::invalid_params(single.clone())),
        _ => {
            let mut lines = vec![format!("Invalid arguments for {}", tool_name)];
            lines.extend(problems.iter().map(|line| format!("- {}", line)));
            Err(ToolError::invalid_params(lines.join("\n")))
        }
    }
}

fn collect_problems(args: &Value, errors: jsonschema::ErrorIterator, schema: &Value) -> Vec<String> {
    let mut rendered = Vec::new();
    for err in errors.take(10) {
        let pointer = err.instance_path.to_string();
        let field = if pointer.is_empty() {
            "(root)".to_string()
        } else {
            pointer.trim_start_matches('/').replace('/', ".")
        };
        match &err.kind {
            ValidationErrorKind::Required { .. } => continue,
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let props: Vec<String> = schema
                    .get("properties")
                    .and_then(|v| v.as_object())
                    .map(|map| map.keys().cloned().collect())
                    .unwrap_or_default();
                for unknown in unexpected {
                    let suggestions = suggest(unknown, &props, 3);
                    if suggestions.is_empty() {
                        rendered.push(format!("unknown field '{}'", unknown));
                    } else {
                        rendered.push(format!(
                            "unknown field '{}' (did you mean: {})",
                            unknown,
                            suggestions.join(", ")
                        ));
                    }
                }
            }
            ValidationErrorKind::Enum { options } => {
                let allowed: Vec<String> = options
                    .as_array()
                    .map(|arr| {
                        arr.iter()
                            .map(|v| {
                                v.as_str()
                                    .map(|s| s.to_string())
                                    .unwrap_or_else(|| v.to_string())
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let received = value_at(args, &pointer);
                let received = received
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| received.to_string());
                rendered.push(format!(
                    "Invalid {} '{}': expected one of {}",
                    field,
                    received,
                    allowed.join(", ")
                ));
            }
            ValidationErrorKind::Type { kind } => {
                rendered.push(format!("{}: expected {}", field, format_type_kind(kind)));
            }
            _ => {
                rendered.push(format!("{}: {}", field, err));
            }
        }
    }
    rendered
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

fn value_at(root: &Value, pointer: &str) -> Value {
    root.pointer(pointer).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_schema_compiles() {
        assert_eq!(TOOL_VALIDATORS.len(), tool_catalog().len());
    }

    #[test]
    fn primary_arg_is_not_published() {
        let tool = tool_by_name("create_ghost_post").expect("tool");
        assert_eq!(tool.primary_arg.as_deref(), Some("title"));
        let published = serde_json::to_value(tool).expect("serialize");
        assert!(published.get("primaryArg").is_none());
        assert!(published.get("inputSchema").is_some());
    }

    #[test]
    fn enum_violation_reads_like_manager_message() {
        let err = validate_tool_args("create_ghost_tag", &json!({"name": "x", "visibility": "secret"}))
            .expect_err("enum");
        assert_eq!(
            err.render(),
            "Invalid visibility 'secret': expected one of public, internal"
        );
    }

    #[test]
    fn stringly_numbers_and_flags_reach_the_managers() {
        assert!(validate_tool_args("list_ghost_posts", &json!({"page": "2", "limit": "5"})).is_ok());
        assert!(validate_tool_args(
            "create_ghost_post",
            &json!({"title": "T", "content": "C", "featured": "true"})
        )
        .is_ok());
    }

    #[test]
    fn missing_required_fields_pass_schema_check() {
        assert!(validate_tool_args("create_ghost_post", &json!({})).is_ok());
        assert!(validate_tool_args("delete_ghost_tag", &json!({})).is_ok());
    }

    #[test]
    fn unknown_fields_and_types_are_listed() {
        let err = validate_tool_args("list_ghost_posts", &json!({"page": [2], "limt": 5}))
            .expect_err("invalid");
        let text = err.render();
        assert!(text.starts_with("Invalid arguments for list_ghost_posts"), "{}", text);
        assert!(text.contains("page: expected "), "{}", text);
        assert!(text.contains("unknown field 'limt' (did you mean: limit)"), "{}", text);
    }
}
