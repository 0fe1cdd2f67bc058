//! Human-oriented tool descriptors derived from the catalog schemas.

use crate::constants::tools::SENTINEL;
use crate::mcp::catalog::{tool_by_name, tool_catalog, ToolDef};
use serde_json::{json, Map, Value};

/// `{name, description, args: {arg: {type, description, required, default?}}}`.
pub fn describe_tool(name: &str) -> Option<Value> {
    tool_by_name(name).map(descriptor)
}

pub fn describe_tools() -> Vec<Value> {
    tool_catalog().iter().map(descriptor).collect()
}

/// `{"tools": [...]}`, the answer to a describe request naming no tool.
pub fn describe_all() -> Value {
    json!({ "tools": describe_tools() })
}

/// True when `args` asks for a tool's descriptor through its primary argument.
pub fn sentinel_request(tool: &str, args: &Value) -> bool {
    let Some(primary) = tool_by_name(tool).and_then(|t| t.primary_arg.as_deref()) else {
        return false;
    };
    args.get(primary).and_then(|v| v.as_str()) == Some(SENTINEL)
}

fn descriptor(tool: &ToolDef) -> Value {
    let schema = &tool.input_schema;
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let mut args = Map::new();
    if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
        for (name, prop) in props {
            let mut arg = Map::new();
            arg.insert("type".to_string(), Value::String(arg_type(prop)));
            arg.insert(
                "description".to_string(),
                prop.get("description").cloned().unwrap_or(Value::String(String::new())),
            );
            arg.insert(
                "required".to_string(),
                Value::Bool(required.contains(&name.as_str())),
            );
            if let Some(default) = prop.get("default") {
                arg.insert("default".to_string(), default.clone());
            }
            args.insert(name.clone(), Value::Object(arg));
        }
    }

    json!({
        "name": tool.name,
        "description": tool.description,
        "args": args,
    })
}

/// The declared type; for a union such as `["integer", "string"]`, its first member.
fn arg_type(prop: &Value) -> String {
    let declared = match prop.get("type") {
        Some(Value::Array(types)) => types.first().and_then(|v| v.as_str()),
        Some(other) => other.as_str(),
        None => None,
    };
    match declared {
        Some("array") => "list".to_string(),
        Some(other) => other.to_string(),
        None => "any".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_create_post_like_the_tool_info_contract() {
        let info = describe_tool("create_ghost_post").expect("descriptor");
        assert_eq!(info["name"], "create_ghost_post");
        assert_eq!(info["description"], "Creates a new post in Ghost blog");
        assert_eq!(info["args"]["title"]["type"], "string");
        assert_eq!(info["args"]["title"]["required"], true);
        assert_eq!(info["args"]["status"]["default"], "draft");
        assert_eq!(info["args"]["status"]["required"], false);
        assert_eq!(info["args"]["tags"]["type"], "list");
        assert_eq!(info["args"]["featured"]["default"], false);
        assert_eq!(info["args"]["featured"]["type"], "boolean");
        assert!(info["args"]["tags"].get("default").is_none());
    }

    #[test]
    fn describes_every_tool() {
        let all = describe_tools();
        assert_eq!(all.len(), tool_catalog().len());
        assert!(all.iter().all(|d| d["args"].is_object()));
        let list = describe_tool("list_ghost_tags").expect("descriptor");
        assert_eq!(list["args"]["limit"]["type"], "integer");
        assert!(describe_tool("publish_everything").is_none());
    }

    #[test]
    fn sentinel_matches_only_the_primary_argument() {
        assert!(sentinel_request(
            "delete_ghost_tag",
            &json!({"tag_id": "__tool_info__"})
        ));
        assert!(sentinel_request("list_ghost_pages", &json!({"page": "__tool_info__"})));
        assert!(!sentinel_request(
            "create_ghost_post",
            &json!({"content": "__tool_info__"})
        ));
        assert!(!sentinel_request("describe_ghost_tools", &json!({"tool": "__tool_info__"})));
        assert!(!sentinel_request("nope", &json!({"page": "__tool_info__"})));
    }
}
