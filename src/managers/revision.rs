//! Read-modify-write support for updates.
//!
//! Ghost rejects a PUT unless it echoes the entity's current `updated_at`,
//! so every update first reads the entity and then sends only the fields the
//! caller provided alongside that timestamp.

use crate::errors::ToolError;
use crate::managers::resource::Resource;
use crate::services::ghost_client::GhostClient;
use serde_json::{Map, Value};

pub async fn fetch_updated_at(
    client: &GhostClient,
    resource: Resource,
    id: &str,
) -> Result<String, ToolError> {
    let response = match client.get(&resource.item_path(id), &[]).await {
        Ok(response) => response,
        Err(err) if err.status == Some(404) => {
            return Err(ToolError::not_found(resource.not_found_message(id)))
        }
        Err(err) => return Err(err),
    };
    let Some(entity) = response
        .body
        .as_ref()
        .and_then(|body| resource.first_entity(body))
    else {
        return Err(ToolError::not_found(resource.not_found_message(id)));
    };
    entity
        .get("updated_at")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            ToolError::internal(format!(
                "{} {} has no updated_at in the read response",
                resource.label(),
                id
            ))
        })
}

/// `{"<collection>": [{"updated_at": ..., ...fields}]}`.
pub fn build_update_body(resource: Resource, updated_at: String, fields: Map<String, Value>) -> Value {
    let mut entity = Map::new();
    entity.insert("updated_at".to_string(), Value::String(updated_at));
    for (key, value) in fields {
        if key == "updated_at" {
            continue;
        }
        entity.insert(key, value);
    }
    resource.wrap(entity)
}
