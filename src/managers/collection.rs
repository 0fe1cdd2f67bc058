//! Operations shared by every collection: list, delete, and dispatch.

use crate::errors::ToolError;
use crate::managers::resource::Resource;
use crate::services::ghost_client::{GhostClient, GhostResponse};
use crate::services::tool_executor::ToolHandler;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::List, Action::Create, Action::Update, Action::Delete];

    /// `list_ghost_posts`, `create_ghost_post`, ...
    pub fn tool_name(self, resource: Resource) -> String {
        match self {
            Action::List => format!("list_ghost_{}", resource.collection()),
            Action::Create => format!("create_ghost_{}", resource.singular()),
            Action::Update => format!("update_ghost_{}", resource.singular()),
            Action::Delete => format!("delete_ghost_{}", resource.singular()),
        }
    }
}

#[async_trait::async_trait]
pub trait CollectionManager: Send + Sync {
    fn resource(&self) -> Resource;
    async fn handle_action(&self, action: Action, args: Value) -> Result<Value, ToolError>;
}

/// Binds one action of a manager to a tool name.
pub struct ActionHandler {
    manager: Arc<dyn CollectionManager>,
    action: Action,
}

impl ActionHandler {
    pub fn new(manager: Arc<dyn CollectionManager>, action: Action) -> Self {
        Self { manager, action }
    }

    pub fn tool_name(&self) -> String {
        self.action.tool_name(self.manager.resource())
    }
}

#[async_trait::async_trait]
impl ToolHandler for ActionHandler {
    async fn handle(&self, args: Value) -> Result<Value, ToolError> {
        self.manager.handle_action(self.action, args).await
    }
}

/// Combines a status shortcut with a raw NQL filter.
pub fn compose_filter(status: Option<&str>, filter: Option<&str>) -> Option<String> {
    match (status, filter) {
        (Some(status), Some(filter)) => Some(format!("status:{}+{}", status, filter)),
        (Some(status), None) => Some(format!("status:{}", status)),
        (None, Some(filter)) => Some(filter.to_string()),
        (None, None) => None,
    }
}

pub async fn list(
    client: &GhostClient,
    resource: Resource,
    query: &[(&str, String)],
) -> Result<Value, ToolError> {
    let response = client.get(&resource.list_path(), query).await?;
    require_body(resource, response)
}

pub async fn delete(client: &GhostClient, resource: Resource, id: &str) -> Result<Value, ToolError> {
    let response = client.delete(&resource.item_path(id)).await?;
    match response.body {
        Some(body) if response.status != 204 => Ok(body),
        _ => Ok(json!({
            "success": true,
            "message": resource.deleted_message(id),
        })),
    }
}

pub fn require_body(resource: Resource, response: GhostResponse) -> Result<Value, ToolError> {
    response.body.ok_or_else(|| {
        ToolError::internal(format!(
            "Empty response body from {} endpoint (status {})",
            resource.collection(),
            response.status
        ))
    })
}
