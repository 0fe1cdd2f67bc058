use crate::constants::choices::{CONTENT_STATUSES, DEFAULT_STATUS};
use crate::constants::pagination::{CONTENT_INCLUDE, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::errors::ToolError;
use crate::managers::collection::{self, compose_filter, Action, CollectionManager};
use crate::managers::resource::Resource;
use crate::managers::revision::{build_update_body, fetch_updated_at};
use crate::services::config::GhostConfig;
use crate::services::ghost_client::GhostClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Posts and pages: HTML-bodied entities with a publication status.
#[derive(Clone)]
pub struct ContentManager {
    resource: Resource,
    logger: Logger,
    validation: Validation,
    config: Arc<GhostConfig>,
}

impl ContentManager {
    pub fn new(
        resource: Resource,
        logger: Logger,
        validation: Validation,
        config: Arc<GhostConfig>,
    ) -> Self {
        Self {
            resource,
            logger: logger.child(resource.collection()),
            validation,
            config,
        }
    }

    fn client(&self) -> Result<GhostClient, ToolError> {
        GhostClient::new(&self.config, &self.logger)
    }

    fn status(&self, args: &Value) -> Result<Option<String>, ToolError> {
        let raw = self.validation.optional_non_empty(args, "status")?;
        self.validation.ensure_choice("status", raw, CONTENT_STATUSES)
    }

    fn tags(&self, args: &Value) -> Result<Option<Vec<Value>>, ToolError> {
        if self.resource != Resource::Posts {
            return Ok(None);
        }
        self.validation.normalize_tag_refs(args.get("tags"))
    }

    pub async fn list(&self, args: &Value) -> Result<Value, ToolError> {
        let page = self.validation.ensure_positive_int(args, "page", DEFAULT_PAGE)?;
        let limit = self.validation.ensure_positive_int(args, "limit", DEFAULT_LIMIT)?;
        let include = self
            .validation
            .optional_non_empty(args, "include")?
            .unwrap_or_else(|| CONTENT_INCLUDE.to_string());
        let status = self.status(args)?;
        let filter = self.validation.optional_non_empty(args, "filter")?;

        let mut query = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("include", include),
        ];
        if let Some(filter) = compose_filter(status.as_deref(), filter.as_deref()) {
            query.push(("filter", filter));
        }
        collection::list(&self.client()?, self.resource, &query).await
    }

    pub async fn create(&self, args: &Value) -> Result<Value, ToolError> {
        let title = self.validation.optional_non_empty(args, "title")?;
        let content = self.validation.optional_non_empty(args, "content")?;
        let (Some(title), Some(content)) = (title, content) else {
            return Err(ToolError::invalid_params("Title and content are required"));
        };
        let status = self
            .status(args)?
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let featured = self.validation.optional_bool(args, "featured")?.unwrap_or(false);
        let tags = self.tags(args)?;

        let mut entity = Map::new();
        entity.insert("title".to_string(), Value::String(title));
        entity.insert("html".to_string(), Value::String(content));
        entity.insert("status".to_string(), Value::String(status));
        entity.insert("featured".to_string(), Value::Bool(featured));
        if let Some(tags) = tags.filter(|t| !t.is_empty()) {
            entity.insert("tags".to_string(), Value::Array(tags));
        }

        let client = self.client()?;
        let response = client
            .post(&self.resource.create_path(), &self.resource.wrap(entity))
            .await?;
        collection::require_body(self.resource, response)
    }

    pub async fn update(&self, args: &Value) -> Result<Value, ToolError> {
        let id = self
            .validation
            .ensure_id(args, self.resource.id_arg(), self.resource.label())?;

        let mut fields = Map::new();
        if let Some(title) = self.validation.optional_text(args, "title")? {
            fields.insert("title".to_string(), Value::String(title));
        }
        if let Some(content) = self.validation.optional_text(args, "content")? {
            fields.insert("html".to_string(), Value::String(content));
        }
        if let Some(status) = self.status(args)? {
            fields.insert("status".to_string(), Value::String(status));
        }
        if let Some(featured) = self.validation.optional_bool(args, "featured")? {
            fields.insert("featured".to_string(), Value::Bool(featured));
        }
        if let Some(tags) = self.tags(args)? {
            fields.insert("tags".to_string(), Value::Array(tags));
        }

        let client = self.client()?;
        let updated_at = fetch_updated_at(&client, self.resource, &id).await?;
        let body = build_update_body(self.resource, updated_at, fields);
        let response = client.put(&self.resource.update_path(&id), &body).await?;
        let mut result = collection::require_body(self.resource, response)?;
        if let Some(entity) = self.resource.first_entity_mut(&mut result) {
            ensure_body_keys(entity);
        }
        Ok(result)
    }

    pub async fn delete(&self, args: &Value) -> Result<Value, ToolError> {
        let id = self
            .validation
            .ensure_id(args, self.resource.id_arg(), self.resource.label())?;
        collection::delete(&self.client()?, self.resource, &id).await
    }
}

/// Ghost omits body formats it was not asked for; callers expect both keys.
fn ensure_body_keys(entity: &mut Map<String, Value>) {
    for key in ["html", "lexical"] {
        match entity.get(key) {
            Some(Value::String(_)) => {}
            _ => {
                entity.insert(key.to_string(), Value::String(String::new()));
            }
        }
    }
}

#[async_trait::async_trait]
impl CollectionManager for ContentManager {
    fn resource(&self) -> Resource {
        self.resource
    }

    async fn handle_action(&self, action: Action, args: Value) -> Result<Value, ToolError> {
        self.logger.debug(
            "handle_action",
            Some(&serde_json::json!({ "action": format!("{:?}", action).to_lowercase() })),
        );
        match action {
            Action::List => self.list(&args).await,
            Action::Create => self.create(&args).await,
            Action::Update => self.update(&args).await,
            Action::Delete => self.delete(&args).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_keys_are_filled_when_missing_or_null() {
        let mut entity = json!({"id": "1", "html": null, "title": "t"})
            .as_object()
            .cloned()
            .expect("object");
        ensure_body_keys(&mut entity);
        assert_eq!(entity.get("html"), Some(&json!("")));
        assert_eq!(entity.get("lexical"), Some(&json!("")));

        let mut kept = json!({"html": "<p>x</p>", "lexical": "{}"})
            .as_object()
            .cloned()
            .expect("object");
        ensure_body_keys(&mut kept);
        assert_eq!(kept.get("html"), Some(&json!("<p>x</p>")));
    }
}
