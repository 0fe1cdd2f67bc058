use crate::constants::choices::{DEFAULT_VISIBILITY, TAG_VISIBILITIES};
use crate::constants::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, TAG_INCLUDE};
use crate::errors::ToolError;
use crate::managers::collection::{self, Action, CollectionManager};
use crate::managers::resource::Resource;
use crate::managers::revision::{build_update_body, fetch_updated_at};
use crate::services::config::GhostConfig;
use crate::services::ghost_client::GhostClient;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct TagManager {
    logger: Logger,
    validation: Validation,
    config: Arc<GhostConfig>,
}

impl TagManager {
    pub fn new(logger: Logger, validation: Validation, config: Arc<GhostConfig>) -> Self {
        Self {
            logger: logger.child("tags"),
            validation,
            config,
        }
    }

    fn client(&self) -> Result<GhostClient, ToolError> {
        GhostClient::new(&self.config, &self.logger)
    }

    fn visibility(&self, args: &Value) -> Result<Option<String>, ToolError> {
        let raw = self.validation.optional_non_empty(args, "visibility")?;
        self.validation.ensure_choice("visibility", raw, TAG_VISIBILITIES)
    }

    fn accent_color(&self, args: &Value) -> Result<Option<String>, ToolError> {
        self.validation
            .optional_non_empty(args, "accent_color")?
            .map(|raw| self.validation.normalize_accent_color(&raw))
            .transpose()
    }

    pub async fn list(&self, args: &Value) -> Result<Value, ToolError> {
        let page = self.validation.ensure_positive_int(args, "page", DEFAULT_PAGE)?;
        let limit = self.validation.ensure_positive_int(args, "limit", DEFAULT_LIMIT)?;
        let include = self
            .validation
            .optional_non_empty(args, "include")?
            .unwrap_or_else(|| TAG_INCLUDE.to_string());

        let mut query = vec![
            ("page", page.to_string()),
            ("limit", limit.to_string()),
            ("include", include),
        ];
        if let Some(filter) = self.validation.optional_non_empty(args, "filter")? {
            query.push(("filter", filter));
        }
        collection::list(&self.client()?, Resource::Tags, &query).await
    }

    pub async fn create(&self, args: &Value) -> Result<Value, ToolError> {
        let name = self
            .validation
            .optional_non_empty(args, "name")?
            .ok_or_else(|| ToolError::invalid_params("Tag name is required"))?;
        let description = self.validation.optional_non_empty(args, "description")?;
        let accent_color = self.accent_color(args)?;
        let visibility = self
            .visibility(args)?
            .unwrap_or_else(|| DEFAULT_VISIBILITY.to_string());

        let mut entity = Map::new();
        entity.insert("name".to_string(), Value::String(name));
        if let Some(description) = description {
            entity.insert("description".to_string(), Value::String(description));
        }
        if let Some(color) = accent_color {
            entity.insert("accent_color".to_string(), Value::String(color));
        }
        entity.insert("visibility".to_string(), Value::String(visibility));

        let client = self.client()?;
        let response = client
            .post(&Resource::Tags.create_path(), &Resource::Tags.wrap(entity))
            .await?;
        collection::require_body(Resource::Tags, response)
    }

    pub async fn update(&self, args: &Value) -> Result<Value, ToolError> {
        let id = self.validation.ensure_id(args, "tag_id", "Tag")?;

        let mut fields = Map::new();
        if let Some(name) = self.validation.optional_text(args, "name")? {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = self.validation.optional_text(args, "description")? {
            fields.insert("description".to_string(), Value::String(description));
        }
        if let Some(color) = self.accent_color(args)? {
            fields.insert("accent_color".to_string(), Value::String(color));
        }
        if let Some(visibility) = self.visibility(args)? {
            fields.insert("visibility".to_string(), Value::String(visibility));
        }

        let client = self.client()?;
        let updated_at = fetch_updated_at(&client, Resource::Tags, &id).await?;
        let body = build_update_body(Resource::Tags, updated_at, fields);
        let response = client.put(&Resource::Tags.update_path(&id), &body).await?;
        collection::require_body(Resource::Tags, response)
    }

    pub async fn delete(&self, args: &Value) -> Result<Value, ToolError> {
        let id = self.validation.ensure_id(args, "tag_id", "Tag")?;
        collection::delete(&self.client()?, Resource::Tags, &id).await
    }
}

#[async_trait::async_trait]
impl CollectionManager for TagManager {
    fn resource(&self) -> Resource {
        Resource::Tags
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
