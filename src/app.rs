use crate::constants::tools::DESCRIBE_TOOL;
use crate::errors::ToolError;
use crate::managers::collection::{Action, ActionHandler, CollectionManager};
use crate::managers::content::ContentManager;
use crate::managers::resource::Resource;
use crate::managers::tags::TagManager;
use crate::mcp::catalog::tool_catalog;
use crate::services::config::{ConfigError, GhostConfig};
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: Option<Arc<GhostConfig>>,
    pub tool_executor: Arc<ToolExecutor>,
}

/// Stands in for every tool when configuration failed to load, so that
/// introspection keeps working and each call reports the same config error.
struct UnconfiguredHandler {
    error: ToolError,
}

#[async_trait::async_trait]
impl ToolHandler for UnconfiguredHandler {
    async fn handle(&self, _args: Value) -> Result<Value, ToolError> {
        Err(self.error.clone())
    }
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<String, Arc<dyn ToolHandler>>,
    ) -> Result<(), ToolError> {
        let mut missing = Vec::new();
        for tool in tool_catalog().iter() {
            if tool.name == DESCRIBE_TOOL || handlers.contains_key(&tool.name) {
                continue;
            }
            missing.push(tool.name.clone());
        }
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal(format!(
            "Tool wiring is incomplete; no handler for: {}",
            missing.join(", ")
        )))
    }

    fn managers(logger: &Logger, config: &Arc<GhostConfig>) -> Vec<Arc<dyn CollectionManager>> {
        let validation = Validation::new();
        let posts: Arc<dyn CollectionManager> = Arc::new(ContentManager::new(
            Resource::Posts,
            logger.clone(),
            validation.clone(),
            config.clone(),
        ));
        let pages: Arc<dyn CollectionManager> = Arc::new(ContentManager::new(
            Resource::Pages,
            logger.clone(),
            validation.clone(),
            config.clone(),
        ));
        let tags: Arc<dyn CollectionManager> =
            Arc::new(TagManager::new(logger.clone(), validation, config.clone()));
        vec![posts, pages, tags]
    }

    pub fn initialize(config: GhostConfig, logger: Logger) -> Result<Self, ToolError> {
        let config = Arc::new(config);
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for manager in Self::managers(&logger, &config) {
            for action in Action::ALL {
                let handler = ActionHandler::new(manager.clone(), action);
                handlers.insert(handler.tool_name(), Arc::new(handler));
            }
        }
        Self::validate_tool_wiring(&handlers)?;

        logger.info(
            "initialized",
            Some(&serde_json::json!({
                "api_url": config.api_url.as_str(),
                "key_id": config.admin_key.id(),
                "tools": handlers.len(),
            })),
        );
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            config: Some(config),
            tool_executor,
        })
    }

    /// Every catalog tool answers with `err`; introspection stays available.
    pub fn unconfigured(err: ConfigError, logger: Logger) -> Self {
        let error: ToolError = err.into();
        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for tool in tool_catalog().iter() {
            if tool.name == DESCRIBE_TOOL {
                continue;
            }
            handlers.insert(
                tool.name.clone(),
                Arc::new(UnconfiguredHandler {
                    error: error.clone(),
                }),
            );
        }
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Self {
            logger,
            config: None,
            tool_executor,
        }
    }

    /// Loads configuration from the environment. A config error does not
    /// abort: the app comes up unconfigured and every tool reports it.
    pub fn from_env(logger: Logger) -> Result<Self, ToolError> {
        match GhostConfig::from_env() {
            Ok(config) => Self::initialize(config, logger),
            Err(err) => {
                logger.warn(
                    "configuration unavailable",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
                Ok(Self::unconfigured(err, logger))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::admin_token::AdminKey;

    #[test]
    fn unconfigured_app_still_answers_every_tool() {
        let app = App::unconfigured(ConfigError::Missing("GHOST_API_URL"), Logger::new("test"));
        assert!(app.config.is_none());
        assert_eq!(app.tool_executor.tool_names().len(), tool_catalog().len());
    }

    #[test]
    fn every_catalog_tool_is_wired() {
        let key = AdminKey::new("id", "00ff").expect("key");
        let config = GhostConfig::new("https://blog.test", key).expect("config");
        let app = App::initialize(config, Logger::new("test")).expect("app");
        let names = app.tool_executor.tool_names();
        for tool in tool_catalog().iter() {
            assert!(names.contains(&tool.name), "missing {}", tool.name);
        }
        assert_eq!(names.len(), tool_catalog().len());
    }
}
