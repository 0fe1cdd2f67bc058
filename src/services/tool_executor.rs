use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::constants::tools::DESCRIBE_TOOL;
use crate::errors::ToolError;
use crate::mcp::catalog::validate_tool_args;
use crate::mcp::describe::{describe_all, describe_tool, sentinel_request};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::suggest::suggest;

use serde_json::Value;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    validation: Validation,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            validation: Validation::new(),
            handlers: Arc::new(handlers),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.push(DESCRIBE_TOOL.to_string());
        names.sort();
        names
    }

    /// Runs a tool and always answers with a JSON value: the result or an
    /// `{"error": ...}` envelope.
    pub async fn execute(&self, tool: &str, args: Value) -> Value {
        match self.try_execute(tool, args).await {
            Ok(value) => value,
            Err(err) => {
                self.logger.warn(
                    "tool failed",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "kind": err.kind,
                        "status": err.status,
                    })),
                );
                err.to_envelope()
            }
        }
    }

    /// The envelope serialized the way tool callers receive it.
    pub async fn execute_to_string(&self, tool: &str, args: Value) -> String {
        let value = self.execute(tool, args).await;
        serde_json::to_string(&value).unwrap_or_else(|err| {
            ToolError::internal(format!("Failed to serialize result: {}", err))
                .to_envelope()
                .to_string()
        })
    }

    pub async fn try_execute(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        // Explicit nulls mean "not provided".
        let args = match args {
            Value::Null => Value::Object(Default::default()),
            Value::Object(map) => {
                Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect())
            }
            _ => {
                return Err(ToolError::invalid_params(format!(
                    "Arguments for {} must be a JSON object",
                    tool
                )))
            }
        };

        if tool == DESCRIBE_TOOL {
            return self.describe(&args);
        }
        if sentinel_request(tool, &args) {
            return describe_tool(tool)
                .ok_or_else(|| ToolError::not_found(format!("Unknown tool: {}", tool)));
        }

        let Some(handler) = self.handlers.get(tool) else {
            return Err(self.unknown_tool(tool));
        };
        validate_tool_args(tool, &args)?;

        let started = Instant::now();
        self.logger.debug("tool call", Some(&serde_json::json!({ "tool": tool })));
        let result = handler.handle(args).await;
        self.logger.info(
            "tool finished",
            Some(&serde_json::json!({
                "tool": tool,
                "ok": result.is_ok(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );
        result
    }

    fn describe(&self, args: &Value) -> Result<Value, ToolError> {
        match args.get("tool") {
            None | Some(Value::Null) => Ok(describe_all()),
            Some(value) => {
                let name = self.validation.ensure_string(value, "tool", true)?;
                describe_tool(&name).ok_or_else(|| self.unknown_tool(&name))
            }
        }
    }

    fn unknown_tool(&self, tool: &str) -> ToolError {
        let suggestions = suggest(tool, &self.tool_names(), 3);
        if suggestions.is_empty() {
            ToolError::not_found(format!("Unknown tool: {}", tool))
        } else {
            ToolError::not_found(format!(
                "Unknown tool: {} (did you mean: {})",
                tool,
                suggestions.join(", ")
            ))
        }
    }
}
