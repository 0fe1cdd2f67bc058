use crate::app::App;
use crate::errors::{McpError, ToolError};
use crate::mcp::catalog::tool_catalog;
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "ghost-admin";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        Self { app }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, name: &str, args: Value) -> Value {
        let text = self.app.tool_executor.execute_to_string(name, args).await;
        let is_error = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.as_object().map(|obj| obj.contains_key("error")))
            .unwrap_or(false);
        serde_json::json!({
            "content": [ { "type": "text", "text": text } ],
            "isError": is_error,
        })
    }

    /// Answers one request line; `None` for notifications and blank lines.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed: Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(_) => return Some(JsonRpcResponse::from_error(Value::Null, McpError::parse_error())),
        };
        let request: JsonRpcRequest = match serde_json::from_value(parsed) {
            Ok(req) => req,
            Err(_) => {
                return Some(JsonRpcResponse::from_error(
                    Value::Null,
                    McpError::invalid_request(),
                ))
            }
        };

        match request.method.as_str() {
            "notifications/initialized" => request
                .id
                .map(|id| JsonRpcResponse::success(id, serde_json::json!({}))),
            _ if request.method.starts_with("notifications/") && request.id.is_none() => None,
            "initialize" => request
                .id
                .map(|id| JsonRpcResponse::success(id, self.handle_initialize())),
            "ping" => request
                .id
                .map(|id| JsonRpcResponse::success(id, serde_json::json!({}))),
            "tools/list" => request
                .id
                .map(|id| JsonRpcResponse::success(id, self.handle_tools_list())),
            "tools/call" => {
                let id = request.id?;
                let params = request.params.as_object().cloned().unwrap_or_default();
                let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                if name.is_empty() {
                    return Some(JsonRpcResponse::from_error(id, McpError::missing_tool_name()));
                }
                let args = params.get("arguments").cloned().unwrap_or(Value::Null);
                Some(JsonRpcResponse::success(
                    id,
                    self.handle_tools_call(name, args).await,
                ))
            }
            method => request
                .id
                .map(|id| JsonRpcResponse::from_error(id, McpError::method_not_found(method))),
        }
    }

    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut writer = BufWriter::new(writer);

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.handle_line(&line).await {
                let payload = serde_json::to_string(&response)?;
                writer.write_all(payload.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }
}

pub async fn run_stdio(app: Arc<App>) -> Result<(), ToolError> {
    McpServer::new(app).run_stdio().await
}
