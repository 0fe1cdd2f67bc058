use serde::Serialize;
use thiserror::Error;

/// JSON-RPC 2.0 fault codes answered by the stdio server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A protocol-level failure. Tool failures never become one of these; they
/// travel inside a successful `tools/call` result instead.
#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct McpError {
    pub code: ErrorCode,
    pub message: String,
}

impl McpError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error() -> Self {
        Self::new(ErrorCode::ParseError, "Parse error")
    }

    pub fn invalid_request() -> Self {
        Self::new(ErrorCode::InvalidRequest, "Invalid request")
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotFound,
            format!("Method not found: {}", method),
        )
    }

    pub fn missing_tool_name() -> Self {
        Self::new(ErrorCode::InvalidParams, "Missing tool name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_json_rpc() {
        assert_eq!(McpError::parse_error().code.as_i32(), -32700);
        assert_eq!(McpError::missing_tool_name().code.as_i32(), -32602);
        let err = McpError::method_not_found("resources/list");
        assert_eq!(err.code, ErrorCode::MethodNotFound);
        assert_eq!(err.to_string(), "Method not found: resources/list");
    }
}
