use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    NotFound,
    Http,
    Config,
    Internal,
}

impl ToolErrorKind {
    fn prefix(self) -> &'static str {
        match self {
            ToolErrorKind::InvalidParams | ToolErrorKind::NotFound => "",
            ToolErrorKind::Http => "Network or HTTP error - ",
            ToolErrorKind::Config => "Configuration error - ",
            ToolErrorKind::Internal => "Unexpected error - ",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_body: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            response_body: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the raw remote body; blank bodies are dropped.
    pub fn with_response_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.trim().is_empty() {
            self.response_body = Some(body);
        }
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidParams, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound, message)
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Http, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Config, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message)
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}{}", self.kind.prefix(), self.message);
        if let Some(body) = &self.response_body {
            out.push_str("\nResponse: ");
            out.push_str(body);
        }
        out
    }

    pub fn to_envelope(&self) -> Value {
        serde_json::json!({ "error": self.render() })
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl Error for ToolError {}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_not_found_render_bare_message() {
        assert_eq!(
            ToolError::invalid_params("Post ID is required").render(),
            "Post ID is required"
        );
        assert_eq!(
            ToolError::not_found("Tag abc not found").to_envelope(),
            serde_json::json!({"error": "Tag abc not found"})
        );
    }

    #[test]
    fn http_error_appends_response_body() {
        let err = ToolError::http("422 Client Error: Unprocessable Entity for url: http://x")
            .with_status(422)
            .with_response_body(r#"{"errors":[{"message":"Validation error"}]}"#);
        assert_eq!(
            err.render(),
            "Network or HTTP error - 422 Client Error: Unprocessable Entity for url: http://x\nResponse: {\"errors\":[{\"message\":\"Validation error\"}]}"
        );
    }

    #[test]
    fn blank_response_body_is_ignored() {
        let err = ToolError::http("boom").with_response_body("   ");
        assert!(err.response_body.is_none());
        assert_eq!(err.render(), "Network or HTTP error - boom");
    }

    #[test]
    fn internal_errors_are_wrapped_generically() {
        let err: ToolError = serde_json::from_str::<Value>("{").unwrap_err().into();
        assert_eq!(err.kind, ToolErrorKind::Internal);
        assert!(err.render().starts_with("Unexpected error - "));
    }
}
