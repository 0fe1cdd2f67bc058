pub mod admin_token;
pub mod config;
pub mod ghost_client;
pub mod logger;
pub mod tool_executor;
pub mod validation;
