//! Command-line surface for `ghost-admin`.

use crate::app::App;
use crate::errors::ToolError;
use crate::mcp::describe::{describe_all, describe_tool};
use crate::mcp::server;
use crate::services::admin_token::{create_admin_token, verify_admin_token};
use crate::services::config::GhostConfig;
use crate::services::logger::Logger;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ghost-admin", version, about = "Ghost Admin API tools over MCP stdio or the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the tools over MCP JSON-RPC on stdio (default)
    Serve,
    /// Run one tool and print its JSON result
    Call {
        /// Tool name, e.g. list_ghost_posts
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Describe one tool, or all tools when no name is given
    Describe {
        tool: Option<String>,
    },
    /// Print a fresh admin token for the configured key
    Token {
        /// Also decode and check the token, printing its claims to stderr
        #[arg(long)]
        verify: bool,
    },
}

/// Runs the parsed command and returns the process exit code.
pub async fn run(cli: Cli) -> i32 {
    let logger = Logger::new("ghost-admin");
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(logger).await,
        Commands::Call { tool, args } => call(logger, &tool, &args).await,
        Commands::Describe { tool } => describe(tool.as_deref()),
        Commands::Token { verify } => token(&logger, verify),
    }
}

async fn serve(logger: Logger) -> i32 {
    let config = match GhostConfig::from_env() {
        Ok(config) => config,
        Err(err) => return fail(&logger, &err.into()),
    };
    let app = match App::initialize(config, logger.clone()) {
        Ok(app) => Arc::new(app),
        Err(err) => return fail(&logger, &err),
    };
    match server::run_stdio(app).await {
        Ok(()) => 0,
        Err(err) => fail(&logger, &err),
    }
}

async fn call(logger: Logger, tool: &str, raw_args: &str) -> i32 {
    let output = match parse_args(raw_args) {
        Ok(args) => match App::from_env(logger.clone()) {
            Ok(app) => app.tool_executor.execute(tool, args).await,
            Err(err) => err.to_envelope(),
        },
        Err(err) => err.to_envelope(),
    };
    println!("{}", output);
    if output.get("error").is_some() {
        1
    } else {
        0
    }
}

fn parse_args(raw: &str) -> Result<Value, ToolError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| ToolError::invalid_params(format!("--args must be valid JSON: {}", err)))?;
    if !value.is_object() {
        return Err(ToolError::invalid_params("--args must be a JSON object"));
    }
    Ok(value)
}

fn describe_output(tool: Option<&str>) -> Result<Value, ToolError> {
    match tool {
        None => Ok(describe_all()),
        Some(name) => describe_tool(name)
            .ok_or_else(|| ToolError::not_found(format!("Unknown tool: {}", name))),
    }
}

fn describe(tool: Option<&str>) -> i32 {
    let output = match describe_output(tool) {
        Ok(output) => output,
        Err(err) => {
            println!("{}", err.to_envelope());
            return 1;
        }
    };
    match serde_json::to_string_pretty(&output) {
        Ok(text) => {
            println!("{}", text);
            0
        }
        Err(err) => {
            println!("{}", ToolError::from(err).to_envelope());
            1
        }
    }
}

fn token(logger: &Logger, verify: bool) -> i32 {
    let config = match GhostConfig::from_env() {
        Ok(config) => config,
        Err(err) => return fail(logger, &err.into()),
    };
    let token = create_admin_token(&config.admin_key);
    if verify {
        match verify_admin_token(&token, &config.admin_key) {
            Ok(claims) => eprintln!(
                "kid={} iat={} exp={} aud={}",
                config.admin_key.id(),
                claims.iat,
                claims.exp,
                claims.aud
            ),
            Err(err) => return fail(logger, &err.into()),
        }
    }
    println!("{}", token);
    0
}

fn fail(logger: &Logger, err: &ToolError) -> i32 {
    logger.error(&err.render(), None);
    1
}
