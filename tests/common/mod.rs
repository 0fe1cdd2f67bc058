#![allow(dead_code)]

use ghost_admin::app::App;
use ghost_admin::services::admin_token::AdminKey;
use ghost_admin::services::config::GhostConfig;
use ghost_admin::services::ghost_client::RetryPolicy;
use ghost_admin::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const KEY_ID: &str = "6489a1f0c2a4b10001d0aa11";
pub const KEY_SECRET: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00f1e2d3c4b5a69788796a5b4c3d2e1f0";
pub const API_PREFIX: &str = "/ghost/api/admin";

pub fn admin_key() -> AdminKey {
    AdminKey::new(KEY_ID, KEY_SECRET).expect("admin key")
}

/// Points at `base_url` with retries that never sleep.
pub fn config(base_url: &str) -> GhostConfig {
    GhostConfig::new(base_url, admin_key())
        .expect("config")
        .with_timeout(Duration::from_secs(5))
        .with_retry(RetryPolicy {
            backoff_factor: 0.0,
            respect_retry_after: false,
            ..RetryPolicy::default()
        })
}

pub fn app(base_url: &str) -> App {
    App::initialize(config(base_url), quiet_logger()).expect("app")
}

pub fn quiet_logger() -> Logger {
    Logger::new("test").with_level(LogLevel::Error)
}

pub fn api_path(path: &str) -> String {
    format!("{}/{}", API_PREFIX, path)
}

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

/// An HTTP/1.1 response that closes its connection, so every retry dials anew.
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!(
        "HTTP/1.1 {}\r\nConnection: close\r\nContent-Length: {}\r\n",
        status,
        body.len()
    );
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    out.push_str(body);
    out
}

/// Answers one connection per scripted response, in order, and hands back the
/// request heads it received. Bodyless requests only.
pub async fn scripted_server(responses: Vec<String>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let mut heads = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.expect("read");
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            heads.push(String::from_utf8_lossy(&head).into_owned());
            stream.write_all(response.as_bytes()).await.expect("write");
            let _ = stream.shutdown().await;
        }
        heads
    });
    (format!("http://{}", addr), handle)
}

/// Value of `name` in a raw request head, matched case-insensitively.
pub fn header_value(head: &str, name: &str) -> Option<String> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}
