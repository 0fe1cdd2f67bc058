pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const ADMIN_API_PATH: &str = "ghost/api/admin";
    pub const USER_AGENT: &str = concat!("ghost-admin/", env!("CARGO_PKG_VERSION"));
}

pub mod retry {
    pub const MAX_RETRIES: usize = 3;
    pub const BACKOFF_FACTOR: f64 = 1.0;
    pub const BACKOFF_MAX_MS: u64 = 120_000;
    pub const STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];
    pub const RETRY_AFTER_STATUS_CODES: &[u16] = &[413, 429, 503];
    pub const IDEMPOTENT_METHODS: &[&str] = &["GET", "HEAD", "PUT", "DELETE", "OPTIONS"];
}

pub mod token {
    pub const ALGORITHM: &str = "HS256";
    pub const TYPE: &str = "JWT";
    pub const AUDIENCE: &str = "/admin/";
    pub const TTL_SECONDS: i64 = 300;
}

pub mod pagination {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 15;
    pub const CONTENT_INCLUDE: &str = "tags,authors";
    pub const TAG_INCLUDE: &str = "count.posts";
}

pub mod env {
    pub const API_URL: &str = "GHOST_API_URL";
    pub const ADMIN_API_KEY: &str = "GHOST_ADMIN_API_KEY";
    pub const ADMIN_KEY_ID: &str = "GHOST_ADMIN_KEY_ID";
    pub const ADMIN_KEY_SECRET: &str = "GHOST_ADMIN_KEY_SECRET";
    pub const TIMEOUT_MS: &str = "GHOST_TIMEOUT_MS";
    pub const MAX_RETRIES: &str = "GHOST_MAX_RETRIES";
    pub const BACKOFF_FACTOR: &str = "GHOST_BACKOFF_FACTOR";
    pub const LOG_LEVEL: &str = "GHOST_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod tools {
    pub const SENTINEL: &str = "__tool_info__";
    pub const DESCRIBE_TOOL: &str = "describe_ghost_tools";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}

pub mod choices {
    pub const CONTENT_STATUSES: &[&str] = &["draft", "published", "scheduled"];
    pub const DEFAULT_STATUS: &str = "draft";
    pub const TAG_VISIBILITIES: &[&str] = &["public", "internal"];
    pub const DEFAULT_VISIBILITY: &str = "public";
}
