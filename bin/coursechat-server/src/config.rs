//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

/// How the auth boundary resolves a request's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Look the session token up in the local `session` table.
    Store,
    /// Ask the auth provider's `get-session` endpoint.
    Remote,
}

impl AuthMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "remote" => AuthMode::Remote,
            _ => AuthMode::Store,
        }
    }
}

/// Runtime configuration for coursechat-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://coursechat.db?mode=rwc"`).
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated CORS origins; `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Origins accepted on state-changing requests (default: the front-end
    /// origin). Requests from anywhere else, or without `Origin`, get 403.
    pub trusted_origins: Vec<String>,

    /// Base URL of the service exposing `/api/list_courses` and `/api/agent`.
    pub agent_base_url: String,

    pub auth_mode: AuthMode,

    /// Base URL of the auth provider (used by [`AuthMode::Remote`]).
    pub auth_base_url: String,

    /// How many recent messages the chat page loads.
    pub history_limit: u32,

    /// Timeout applied to every outbound request.
    pub upstream_timeout: Duration,

    pub enable_swagger: bool,
}

/// Origin the chat front end is served from in development.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:5173";

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary variable lookup.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let env_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_owned());
        let env_flag = |key: &str, default: bool| {
            var(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };
        Self {
            bind_address: env_or("COURSECHAT_BIND", "0.0.0.0:3000"),
            database_url: env_or("COURSECHAT_DATABASE_URL", "sqlite://coursechat.db?mode=rwc"),
            log_level: env_or("COURSECHAT_LOG", "info"),
            log_json: env_flag("COURSECHAT_LOG_JSON", false),
            cors_allowed_origins: var("COURSECHAT_CORS_ORIGINS"),
            trusted_origins: split_list(&env_or("COURSECHAT_TRUSTED_ORIGINS", DEFAULT_FRONTEND_ORIGIN)),
            agent_base_url: env_or("COURSECHAT_AGENT_URL", "http://127.0.0.1:8000"),
            auth_mode: AuthMode::parse(&env_or("COURSECHAT_AUTH_MODE", "store")),
            auth_base_url: env_or("COURSECHAT_AUTH_URL", "http://127.0.0.1:5173"),
            history_limit: parse_or(var("COURSECHAT_HISTORY_LIMIT"), 10),
            upstream_timeout: Duration::from_secs(parse_or(var("COURSECHAT_UPSTREAM_TIMEOUT_SECS"), 60)),
            enable_swagger: env_flag("COURSECHAT_ENABLE_SWAGGER", true),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
pub(crate) fn test_config(agent_base_url: &str) -> Config {
    Config {
        bind_address: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        log_level: "debug".into(),
        log_json: false,
        cors_allowed_origins: None,
        trusted_origins: vec![DEFAULT_FRONTEND_ORIGIN.to_owned()],
        agent_base_url: agent_base_url.to_owned(),
        auth_mode: AuthMode::Store,
        auth_base_url: "http://127.0.0.1:9".into(),
        history_limit: 10,
        upstream_timeout: Duration::from_secs(5),
        enable_swagger: false,
    }
}
