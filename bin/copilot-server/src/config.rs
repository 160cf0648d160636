//! Server configuration, loaded from environment variables at startup.

use copilot_core::api::DEFAULT_BASE_URL;

/// Runtime configuration for copilot-server.
///
/// Every field has a default so the server runs without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"127.0.0.1:8787"`).
    pub bind_address: String,

    /// SQLite database URL for the task store.
    pub database_url: String,

    /// Base URL of the extraction/assessment API.
    pub api_base: String,

    /// Full URL used for `html_extract` instead of `<api_base>/html_extract`.
    /// A stored `apiEndpoint` setting still takes precedence.
    pub extract_endpoint: Option<String>,

    /// Ordered target-element selectors; `None` keeps the built-in list.
    pub selectors: Option<Vec<String>>,

    /// Comma-separated allowed CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8787".to_owned(),
            database_url: "sqlite://copilot.db?mode=rwc".to_owned(),
            api_base: DEFAULT_BASE_URL.to_owned(),
            extract_endpoint: None,
            selectors: None,
            cors_allowed_origins: None,
            log_level: "info".to_owned(),
            log_json: false,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env_or("COPILOT_BIND", &defaults.bind_address),
            database_url: env_or("COPILOT_DATABASE_URL", &defaults.database_url),
            api_base: env_or("COPILOT_API_BASE", &defaults.api_base),
            extract_endpoint: env_opt("COPILOT_EXTRACT_ENDPOINT"),
            selectors: env_opt("COPILOT_SELECTORS").map(|v| split_list(&v)),
            cors_allowed_origins: env_opt("COPILOT_CORS_ORIGINS"),
            log_level: env_or("COPILOT_LOG", &defaults.log_level),
            log_json: std::env::var("COPILOT_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_list_is_trimmed() {
        assert_eq!(
            split_list(" div.a , ,#main > section"),
            ["div.a", "#main > section"]
        );
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bind_address, "127.0.0.1:8787");
        assert_eq!(cfg.api_base, "http://127.0.0.1:8000");
        assert!(cfg.selectors.is_none());
    }
}
