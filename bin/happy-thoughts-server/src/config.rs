//! Server configuration, loaded from environment variables at startup.

/// Store URL used when neither `THOUGHTS_DATABASE_URL` nor `MONGO_URL` is set.
pub const DEFAULT_DATABASE_URL: &str = "mongodb://localhost/happyThoughts";

/// Runtime configuration for happy-thoughts-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host part of the listen address (default: `"0.0.0.0"`).
    pub host: String,

    /// TCP port to listen on (default: `8080`).
    pub port: u16,

    /// Store URL. The scheme picks the backend: `mongodb://` (or
    /// `mongodb+srv://`) for MongoDB, `sqlite:` for an embedded database.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Serve the Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,

    /// Comma-separated list of allowed CORS origins. `None` allows any origin.
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("THOUGHTS_DATABASE_URL")
            .or_else(|| lookup("MONGO_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        Self {
            host: lookup("THOUGHTS_HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse_var(&lookup, "PORT", 8080),
            database_url,
            log_level: lookup("THOUGHTS_LOG").unwrap_or_else(|| "info".to_owned()),
            log_json: flag_var(&lookup, "THOUGHTS_LOG_JSON", false),
            enable_swagger: flag_var(&lookup, "THOUGHTS_ENABLE_SWAGGER", true),
            cors_allowed_origins: lookup("THOUGHTS_CORS_ORIGINS")
                .filter(|origins| !origins.trim().is_empty()),
        }
    }

    /// `host:port` string suitable for [`std::net::SocketAddr`] parsing.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}
