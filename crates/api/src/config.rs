use gather_core::feedback::SubmissionPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Access-token validation settings.
    pub jwt: JwtConfig,
    /// Rules applied to public feedback submissions.
    pub feedback: SubmissionPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                 |
    /// |------------------------------|-------------------------|
    /// | `HOST`                       | `0.0.0.0`               |
    /// | `PORT`                       | `3000`                  |
    /// | `CORS_ORIGINS`               | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                    |
    /// | `FEEDBACK_REQUIRE_IDENTITY`  | `false`                 |
    /// | `FEEDBACK_MIN_COMMENT_CHARS` | `1`                     |
    ///
    /// JWT settings are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = SubmissionPolicy::default();

        let require_identity: bool = std::env::var("FEEDBACK_REQUIRE_IDENTITY")
            .map(|v| v.parse().expect("FEEDBACK_REQUIRE_IDENTITY must be true or false"))
            .unwrap_or(defaults.require_identity);

        let min_comment_chars: usize = std::env::var("FEEDBACK_MIN_COMMENT_CHARS")
            .map(|v| v.parse().expect("FEEDBACK_MIN_COMMENT_CHARS must be a valid usize"))
            .unwrap_or(defaults.min_comment_chars);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            feedback: SubmissionPolicy {
                require_identity,
                min_comment_chars,
            },
        }
    }
}
