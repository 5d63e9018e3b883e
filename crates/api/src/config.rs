use std::str::FromStr;

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
    /// Minimum password length accepted at registration (default: `8`).
    pub min_password_length: usize,
    /// Upper bound on pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// Remote image host; uploads are disabled when `None`.
    pub picsur: Option<PicsurConfig>,
}

/// Connection settings for the Picsur image host.
#[derive(Debug, Clone)]
pub struct PicsurConfig {
    /// Base URL, e.g. `https://picsur.example.com`.
    pub api_url: String,
    pub api_key: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MIN_PASSWORD_LENGTH`  | `8`                        |
    /// | `DB_MAX_CONNECTIONS`   | `20`                       |
    /// | `PICSUR_API_URL`       | unset                      |
    /// | `PICSUR_API_KEY`       | unset                      |
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let picsur = match (
            std::env::var("PICSUR_API_URL").ok(),
            std::env::var("PICSUR_API_KEY").ok(),
        ) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some(PicsurConfig {
                    api_url: url.trim().trim_end_matches('/').to_string(),
                    api_key: key.trim().to_string(),
                })
            }
            _ => None,
        };

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            min_password_length: env_or("MIN_PASSWORD_LENGTH", 8),
            db_max_connections: env_or(
                "DB_MAX_CONNECTIONS",
                chardb_db::DEFAULT_MAX_CONNECTIONS,
            ),
            picsur,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_drops_blanks() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u16 = env_or("CHARDB_TEST_SURELY_UNSET_VAR", 4242);
        assert_eq!(value, 4242);
    }
}
