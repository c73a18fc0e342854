/// Configuration management for News Service
///
/// Everything is read from environment variables (a `.env` file is loaded by
/// the binary first). `Config::from_source` takes the lookup as a closure so
/// the parsing rules can be exercised without touching the process env.
use chrono::FixedOffset;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_SITE_URL: &str = "http://noticias.co.mz";
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 120;
const DEV_JWT_SECRET: &str = "news-service-development-secret";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to parse {key}='{value}'")]
    Invalid { key: String, value: String },

    #[error("{0}")]
    Rejected(String),
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub site: SiteConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    /// Emit JSON log lines instead of the human-readable format
    pub json_logs: bool,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

/// Bearer token verification settings.
///
/// An RS256 public key takes precedence over the HS256 shared secret.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub jwt_public_key_pem: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_public_key_pem", &self.jwt_public_key_pem.is_some())
            .finish()
    }
}

/// Public site settings
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Base URL that relative links inside article bodies are resolved against
    pub url: String,
    /// Offset used for the local (non-GMT) timestamp columns
    pub local_offset: FixedOffset,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let app = AppConfig {
            env: app_env,
            host: lookup("NEWS_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "NEWS_SERVICE_PORT", 8080)?,
            workers: parse_or(&lookup, "NEWS_SERVICE_WORKERS", 4)?,
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let cors = {
            let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
                Some(value) => value,
                None if production => {
                    return Err(ConfigError::Rejected(
                        "CORS_ALLOWED_ORIGINS must be set in production".to_string(),
                    ))
                }
                None => "http://localhost:5173".to_string(),
            };

            if production && allowed_origins.trim() == "*" {
                return Err(ConfigError::Rejected(
                    "CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string(),
                ));
            }

            CorsConfig { allowed_origins }
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgresql://localhost/noticias".to_string()),
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 2)?,
            connect_timeout_secs: parse_or(&lookup, "DATABASE_CONNECT_TIMEOUT_SECS", 5)?,
            acquire_timeout_secs: parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?,
            idle_timeout_secs: parse_or(&lookup, "DATABASE_IDLE_TIMEOUT_SECS", 600)?,
            run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", !production)?,
        };

        let auth = {
            let jwt_public_key_pem = lookup("JWT_PUBLIC_KEY_PEM").filter(|v| !v.trim().is_empty());
            let jwt_secret = match lookup("JWT_SECRET").filter(|v| !v.trim().is_empty()) {
                Some(secret) => Some(secret),
                None if jwt_public_key_pem.is_some() => None,
                None if production => {
                    return Err(ConfigError::Rejected(
                        "JWT_SECRET or JWT_PUBLIC_KEY_PEM must be set in production".to_string(),
                    ))
                }
                None => Some(DEV_JWT_SECRET.to_string()),
            };

            AuthConfig {
                jwt_secret,
                jwt_public_key_pem,
            }
        };

        let site = {
            let url = lookup("WP_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
            let minutes: i32 =
                parse_or(&lookup, "SITE_UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES)?;
            let local_offset = minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "SITE_UTC_OFFSET_MINUTES".to_string(),
                    value: minutes.to_string(),
                })?;

            SiteConfig {
                url: url.trim_end_matches('/').to_string(),
                local_offset,
            }
        };

        Ok(Config {
            app,
            cors,
            database,
            auth,
            site,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
