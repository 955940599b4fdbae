use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub local_upload: LocalUploadConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// `production` hides operator error details from responses
    pub environment: String,
    /// Bearer token guarding the admin routes; open mode when unset
    pub admin_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Pooled connection string used by the application
    pub url: String,
    /// Direct (non-pooled) connection string used for migrations
    pub direct_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// S3-compatible object storage configuration (primary upload backend)
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    /// Base URL used to build public object URLs (defaults to endpoint)
    pub public_url: String,
    pub access_key: String,
    pub secret_key: Option<String>,
    pub bucket: String,
    pub region: String,
}

/// Local filesystem fallback for uploads
#[derive(Debug, Clone)]
pub struct LocalUploadConfig {
    pub directory: PathBuf,
    pub url_prefix: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Reads an env var, treating blank values as absent
fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Collects missing required variables instead of stopping at the first one
struct RequiredVars {
    missing: Vec<String>,
}

impl RequiredVars {
    fn new() -> Self {
        Self {
            missing: Vec::new(),
        }
    }

    fn take(&mut self, name: &str) -> String {
        match read_var(name) {
            Some(value) => value,
            None => {
                self.missing.push(name.to_string());
                String::new()
            }
        }
    }

    fn finish(self) -> Result<(), ConfigError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Missing(self.missing))
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match read_var(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{} must be a valid number", name))),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let mut required = RequiredVars::new();
        let database_url = required.take("DATABASE_URL");
        let direct_url = required.take("DIRECT_URL");
        let storage_endpoint = required.take("STORAGE_ENDPOINT");
        let storage_access_key = required.take("STORAGE_ACCESS_KEY");
        let storage_bucket = required.take("STORAGE_BUCKET");
        required.finish()?;

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env(database_url, direct_url)?,
            storage: StorageConfig::new(storage_endpoint, storage_access_key, storage_bucket),
            local_upload: LocalUploadConfig::from_env(),
            swagger: SwaggerConfig::from_env(),
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = read_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_var::<u16>("PORT", 3000)?;

        let cors_allowed_origins = read_var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = read_var("APP_ENV").unwrap_or_else(|| "development".to_string());
        let admin_token = read_var("ADMIN_TOKEN");

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            environment,
            admin_token,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env(url: String, direct_url: String) -> Result<Self, ConfigError> {
        Ok(Self {
            url,
            direct_url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_var("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_var("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_var("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }

    /// True when the pooled and direct connection strings are the same
    pub fn shares_direct_url(&self) -> bool {
        self.url == self.direct_url
    }
}

impl StorageConfig {
    pub fn new(endpoint: String, access_key: String, bucket: String) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        let public_url = read_var("STORAGE_PUBLIC_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| endpoint.clone());

        Self {
            endpoint,
            public_url,
            access_key,
            secret_key: read_var("STORAGE_SECRET_KEY"),
            bucket,
            region: read_var("STORAGE_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        }
    }
}

impl LocalUploadConfig {
    pub fn from_env() -> Self {
        let directory = read_var("LOCAL_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public/uploads"));
        let url_prefix = read_var("LOCAL_UPLOAD_URL_PREFIX")
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{}", p))
            .unwrap_or_else(|| "/uploads".to_string());

        Self {
            directory,
            url_prefix,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            title: read_var("SWAGGER_TITLE").unwrap_or_else(|| "Buku Tamu API".to_string()),
            version: read_var("SWAGGER_VERSION").unwrap_or_else(|| "0.1.0".to_string()),
            description: read_var("SWAGGER_DESCRIPTION").unwrap_or_else(|| {
                "API buku tamu Kantor Kecamatan Kalipuro".to_string()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_every_missing_variable() {
        let err = ConfigError::Missing(vec![
            "DATABASE_URL".to_string(),
            "STORAGE_BUCKET".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: DATABASE_URL, STORAGE_BUCKET"
        );
    }

    #[test]
    fn test_required_vars_accumulates_missing() {
        let mut required = RequiredVars::new();
        required.take("BUKUTAMU_TEST_SURELY_UNSET_A");
        required.take("BUKUTAMU_TEST_SURELY_UNSET_B");

        assert_eq!(
            required.finish(),
            Err(ConfigError::Missing(vec![
                "BUKUTAMU_TEST_SURELY_UNSET_A".to_string(),
                "BUKUTAMU_TEST_SURELY_UNSET_B".to_string(),
            ]))
        );
    }

    #[test]
    fn test_production_flag_is_case_insensitive() {
        let app = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
            environment: "Production".to_string(),
            admin_token: None,
        };
        assert!(app.is_production());
        assert_eq!(app.server_address(), "127.0.0.1:3000");
    }
}
