//! Configuration module
//!
//! Environment-driven application configuration. Secrets are injected by
//! value into the services that need them rather than read as ambient
//! state, so tests can run with fixed keys.

use std::env;

const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const TOKEN_TTL_MINUTES: u64 = 60;
const PASSWORD_ITERATIONS: u32 = 390_000;
const MAX_ASSET_SIZE_MB: u64 = 50;
const CHUNK_SIZE_BYTES: u64 = 1024 * 1024;
const UPLOAD_RETENTION_HOURS: i64 = 24;
const UPLOAD_SWEEP_INTERVAL_SECS: u64 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Process-wide signing secret for bearer tokens. Never logged.
    pub secret_key: String,
    pub token_ttl_minutes: u64,
    pub password_iterations: u32,
    pub storage_path: String,
    pub storage_base_url: String,
    pub max_asset_size_bytes: u64,
    pub accepted_extension: String,
    pub accepted_mime: String,
    pub chunk_size_bytes: u64,
    pub upload_retention_hours: i64,
    pub upload_sweep_interval_secs: u64,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            secret_key: env::var("SECRET_KEY")
                .map_err(|_| anyhow::anyhow!("SECRET_KEY must be set for authentication"))?,
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| TOKEN_TTL_MINUTES.to_string())
                .parse()
                .unwrap_or(TOKEN_TTL_MINUTES),
            password_iterations: env::var("PASSWORD_ITERATIONS")
                .unwrap_or_else(|_| PASSWORD_ITERATIONS.to_string())
                .parse()
                .unwrap_or(PASSWORD_ITERATIONS),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "storage".to_string()),
            storage_base_url: env::var("STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/media".to_string()),
            max_asset_size_bytes: env::var("MAX_ASSET_SIZE_MB")
                .unwrap_or_else(|_| MAX_ASSET_SIZE_MB.to_string())
                .parse::<u64>()
                .unwrap_or(MAX_ASSET_SIZE_MB)
                * 1024
                * 1024,
            accepted_extension: env::var("ACCEPTED_EXTENSION")
                .unwrap_or_else(|_| "mp4".to_string())
                .trim()
                .to_lowercase(),
            accepted_mime: env::var("ACCEPTED_MIME")
                .unwrap_or_else(|_| "video/mp4".to_string())
                .trim()
                .to_lowercase(),
            chunk_size_bytes: env::var("CHUNK_SIZE_BYTES")
                .unwrap_or_else(|_| CHUNK_SIZE_BYTES.to_string())
                .parse()
                .unwrap_or(CHUNK_SIZE_BYTES),
            upload_retention_hours: env::var("UPLOAD_RETENTION_HOURS")
                .unwrap_or_else(|_| UPLOAD_RETENTION_HOURS.to_string())
                .parse()
                .unwrap_or(UPLOAD_RETENTION_HOURS),
            upload_sweep_interval_secs: env::var("UPLOAD_SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| UPLOAD_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(UPLOAD_SWEEP_INTERVAL_SECS),
            environment,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.secret_key.len() < 32 {
            return Err(anyhow::anyhow!(
                "SECRET_KEY must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_asset_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_ASSET_SIZE_MB must be greater than 0"));
        }

        if self.accepted_extension.is_empty() || self.accepted_extension.contains('.') {
            return Err(anyhow::anyhow!(
                "ACCEPTED_EXTENSION must be a bare extension without a leading dot"
            ));
        }

        if !self.accepted_mime.contains('/') {
            return Err(anyhow::anyhow!("ACCEPTED_MIME must be a type/subtype pair"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 4000,
            cors_origins: vec!["*".to_string()],
            database_url: "postgresql://localhost/cutroom".to_string(),
            db_max_connections: 20,
            db_timeout_seconds: 30,
            secret_key: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl_minutes: 60,
            password_iterations: 390_000,
            storage_path: "storage".to_string(),
            storage_base_url: "http://localhost:4000/media".to_string(),
            max_asset_size_bytes: 50 * 1024 * 1024,
            accepted_extension: "mp4".to_string(),
            accepted_mime: "video/mp4".to_string(),
            chunk_size_bytes: 1024 * 1024,
            upload_retention_hours: 24,
            upload_sweep_interval_secs: 300,
            environment: "development".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = base_config();
        config.secret_key = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = base_config();
        config.database_url = "mysql://localhost/cutroom".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let mut config = base_config();
        config.accepted_extension = ".mp4".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wildcard_cors_in_production() {
        let mut config = base_config();
        config.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(config.validate().is_ok());
    }
}
