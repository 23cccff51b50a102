use chrono_tz::Tz;
use std::path::PathBuf;

use crate::receipt::Branding;

/// Default business timezone
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Argentina::Buenos_Aires;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database and log directory |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | Default tracing filter when RUST_LOG is unset |
/// | LOG_DIR | (none) | Enables daily rolling log files |
/// | TIMEZONE | America/Argentina/Buenos_Aires | Receipt timestamps |
/// | BUSINESS_NAME | Maitreya | Receipt header |
/// | BUSINESS_SUBTITLE | by Patagonia Gourmet | Receipt subheader |
/// | KITCHEN_REFRESH_SECS | 40 | Kitchen reconciliation interval |
/// | STAFF_EMAIL | staff@localhost | Staff login email |
/// | STAFF_PASSWORD_HASH | (none) | argon2 PHC hash; login disabled when unset |
/// | JWT_SECRET | (generated in debug) | Token signing secret, ≥ 32 chars |
/// | JWT_EXPIRATION_MINUTES | 720 | Token lifetime |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown grace period |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/var/lib/menu HTTP_PORT=8080 menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub timezone: Tz,
    pub business_name: String,
    pub business_subtitle: String,
    pub kitchen_refresh_secs: u64,
    pub staff_email: String,
    pub staff_password_hash: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_minutes: i64,
    pub shutdown_timeout_ms: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let timezone = match env_opt("TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                tracing::warn!(timezone = %name, "Unknown TIMEZONE, using default");
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: env_or("ENVIRONMENT", "development"),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),
            timezone,
            business_name: env_or("BUSINESS_NAME", "Maitreya"),
            business_subtitle: env_or("BUSINESS_SUBTITLE", "by Patagonia Gourmet"),
            kitchen_refresh_secs: env_parse("KITCHEN_REFRESH_SECS", 40u64).max(1),
            staff_email: env_or("STAFF_EMAIL", "staff@localhost"),
            staff_password_hash: env_opt("STAFF_PASSWORD_HASH"),
            jwt_secret: env_opt("JWT_SECRET"),
            jwt_expiration_minutes: env_parse("JWT_EXPIRATION_MINUTES", 720),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        }
    }

    /// Override work dir and port; used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("menu.redb")
    }

    /// Create the work directory layout
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    /// Receipt header
    pub fn branding(&self) -> Branding {
        Branding {
            business_name: self.business_name.clone(),
            subtitle: self.business_subtitle.clone(),
            timezone: self.timezone,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
