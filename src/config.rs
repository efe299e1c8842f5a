use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Largest accepted CSV upload body
    pub import_max_bytes: usize,

    // Reporting windows
    pub dashboard_window_days: u32,
    pub absence_window_days: u32,

    pub log_dir: String,
    pub log_level: tracing::Level,

    /// Seeded on startup when the users table is empty
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://enterprise.db".to_string(),
            jwt_secret: String::new(),
            server_addr: "127.0.0.1:8080".to_string(),
            access_token_ttl: 900,     // 15 min
            refresh_token_ttl: 604800, // 7 days
            rate_login_per_min: 60,
            rate_refresh_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
            import_max_bytes: 32 * 1024 * 1024,
            dashboard_window_days: 90,
            absence_window_days: 30,
            log_dir: "logs".to_string(),
            log_level: tracing::Level::DEBUG,
            admin_username: None,
            admin_password: None,
        }
    }
}

fn var_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} is malformed: {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            jwt_secret,
            access_token_ttl: var_or("ACCESS_TOKEN_TTL", defaults.access_token_ttl)?,
            refresh_token_ttl: var_or("REFRESH_TOKEN_TTL", defaults.refresh_token_ttl)?,

            rate_login_per_min: var_or("RATE_LOGIN_PER_MIN", defaults.rate_login_per_min)?,
            rate_refresh_per_min: var_or("RATE_REFRESH_PER_MIN", defaults.rate_refresh_per_min)?,
            rate_protected_per_min: var_or(
                "RATE_PROTECTED_PER_MIN",
                defaults.rate_protected_per_min,
            )?,

            api_prefix: env::var("API_PREFIX").unwrap_or(defaults.api_prefix),
            import_max_bytes: var_or("IMPORT_MAX_BYTES", defaults.import_max_bytes)?,

            dashboard_window_days: var_or(
                "DASHBOARD_WINDOW_DAYS",
                defaults.dashboard_window_days,
            )?,
            absence_window_days: var_or("ABSENCE_WINDOW_DAYS", defaults.absence_window_days)?,

            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: var_or("LOG_LEVEL", defaults.log_level)?,

            admin_username: env::var("ADMIN_USERNAME").ok().filter(|v| !v.trim().is_empty()),
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        })
    }
}
