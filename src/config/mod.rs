use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

use crate::services::DEFAULT_RESET_SCHEDULE;

pub mod seeding;

pub use seeding::seed_admin;

const DEVELOPMENT_SECRET: &str = "hashem-development-secret-change-me";
const DEVELOPMENT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub session_secret: String,
    pub session_hours: i64,
    pub data_dir: PathBuf,
    pub admin_identifier: String,
    pub admin_name: String,
    pub admin_password: String,
    pub bcrypt_cost: u32,
    pub payment_reset_cron: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = var("PORT", "3000")
            .parse()
            .context("PORT must be a port number")?;
        let session_hours: i64 = var("SESSION_HOURS", "12")
            .parse()
            .context("SESSION_HOURS must be a whole number")?;
        if session_hours < 1 {
            bail!("SESSION_HOURS must be at least 1");
        }
        let bcrypt_cost: u32 = match lookup("BCRYPT_COST") {
            Some(raw) => raw.parse().context("BCRYPT_COST must be a whole number")?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }

        let config = AppConfig {
            host: var("HOST", "0.0.0.0"),
            port,
            environment: var("ENVIRONMENT", "development"),
            log_level: var("LOG_LEVEL", "info"),
            session_secret: var("SESSION_SECRET", DEVELOPMENT_SECRET),
            session_hours,
            data_dir: PathBuf::from(var("DATA_DIR", "./data")),
            admin_identifier: var("ADMIN_IDENTIFIER", "admin@hashem.local"),
            admin_name: var("ADMIN_NAME", "Administrator"),
            admin_password: var("ADMIN_PASSWORD", DEVELOPMENT_ADMIN_PASSWORD),
            bcrypt_cost,
            payment_reset_cron: var("PAYMENT_RESET_CRON", DEFAULT_RESET_SCHEDULE),
        };

        if config.is_production() {
            if config.session_secret == DEVELOPMENT_SECRET {
                bail!("SESSION_SECRET must be set in production");
            }
            if config.admin_password == DEVELOPMENT_ADMIN_PASSWORD {
                bail!("ADMIN_PASSWORD must be set in production");
            }
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_hours)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join("accounts.json")
    }

    pub fn clients_path(&self) -> PathBuf {
        self.data_dir.join("clients.json")
    }
}
