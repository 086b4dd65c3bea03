use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use log::{info, warn};
use mundofit_domain::{AdminCredentials, PASSWORD_COST};

pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_ENVIRONMENT: &str = "desenvolvimento";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub admin: Option<AdminCredentials>,
    /// JSON snapshot of all documents, loaded at startup and written back on shutdown.
    pub data_file: Option<PathBuf>,
    pub environment: String,
    pub password_cost: u32,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let password_cost = try_load(&lookup, "MUNDOFIT_BCRYPT_COST", &PASSWORD_COST.to_string())?;
        if !(4..=31).contains(&password_cost) {
            return Err(ConfigError::Invalid {
                key: "MUNDOFIT_BCRYPT_COST",
                message: format!("{password_cost} is outside of 4..=31"),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", DEFAULT_PORT)?,
            admin: admin(&lookup),
            data_file: non_empty(&lookup, "MUNDOFIT_DATA_FILE").map(PathBuf::from),
            environment: try_load(&lookup, "MUNDOFIT_ENV", DEFAULT_ENVIRONMENT)?,
            password_cost,
        })
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    non_empty(lookup, key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        })
}

fn admin(lookup: &impl Fn(&str) -> Option<String>) -> Option<AdminCredentials> {
    match (
        non_empty(lookup, "ADMIN_EMAIL"),
        non_empty(lookup, "ADMIN_SENHA"),
    ) {
        (Some(email), Some(password)) => Some(AdminCredentials { email, password }),
        (None, None) => {
            info!("ADMIN_EMAIL and ADMIN_SENHA not set, administrator login disabled");
            None
        }
        _ => {
            warn!("Only one of ADMIN_EMAIL and ADMIN_SENHA is set, administrator login disabled");
            None
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}
