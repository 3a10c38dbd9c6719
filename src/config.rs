use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};
use thiserror::Error;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE_NAME: &str = "TravelPlanner";
const JWT_TTL_HOURS: i64 = 24;
const MAX_JWT_TTL_HOURS: i64 = 24 * 365;
#[cfg(debug_assertions)]
const DEV_JWT_SECRET: &str = "development_secret";

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub database_name: String,
    pub auth: AuthConfig,
}

/// Token settings shared with the auth middleware and the signin routes.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri =
            lookup("MONGODB_URI").ok_or_else(|| ConfigError("MONGODB_URI must be set".into()))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| HOST.to_string()),
            port: parse_or(&lookup, "PORT", PORT)?,
            mongo_uri,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| DATABASE_NAME.to_string()),
            auth: AuthConfig {
                jwt_secret: jwt_secret(&lookup)?,
                token_ttl_hours: token_ttl_hours(&lookup)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError(format!("invalid {} value {:?}: {}", key, raw, e))),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

fn token_ttl_hours<F>(lookup: &F) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let hours = parse_or(lookup, "JWT_TTL_HOURS", JWT_TTL_HOURS)?;
    if !(1..=MAX_JWT_TTL_HOURS).contains(&hours) {
        return Err(ConfigError(format!(
            "JWT_TTL_HOURS must be between 1 and {}, got {}",
            MAX_JWT_TTL_HOURS, hours
        )));
    }
    Ok(hours)
}

#[cfg(debug_assertions)]
fn jwt_secret<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(lookup("JWT_SECRET").unwrap_or_else(|| {
        warn!("JWT_SECRET not set, using the development secret");
        DEV_JWT_SECRET.to_string()
    }))
}

#[cfg(not(debug_assertions))]
fn jwt_secret<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup("JWT_SECRET").ok_or_else(|| {
        warn!("JWT_SECRET missing in release build");
        ConfigError("JWT_SECRET must be set".into())
    })
}
