//! Process-level server settings read from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_RECONNECT_GRACE_SECS: u64 = 180;
pub const DEFAULT_BOT_DELAY_MS: u64 = 700;
pub const DEFAULT_MAX_PUBLIC_ROOMS_LISTED: usize = 50;
pub const DEFAULT_IDENTITY_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long a disconnected seated player keeps their seat.
    pub reconnect_grace: Duration,
    /// Base think time before a bot acts.
    pub bot_delay: Duration,
    pub max_public_rooms_listed: usize,
    /// How long an identity with no open session is remembered.
    pub identity_ttl: Duration,
    /// Explicit CORS origins; empty means localhost only.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            reconnect_grace: Duration::from_secs(DEFAULT_RECONNECT_GRACE_SECS),
            bot_delay: Duration::from_millis(DEFAULT_BOT_DELAY_MS),
            max_public_rooms_listed: DEFAULT_MAX_PUBLIC_ROOMS_LISTED,
            identity_ttl: Duration::from_secs(DEFAULT_IDENTITY_TTL_SECS),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Unset variables take their
    /// defaults; set but unparsable ones are configuration errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parsed(&lookup, "BACKEND_PORT", DEFAULT_PORT)?;
        let grace_secs = parsed(
            &lookup,
            "BLOT_RECONNECT_GRACE_SECS",
            DEFAULT_RECONNECT_GRACE_SECS,
        )?;
        let bot_delay_ms = parsed(&lookup, "BLOT_BOT_DELAY_MS", DEFAULT_BOT_DELAY_MS)?;
        let max_listed = parsed(
            &lookup,
            "BLOT_MAX_PUBLIC_ROOMS_LISTED",
            DEFAULT_MAX_PUBLIC_ROOMS_LISTED,
        )?;
        let ttl_secs = parsed(&lookup, "BLOT_IDENTITY_TTL_SECS", DEFAULT_IDENTITY_TTL_SECS)?;
        if ttl_secs <= grace_secs {
            return Err(AppError::config(format!(
                "BLOT_IDENTITY_TTL_SECS ({ttl_secs}) must exceed BLOT_RECONNECT_GRACE_SECS ({grace_secs})"
            )));
        }

        // Comma-separated, e.g. http://localhost:3000,https://blot.example
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null")
            .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
            .map(str::to_string)
            .collect();

        Ok(Self {
            host,
            port,
            reconnect_grace: Duration::from_secs(grace_secs),
            bot_delay: Duration::from_millis(bot_delay_ms),
            max_public_rooms_listed: max_listed,
            identity_ttl: Duration::from_secs(ttl_secs),
            cors_origins,
        })
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has an invalid value: {raw}"
            ))
        }),
    }
}
