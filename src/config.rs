// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AppConfig`] struct loaded at startup. Protocol components receive their
//! configuration explicitly at construction; nothing reads the environment
//! after startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the challenge database | `data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_TOKEN_SECRET` | HMAC secret for session token signing | Required |
//! | `CHALLENGE_TTL_SECS` | Freshness window for outstanding challenges | `300` |
//! | `TOKEN_TTL_SECS` | Session token lifetime | `86400` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the session token signing secret.
pub const TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Environment variable name for the challenge freshness window override.
pub const CHALLENGE_TTL_ENV: &str = "CHALLENGE_TTL_SECS";

/// Environment variable name for the session token lifetime override.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Default freshness window: a challenge must be verified within 5 minutes.
pub const DEFAULT_CHALLENGE_TTL_SECS: i64 = 300;

/// Default session token lifetime: 24 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Configuration errors raised during startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("{0} must be a positive integer number of seconds")]
    InvalidDuration(&'static str),
}

/// Authentication protocol configuration.
///
/// Passed into [`crate::auth::ChallengeVerifier`] and
/// [`crate::auth::SessionTokenIssuer`] at construction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Server-held secret used to HMAC-sign session tokens.
    pub token_secret: String,
    /// Maximum elapsed seconds between challenge issuance and verification.
    pub challenge_ttl_secs: i64,
    /// Session token lifetime in seconds.
    pub token_ttl_secs: i64,
}

/// Top-level application configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the challenge database file.
    pub data_dir: PathBuf,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Protocol configuration.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Fails if `AUTH_TOKEN_SECRET` is unset or a duration override does not
    /// parse as a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token_secret = std::env::var(TOKEN_SECRET_ENV)
            .map_err(|_| ConfigError::MissingVar(TOKEN_SECRET_ENV))?;

        let challenge_ttl_secs =
            parse_ttl(CHALLENGE_TTL_ENV, DEFAULT_CHALLENGE_TTL_SECS)?;
        let token_ttl_secs = parse_ttl(TOKEN_TTL_ENV, DEFAULT_TOKEN_TTL_SECS)?;

        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Ok(Self {
            data_dir,
            host,
            port,
            auth: AuthConfig {
                token_secret,
                challenge_ttl_secs,
                token_ttl_secs,
            },
        })
    }
}

fn parse_ttl(var: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidDuration(var)),
        Err(_) => Ok(default),
    }
}
