// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use internal_error::{InternalError, ResultIntoInternal};
use observability::config::LoggingConfig;
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};
use wallet_auth::{
    DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
    DEFAULT_CHALLENGE_TTL_SECONDS,
    DEFAULT_REGISTERED_ACCOUNT_PREFIX,
    JwtAuthenticationConfig,
    WalletAddress,
    WalletAuthConfig,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_CHALLENGE_CLEANUP_INTERVAL_SECONDS: u64 = 10 * 60;

/// Consulted when the config file sets no `auth.jwtSecret`
pub const ENV_VAR_WALLET_AUTH_JWT_SECRET: &str = "WALLET_AUTH_JWT_SECRET";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ServerConfig {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub maintenance: MaintenanceConfig,
}

impl ServerConfig {
    /// Reads the YAML config. Without a path every section takes its
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, InternalError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).int_err()?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, InternalError> {
        serde_yaml::from_str(text).int_err()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct HttpConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "camelCase")]
pub enum DatabaseConfig {
    /// State is lost on restart
    #[default]
    InMemory,
    #[serde(rename_all = "camelCase")]
    Sqlite { database_path: PathBuf },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AuthConfig {
    pub app_name: String,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub challenge_ttl: Duration,
    pub allow_registration: bool,
    pub admin_wallets: Vec<WalletAddress>,
    pub registered_account_prefix: String,
    /// Signs access tokens. A random one is generated when unset, so tokens
    /// are invalidated by a restart.
    pub jwt_secret: Option<String>,
    #[serde_as(as = "DurationSeconds<u64>")]
    pub access_token_ttl: Duration,
}

impl AuthConfig {
    pub fn to_domain_config(&self) -> Result<WalletAuthConfig, InternalError> {
        if self.challenge_ttl.is_zero() {
            return InternalError::bail("auth.challengeTtl must be positive");
        }

        Ok(WalletAuthConfig {
            app_name: self.app_name.clone(),
            challenge_ttl: chrono::Duration::from_std(self.challenge_ttl).int_err()?,
            allow_registration: self.allow_registration,
            admin_wallets: self.admin_wallets.clone(),
            registered_account_prefix: self.registered_account_prefix.clone(),
        })
    }

    pub fn to_jwt_config(&self) -> Result<JwtAuthenticationConfig, InternalError> {
        if self.access_token_ttl.is_zero() {
            return InternalError::bail("auth.accessTokenTtl must be positive");
        }

        let maybe_jwt_secret = self
            .jwt_secret
            .clone()
            .or_else(|| std::env::var(ENV_VAR_WALLET_AUTH_JWT_SECRET).ok())
            .filter(|secret| !secret.is_empty());

        if maybe_jwt_secret.is_none() {
            tracing::warn!(
                "No JWT secret configured, issued access tokens will not survive a restart"
            );
        }

        Ok(JwtAuthenticationConfig {
            access_token_ttl: chrono::Duration::from_std(self.access_token_ttl).int_err()?,
            ..JwtAuthenticationConfig::new(maybe_jwt_secret)
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        let defaults = WalletAuthConfig::default();

        Self {
            app_name: defaults.app_name,
            challenge_ttl: Duration::from_secs(DEFAULT_CHALLENGE_TTL_SECONDS.unsigned_abs()),
            allow_registration: defaults.allow_registration,
            admin_wallets: Vec::new(),
            registered_account_prefix: DEFAULT_REGISTERED_ACCOUNT_PREFIX.to_string(),
            jwt_secret: None,
            access_token_ttl: Duration::from_secs(DEFAULT_ACCESS_TOKEN_TTL_SECONDS.unsigned_abs()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MaintenanceConfig {
    /// Zero disables the periodic purge; expired challenges are still
    /// removed once at startup
    #[serde_as(as = "DurationSeconds<u64>")]
    pub challenge_cleanup_interval: Duration,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            challenge_cleanup_interval: Duration::from_secs(
                DEFAULT_CHALLENGE_CLEANUP_INTERVAL_SECONDS,
            ),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
