// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Duration;
use random_strings::{AllowedSymbols, get_random_string};

use crate::WalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_CHALLENGE_TTL_SECONDS: i64 = 5 * 60;
pub const DEFAULT_REGISTERED_ACCOUNT_PREFIX: &str = "wallet_";
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

const GENERATED_JWT_SECRET_LENGTH: usize = 64;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct WalletAuthConfig {
    /// Site/application identifier embedded into every challenge message
    pub app_name: String,
    pub challenge_ttl: Duration,
    /// Whether an unknown wallet may create an account by signing in
    pub allow_registration: bool,
    /// Wallets that receive the admin role when they register
    pub admin_wallets: Vec<WalletAddress>,
    pub registered_account_prefix: String,
}

impl WalletAuthConfig {
    pub fn is_admin_wallet(&self, address: &WalletAddress) -> bool {
        self.admin_wallets.contains(address)
    }
}

impl Default for WalletAuthConfig {
    fn default() -> Self {
        Self {
            app_name: "Wallet Auth".to_string(),
            challenge_ttl: Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS),
            allow_registration: true,
            admin_wallets: Vec::new(),
            registered_account_prefix: DEFAULT_REGISTERED_ACCOUNT_PREFIX.to_string(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Key material for the access tokens handed out on wallet login
#[derive(Debug, Clone)]
pub struct JwtAuthenticationConfig {
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
}

impl JwtAuthenticationConfig {
    /// Without a configured secret a random one is generated, so tokens do
    /// not outlive the process
    pub fn new(maybe_jwt_secret: Option<String>) -> Self {
        Self {
            jwt_secret: maybe_jwt_secret.unwrap_or_else(|| {
                get_random_string(
                    None,
                    GENERATED_JWT_SECRET_LENGTH,
                    &AllowedSymbols::Alphanumeric,
                )
            }),
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECONDS),
        }
    }
}

impl Default for JwtAuthenticationConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
