// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;
use wallet_auth::WalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Browser-wallet style provider (EIP-1193 `eth_accounts`,
/// `eth_requestAccounts`, `personal_sign`). Calls that prompt the user may
/// suspend for as long as the user takes to react.
#[async_trait::async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already exposed to the app, never prompts
    async fn get_accounts(&self) -> Result<Vec<String>, WalletProviderError>;

    /// May prompt the user to expose accounts
    async fn request_accounts(&self) -> Result<Vec<String>, WalletProviderError>;

    /// Prompts the user to sign `message` and returns the hex signature
    async fn sign_message(
        &self,
        address: &WalletAddress,
        message: &str,
    ) -> Result<String, WalletProviderError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletProviderError {
    #[error("User rejected the request")]
    UserRejected,

    #[error("Wallet error: {0}")]
    Other(String),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Change notifications emitted by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<String>),
    ChainChanged(String),
    Disconnected,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
