// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Terminal error of a wallet flow. Every variant is user-displayable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("No wallet detected")]
    NoWalletDetected,

    #[error("Request rejected in the wallet")]
    UserRejected,

    #[error("Timed out while {step}")]
    Timeout { step: FlowStep },

    #[error("Cancelled")]
    Cancelled,

    #[error("A wallet request is already in progress")]
    AlreadyInProgress,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Nonce is invalid: {0}")]
    NonceInvalid(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Signature does not match the wallet address")]
    AddressMismatch,

    #[error("Wallet is already linked to another account")]
    AddressAlreadyBound { owner_hint: Option<String> },

    #[error("Wallet is not registered")]
    WalletNotRegistered,

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UserRejected | Self::Cancelled => ErrorClass::UserDeclined,
            Self::Timeout { .. }
            | Self::AlreadyInProgress
            | Self::Wallet(_)
            | Self::Network(_)
            | Self::Internal(_) => ErrorClass::Transient,
            Self::InvalidAddress(_)
            | Self::NonceInvalid(_)
            | Self::InvalidSignature(_)
            | Self::AddressMismatch => ErrorClass::ProtocolViolation,
            Self::AddressAlreadyBound { .. } => ErrorClass::Conflict,
            Self::Unauthorized | Self::WalletNotRegistered => ErrorClass::Denied,
            Self::NoWalletDetected => ErrorClass::MissingCapability,
        }
    }

    /// Whether the UI should offer to start over. Protocol violations are
    /// retryable because every attempt runs against a fresh challenge.
    pub fn is_retryable(&self) -> bool {
        match self.class() {
            ErrorClass::UserDeclined | ErrorClass::Transient | ErrorClass::ProtocolViolation => true,
            ErrorClass::Conflict | ErrorClass::Denied | ErrorClass::MissingCapability => false,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::NoWalletDetected => {
                "No wallet was found. Install a browser wallet and reload the page.".to_string()
            }
            Self::UserRejected => "The request was rejected in your wallet.".to_string(),
            Self::Timeout { step } => {
                format!("Timed out while {step}. Please try again.")
            }
            Self::Cancelled => "Wallet connection was cancelled.".to_string(),
            Self::AlreadyInProgress => {
                "A wallet request is already pending. Check your wallet.".to_string()
            }
            Self::Unauthorized => "Please log in before linking a wallet.".to_string(),
            Self::InvalidAddress(_) => "The wallet returned an invalid address.".to_string(),
            Self::NonceInvalid(_) => {
                "The sign-in request has expired or was already used. Please try again."
                    .to_string()
            }
            Self::InvalidSignature(_) | Self::AddressMismatch => {
                "The signature could not be verified. Please try again.".to_string()
            }
            Self::AddressAlreadyBound { owner_hint } => match owner_hint {
                Some(owner) => format!(
                    "This wallet is already linked to account '{owner}'. Unlink it there first."
                ),
                None => "This wallet is already linked to another account. Unlink it there first."
                    .to_string(),
            },
            Self::WalletNotRegistered => {
                "No account is registered for this wallet.".to_string()
            }
            Self::Wallet(_) => "The wallet reported an error. Please try again.".to_string(),
            Self::Network(_) | Self::Internal(_) => {
                "Could not reach the server. Please try again.".to_string()
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The user declined or aborted, no automatic retry
    UserDeclined,
    /// Safe to retry as is
    Transient,
    /// Terminal for the current nonce
    ProtocolViolation,
    /// Terminal for this address and account pair
    Conflict,
    Denied,
    /// Terminal until the environment changes
    MissingCapability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    DetectingWallet,
    RequestingAccounts,
    IssuingChallenge,
    Signing,
    Verifying,
}

impl std::fmt::Display for FlowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::DetectingWallet => "waiting for the wallet",
            Self::RequestingAccounts => "requesting wallet accounts",
            Self::IssuingChallenge => "requesting a challenge",
            Self::Signing => "waiting for the signature",
            Self::Verifying => "verifying the signature",
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
