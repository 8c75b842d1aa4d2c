// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::WalletAddress;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Authentication required")]
pub struct UnauthorizedError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// The presented nonce cannot be used. Terminal for the current challenge:
/// a fresh one must be requested.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Nonce is invalid: {reason}")]
pub struct NonceInvalidError {
    pub reason: NonceInvalidReason,
}

impl NonceInvalidError {
    pub fn new(reason: NonceInvalidReason) -> Self {
        Self { reason }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceInvalidReason {
    /// Never issued, already consumed, revoked or superseded
    Missing,
    Expired,
    Mismatch,
    WrongPurpose,
    WrongAccount,
    MessageMismatch,
    /// The challenge was issued for a different address
    AddressNotChallenged,
}

impl std::fmt::Display for NonceInvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Missing => "no pending challenge",
            Self::Expired => "challenge expired",
            Self::Mismatch => "nonce does not match the pending challenge",
            Self::WrongPurpose => "challenge was issued for a different flow",
            Self::WrongAccount => "challenge was issued for a different account",
            Self::MessageMismatch => "signed message does not match the challenge",
            Self::AddressNotChallenged => "challenge was issued for a different wallet",
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid signature: {reason}")]
pub struct InvalidSignatureError {
    pub reason: String,
}

impl InvalidSignatureError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Signature was produced by {recovered}, not by the claimed wallet {claimed}")]
pub struct AddressMismatchError {
    pub claimed: WalletAddress,
    pub recovered: WalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Wallet {address} is not registered")]
pub struct WalletNotRegisteredError {
    pub address: WalletAddress,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
