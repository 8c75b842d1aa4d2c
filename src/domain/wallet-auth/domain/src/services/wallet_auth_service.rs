// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{
    AccountID,
    AccountName,
    AddressAlreadyBoundError,
    AddressMismatchError,
    InvalidSignatureError,
    NonceInvalidError,
    UnauthorizedError,
    WalletAddress,
    WalletBinding,
    WalletNotRegisteredError,
    WalletSessionId,
    WalletSignature,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Server side of the wallet flows. Every operation that mutates bindings
/// re-verifies the signature first.
#[async_trait::async_trait]
pub trait WalletAuthService: Send + Sync {
    /// Consumes the session's pending link challenge and, if the proof holds,
    /// binds the wallet to `account_id`
    async fn verify_and_bind(
        &self,
        session_id: &WalletSessionId,
        account_id: Option<&AccountID>,
        proof: WalletProof,
    ) -> Result<WalletBinding, VerifyAndBindError>;

    /// Consumes the session's pending login challenge and resolves the
    /// account owning the wallet, registering one when allowed
    async fn login_with_wallet(
        &self,
        session_id: &WalletSessionId,
        proof: WalletProof,
    ) -> Result<WalletLoginResult, LoginWithWalletError>;

    /// Burns the session's pending challenge when it carries `nonce`. For
    /// attempts whose proof could not even be parsed.
    async fn discard_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<(), InternalError>;

    /// Idempotent
    async fn unbind(&self, account_id: &AccountID) -> Result<(), InternalError>;

    async fn check_binding(
        &self,
        account_id: &AccountID,
        candidate: &WalletAddress,
    ) -> Result<BindingCheck, InternalError>;

    async fn lookup_account_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<AccountID>, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// What the client presents after the wallet signed the challenge message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletProof {
    pub address: WalletAddress,
    pub signature: WalletSignature,
    pub nonce: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLoginResult {
    pub account_id: AccountID,
    pub account_name: AccountName,
    pub address: WalletAddress,
    pub newly_registered: bool,
    /// Bearer token identifying the account on later requests
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingCheck {
    pub is_linked: bool,
    pub bound_address: Option<WalletAddress>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum VerifyAndBindError {
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    #[error(transparent)]
    NonceInvalid(#[from] NonceInvalidError),

    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignatureError),

    #[error(transparent)]
    AddressMismatch(#[from] AddressMismatchError),

    #[error(transparent)]
    AddressAlreadyBound(#[from] AddressAlreadyBoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum LoginWithWalletError {
    #[error(transparent)]
    NonceInvalid(#[from] NonceInvalidError),

    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignatureError),

    #[error(transparent)]
    AddressMismatch(#[from] AddressMismatchError),

    #[error(transparent)]
    WalletNotRegistered(#[from] WalletNotRegisteredError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
