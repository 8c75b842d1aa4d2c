// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use internal_error::InternalError;
use thiserror::Error;

use crate::{
    AccountID,
    AddressAlreadyBoundError,
    ChallengeNonce,
    UnauthorizedError,
    WalletAddress,
    WalletSessionId,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait ChallengeIssuer: Send + Sync {
    /// Challenge for wallet-as-identity login. Any pending challenge of the
    /// session is replaced.
    async fn issue_login_challenge(
        &self,
        session_id: WalletSessionId,
        claimed_address: Option<WalletAddress>,
    ) -> Result<IssuedChallenge, IssueChallengeError>;

    /// Challenge for linking `address` to the authenticated account. Any
    /// pending challenge of the session is replaced.
    async fn issue_link_challenge(
        &self,
        session_id: WalletSessionId,
        account_id: Option<&AccountID>,
        address: WalletAddress,
    ) -> Result<IssuedChallenge, IssueChallengeError>;

    /// Idempotent
    async fn revoke_challenge(&self, session_id: &WalletSessionId) -> Result<(), InternalError>;

    /// Returns the number of purged challenges
    async fn cleanup_expired_challenges(&self) -> Result<usize, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedChallenge {
    pub session_id: WalletSessionId,
    pub nonce: ChallengeNonce,
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum IssueChallengeError {
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),

    #[error(transparent)]
    AddressAlreadyBound(AddressAlreadyBoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
