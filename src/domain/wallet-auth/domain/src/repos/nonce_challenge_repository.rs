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

use crate::{NonceChallenge, WalletSessionId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Session-scoped store of pending challenges, keyed by session id
#[async_trait::async_trait]
pub trait NonceChallengeRepository: Send + Sync {
    /// Stores the challenge, replacing any pending one for the same session
    async fn save_challenge(&self, challenge: &NonceChallenge) -> Result<(), SaveChallengeError>;

    async fn get_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<NonceChallenge, GetChallengeError>;

    /// Atomically removes and returns the pending challenge, but only while
    /// it still carries `nonce`. A stale nonce leaves a newer challenge in
    /// place. Of several concurrent callers only one receives it.
    async fn take_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<NonceChallenge, GetChallengeError>;

    /// Returns whether a challenge was removed
    async fn delete_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<bool, DeleteChallengeError>;

    /// Returns the number of purged challenges
    async fn cleanup_expired_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredChallengesError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait NonceChallengeRepositoryExt: NonceChallengeRepository {
    async fn try_get_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<Option<NonceChallenge>, InternalError>;

    async fn try_take_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<Option<NonceChallenge>, InternalError>;
}

#[async_trait::async_trait]
impl<T> NonceChallengeRepositoryExt for T
where
    T: NonceChallengeRepository,
    T: ?Sized,
{
    async fn try_get_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<Option<NonceChallenge>, InternalError> {
        match self.get_challenge(session_id).await {
            Ok(challenge) => Ok(Some(challenge)),
            Err(GetChallengeError::NotFound(_)) => Ok(None),
            Err(GetChallengeError::Internal(e)) => Err(e),
        }
    }

    async fn try_take_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<Option<NonceChallenge>, InternalError> {
        match self.take_challenge(session_id, nonce).await {
            Ok(challenge) => Ok(Some(challenge)),
            Err(GetChallengeError::NotFound(_)) => Ok(None),
            Err(GetChallengeError::Internal(e)) => Err(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SaveChallengeError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SaveChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetChallengeError {
    #[error(transparent)]
    NotFound(ChallengeNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("No pending challenge for session: {session_id}")]
pub struct ChallengeNotFoundError {
    pub session_id: WalletSessionId,
}

impl PartialEq for GetChallengeError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DeleteChallengeError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CleanupExpiredChallengesError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
