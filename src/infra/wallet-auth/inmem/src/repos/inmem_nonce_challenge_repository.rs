// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    challenge_by_session: HashMap<WalletSessionId, NonceChallenge>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryNonceChallengeRepository {
    state: Arc<RwLock<State>>,
}

#[dill::component(pub)]
#[dill::interface(dyn NonceChallengeRepository)]
#[dill::scope(dill::Singleton)]
impl InMemoryNonceChallengeRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NonceChallengeRepository for InMemoryNonceChallengeRepository {
    async fn save_challenge(&self, challenge: &NonceChallenge) -> Result<(), SaveChallengeError> {
        let mut writable_state = self.state.write().await;

        writable_state
            .challenge_by_session
            .insert(challenge.session_id, challenge.clone());

        Ok(())
    }

    async fn get_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<NonceChallenge, GetChallengeError> {
        let readable_state = self.state.read().await;

        readable_state
            .challenge_by_session
            .get(session_id)
            .cloned()
            .ok_or_else(|| {
                GetChallengeError::NotFound(ChallengeNotFoundError {
                    session_id: *session_id,
                })
            })
    }

    async fn take_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<NonceChallenge, GetChallengeError> {
        let mut writable_state = self.state.write().await;

        let nonce_matches = writable_state
            .challenge_by_session
            .get(session_id)
            .is_some_and(|challenge| challenge.nonce.as_ref() == nonce);

        nonce_matches
            .then(|| writable_state.challenge_by_session.remove(session_id))
            .flatten()
            .ok_or_else(|| {
                GetChallengeError::NotFound(ChallengeNotFoundError {
                    session_id: *session_id,
                })
            })
    }

    async fn delete_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<bool, DeleteChallengeError> {
        let mut writable_state = self.state.write().await;

        Ok(writable_state
            .challenge_by_session
            .remove(session_id)
            .is_some())
    }

    async fn cleanup_expired_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredChallengesError> {
        let mut writable_state = self.state.write().await;

        let before = writable_state.challenge_by_session.len();
        writable_state
            .challenge_by_session
            .retain(|_, challenge| !challenge.is_expired(now));

        Ok(before - writable_state.challenge_by_session.len())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
