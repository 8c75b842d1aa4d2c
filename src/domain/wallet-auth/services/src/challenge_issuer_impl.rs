// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::{InternalError, ResultIntoInternal};
use time_source::SystemTimeSource;
use wallet_auth::*;

use crate::owner_hint::with_owner_hint;
use crate::{link_challenge_message, login_challenge_message};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component(pub)]
#[dill::interface(dyn ChallengeIssuer)]
pub struct ChallengeIssuerImpl {
    challenge_repo: Arc<dyn NonceChallengeRepository>,
    binding_repo: Arc<dyn WalletBindingRepository>,
    account_repo: Arc<dyn AccountRepository>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<WalletAuthConfig>,
}

impl ChallengeIssuerImpl {
    async fn store(
        &self,
        session_id: WalletSessionId,
        purpose: ChallengePurpose,
        account_id: Option<AccountID>,
        address: Option<WalletAddress>,
        make_message: impl FnOnce(&ChallengeNonce, chrono::DateTime<chrono::Utc>) -> String,
    ) -> Result<IssuedChallenge, InternalError> {
        let nonce = ChallengeNonce::new_random();
        let issued_at = self.time_source.now();
        let message = make_message(&nonce, issued_at);

        let challenge = NonceChallenge {
            session_id,
            nonce,
            purpose,
            account_id,
            address,
            message,
            issued_at,
            expires_at: issued_at + self.config.challenge_ttl,
        };

        // Must be persisted before the message is handed out
        self.challenge_repo.save_challenge(&challenge).await.int_err()?;

        tracing::debug!(
            %session_id,
            purpose = purpose.as_str(),
            expires_at = %challenge.expires_at,
            "Challenge issued"
        );

        Ok(IssuedChallenge {
            session_id,
            nonce: challenge.nonce,
            message: challenge.message,
            expires_at: challenge.expires_at,
        })
    }
}

#[async_trait::async_trait]
impl ChallengeIssuer for ChallengeIssuerImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(%session_id))]
    async fn issue_login_challenge(
        &self,
        session_id: WalletSessionId,
        claimed_address: Option<WalletAddress>,
    ) -> Result<IssuedChallenge, IssueChallengeError> {
        let app_name = &self.config.app_name;

        let issued = self
            .store(
                session_id,
                ChallengePurpose::Login,
                None,
                claimed_address.clone(),
                |nonce, issued_at| {
                    login_challenge_message(app_name, nonce, issued_at, claimed_address.as_ref())
                },
            )
            .await?;

        Ok(issued)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%session_id, %address))]
    async fn issue_link_challenge(
        &self,
        session_id: WalletSessionId,
        account_id: Option<&AccountID>,
        address: WalletAddress,
    ) -> Result<IssuedChallenge, IssueChallengeError> {
        let Some(account_id) = account_id else {
            return Err(UnauthorizedError.into());
        };

        let account = match self.account_repo.get_account_by_id(account_id).await {
            Ok(account) => account,
            Err(GetAccountByIdError::NotFound(_)) => return Err(UnauthorizedError.into()),
            Err(GetAccountByIdError::Internal(e)) => return Err(e.into()),
        };

        // Fail early, the binding step re-checks atomically
        let maybe_existing = self.binding_repo.find_binding_by_address(&address).await?;
        if let Some(existing) = maybe_existing.filter(|b| b.account_id != account.id) {
            let err = AddressAlreadyBoundError {
                address,
                owner_account_id: existing.account_id,
                owner_hint: None,
            };
            let err = with_owner_hint(self.account_repo.as_ref(), err).await?;
            return Err(IssueChallengeError::AddressAlreadyBound(err));
        }

        let app_name = &self.config.app_name;
        let account_name = &account.account_name;

        let issued = self
            .store(
                session_id,
                ChallengePurpose::Link,
                Some(account.id.clone()),
                Some(address.clone()),
                |nonce, issued_at| {
                    link_challenge_message(app_name, &address, account_name, nonce, issued_at)
                },
            )
            .await?;

        Ok(issued)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%session_id))]
    async fn revoke_challenge(&self, session_id: &WalletSessionId) -> Result<(), InternalError> {
        let removed = self
            .challenge_repo
            .delete_challenge(session_id)
            .await
            .int_err()?;

        tracing::debug!(removed, "Challenge revoked");

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    async fn cleanup_expired_challenges(&self) -> Result<usize, InternalError> {
        let now = self.time_source.now();

        let purged = self
            .challenge_repo
            .cleanup_expired_challenges(now)
            .await
            .int_err()?;

        if purged > 0 {
            tracing::info!(purged, "Expired challenges purged");
        }

        Ok(purged)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
