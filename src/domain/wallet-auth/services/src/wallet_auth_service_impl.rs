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
use random_strings::{AllowedSymbols, get_random_string};
use time_source::SystemTimeSource;
use wallet_auth::*;

use crate::owner_hint::with_owner_hint;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const ACCOUNT_NAME_SUFFIX_LENGTH: usize = 6;
const MAX_ACCOUNT_NAME_ATTEMPTS: usize = 5;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component(pub)]
#[dill::interface(dyn WalletAuthService)]
pub struct WalletAuthServiceImpl {
    challenge_repo: Arc<dyn NonceChallengeRepository>,
    binding_repo: Arc<dyn WalletBindingRepository>,
    account_repo: Arc<dyn AccountRepository>,
    signature_verifier: Arc<dyn SignatureVerifier>,
    authentication_service: Arc<dyn AuthenticationService>,
    time_source: Arc<dyn SystemTimeSource>,
    config: Arc<WalletAuthConfig>,
}

impl WalletAuthServiceImpl {
    /// Takes the session's challenge out of the store if it carries the
    /// presented nonce, then checks the rest of the proof against it. A taken
    /// challenge is gone afterwards whatever the outcome. A stale nonce leaves
    /// the live challenge in place.
    async fn consume_challenge(
        &self,
        session_id: &WalletSessionId,
        purpose: ChallengePurpose,
        account_id: Option<&AccountID>,
        proof: &WalletProof,
    ) -> Result<NonceChallenge, ProofError> {
        let Some(challenge) = self
            .challenge_repo
            .try_take_challenge(session_id, proof.nonce.trim())
            .await?
        else {
            let reason = if self
                .challenge_repo
                .try_get_challenge(session_id)
                .await?
                .is_some()
            {
                NonceInvalidReason::Mismatch
            } else {
                NonceInvalidReason::Missing
            };

            tracing::warn!(%session_id, %reason, "Challenge rejected");
            return Err(NonceInvalidError::new(reason).into());
        };

        let reason = if challenge.purpose != purpose {
            Some(NonceInvalidReason::WrongPurpose)
        } else if challenge.account_id.as_ref() != account_id {
            Some(NonceInvalidReason::WrongAccount)
        } else if challenge.is_expired(self.time_source.now()) {
            Some(NonceInvalidReason::Expired)
        } else if challenge.message != proof.message {
            Some(NonceInvalidReason::MessageMismatch)
        } else if challenge
            .address
            .as_ref()
            .is_some_and(|a| *a != proof.address)
        {
            Some(NonceInvalidReason::AddressNotChallenged)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                tracing::warn!(%session_id, %reason, "Challenge rejected");
                Err(NonceInvalidError::new(reason).into())
            }
            None => Ok(challenge),
        }
    }

    /// Server-side recovery, never trusting the client's own check
    fn verify_signer(&self, proof: &WalletProof) -> Result<(), ProofError> {
        let recovered = match self
            .signature_verifier
            .recover_address(&proof.message, &proof.signature)
        {
            Ok(recovered) => recovered,
            Err(RecoverAddressError::InvalidSignature(e)) => return Err(e.into()),
            Err(RecoverAddressError::Internal(e)) => return Err(e.into()),
        };

        if recovered != proof.address {
            return Err(AddressMismatchError {
                claimed: proof.address.clone(),
                recovered,
            }
            .into());
        }

        Ok(())
    }

    async fn existing_login(
        &self,
        binding: WalletBinding,
    ) -> Result<WalletLoginResult, InternalError> {
        let account = self
            .account_repo
            .get_account_by_id(&binding.account_id)
            .await
            .int_err()?;

        self.login_result(account, binding.address, false)
    }

    fn login_result(
        &self,
        account: Account,
        address: WalletAddress,
        newly_registered: bool,
    ) -> Result<WalletLoginResult, InternalError> {
        let access_token = self.authentication_service.make_access_token(&account.id)?;

        Ok(WalletLoginResult {
            account_id: account.id,
            account_name: account.account_name,
            address,
            newly_registered,
            access_token,
        })
    }

    async fn register_by_wallet(
        &self,
        address: &WalletAddress,
        proof: &WalletProof,
    ) -> Result<WalletLoginResult, InternalError> {
        let account = self.create_wallet_account(address).await?;

        let binding = WalletBinding {
            address: address.clone(),
            account_id: account.id.clone(),
            linked_at: account.registered_at,
            signature_proof: Some(proof.signature.clone()),
        };

        match self.binding_repo.save_binding(&binding).await {
            Ok(()) => {
                tracing::info!(
                    account_id = %account.id,
                    account_name = %account.account_name,
                    %address,
                    role = account.role.as_str(),
                    linked_at = %binding.linked_at,
                    "Account registered by wallet"
                );

                self.login_result(account, binding.address, true)
            }
            Err(SaveBindingError::AddressAlreadyBound(e)) => {
                // A concurrent login registered the same wallet first
                tracing::info!(
                    %address,
                    owner_account_id = %e.owner_account_id,
                    "Lost registration race, discarding fresh account"
                );

                self.account_repo
                    .delete_account(&account.id)
                    .await
                    .int_err()?;

                let binding = self
                    .binding_repo
                    .get_binding_by_address(address)
                    .await
                    .int_err()?;

                self.existing_login(binding).await
            }
            Err(SaveBindingError::Internal(e)) => Err(e),
        }
    }

    async fn create_wallet_account(&self, address: &WalletAddress) -> Result<Account, InternalError> {
        let base_name = format!(
            "{}{}",
            self.config.registered_account_prefix,
            address.short_hex()
        );

        let role = if self.config.is_admin_wallet(address) {
            AccountRole::Admin
        } else {
            AccountRole::User
        };

        for attempt in 0..MAX_ACCOUNT_NAME_ATTEMPTS {
            let candidate = AccountName::try_new(base_name.clone()).int_err()?;

            let name = if attempt == 0
                && self
                    .account_repo
                    .find_account_by_name(&candidate)
                    .await
                    .int_err()?
                    .is_none()
            {
                candidate
            } else {
                let suffix = get_random_string(
                    None,
                    ACCOUNT_NAME_SUFFIX_LENGTH,
                    &AllowedSymbols::AsciiLowercaseAlphanumeric,
                );
                AccountName::try_new(format!("{base_name}_{suffix}")).int_err()?
            };

            let account = Account {
                id: AccountID::new_generated(),
                display_name: name.to_string(),
                account_name: name,
                role,
                registered_at: self.time_source.now(),
            };

            match self.account_repo.create_account(&account).await {
                Ok(()) => return Ok(account),
                Err(CreateAccountError::Duplicate(e)) => {
                    tracing::debug!(attempt, error = %e, "Account name taken, retrying");
                }
                Err(CreateAccountError::Internal(e)) => return Err(e),
            }
        }

        InternalError::bail(format!(
            "Could not allocate an account name for wallet {address}"
        ))
    }
}

#[async_trait::async_trait]
impl WalletAuthService for WalletAuthServiceImpl {
    #[tracing::instrument(level = "debug", skip_all, fields(%session_id, address = %proof.address))]
    async fn verify_and_bind(
        &self,
        session_id: &WalletSessionId,
        account_id: Option<&AccountID>,
        proof: WalletProof,
    ) -> Result<WalletBinding, VerifyAndBindError> {
        let Some(account_id) = account_id else {
            return Err(UnauthorizedError.into());
        };

        self.consume_challenge(session_id, ChallengePurpose::Link, Some(account_id), &proof)
            .await?;
        self.verify_signer(&proof)?;

        let binding = WalletBinding {
            address: proof.address,
            account_id: account_id.clone(),
            linked_at: self.time_source.now(),
            signature_proof: Some(proof.signature),
        };

        match self.binding_repo.save_binding(&binding).await {
            Ok(()) => {
                tracing::info!(
                    account_id = %binding.account_id,
                    address = %binding.address,
                    linked_at = %binding.linked_at,
                    "Wallet bound to account"
                );
                Ok(binding)
            }
            Err(SaveBindingError::AddressAlreadyBound(e)) => {
                let e = with_owner_hint(self.account_repo.as_ref(), e).await?;
                tracing::warn!(error = %e, "Wallet binding rejected");
                Err(e.into())
            }
            Err(SaveBindingError::Internal(e)) => Err(e.into()),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%session_id, address = %proof.address))]
    async fn login_with_wallet(
        &self,
        session_id: &WalletSessionId,
        proof: WalletProof,
    ) -> Result<WalletLoginResult, LoginWithWalletError> {
        self.consume_challenge(session_id, ChallengePurpose::Login, None, &proof)
            .await?;
        self.verify_signer(&proof)?;

        let address = proof.address.clone();

        if let Some(binding) = self.binding_repo.find_binding_by_address(&address).await? {
            let result = self.existing_login(binding).await?;
            tracing::info!(account_id = %result.account_id, %address, "Logged in by wallet");
            return Ok(result);
        }

        if !self.config.allow_registration {
            return Err(WalletNotRegisteredError { address }.into());
        }

        Ok(self.register_by_wallet(&address, &proof).await?)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%session_id))]
    async fn discard_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<(), InternalError> {
        if self
            .challenge_repo
            .try_take_challenge(session_id, nonce.trim())
            .await?
            .is_some()
        {
            tracing::warn!(%session_id, "Challenge burned by a malformed proof");
        }

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%account_id))]
    async fn unbind(&self, account_id: &AccountID) -> Result<(), InternalError> {
        let removed = self
            .binding_repo
            .delete_binding_by_account(account_id)
            .await
            .int_err()?;

        if removed {
            tracing::info!(%account_id, "Wallet unbound from account");
        }

        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%account_id, %candidate))]
    async fn check_binding(
        &self,
        account_id: &AccountID,
        candidate: &WalletAddress,
    ) -> Result<BindingCheck, InternalError> {
        let bound_address = self
            .binding_repo
            .find_binding_by_account(account_id)
            .await?
            .map(|b| b.address);

        Ok(BindingCheck {
            is_linked: bound_address.as_ref() == Some(candidate),
            bound_address,
        })
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%address))]
    async fn lookup_account_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<AccountID>, InternalError> {
        let maybe_binding = self.binding_repo.find_binding_by_address(address).await?;
        Ok(maybe_binding.map(|b| b.account_id))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Failures shared by the link and login verification paths
#[derive(Debug)]
enum ProofError {
    NonceInvalid(NonceInvalidError),
    InvalidSignature(InvalidSignatureError),
    AddressMismatch(AddressMismatchError),
    Internal(InternalError),
}

impl From<NonceInvalidError> for ProofError {
    fn from(e: NonceInvalidError) -> Self {
        Self::NonceInvalid(e)
    }
}

impl From<InvalidSignatureError> for ProofError {
    fn from(e: InvalidSignatureError) -> Self {
        Self::InvalidSignature(e)
    }
}

impl From<AddressMismatchError> for ProofError {
    fn from(e: AddressMismatchError) -> Self {
        Self::AddressMismatch(e)
    }
}

impl From<InternalError> for ProofError {
    fn from(e: InternalError) -> Self {
        Self::Internal(e)
    }
}

impl From<ProofError> for VerifyAndBindError {
    fn from(e: ProofError) -> Self {
        match e {
            ProofError::NonceInvalid(e) => Self::NonceInvalid(e),
            ProofError::InvalidSignature(e) => Self::InvalidSignature(e),
            ProofError::AddressMismatch(e) => Self::AddressMismatch(e),
            ProofError::Internal(e) => Self::Internal(e),
        }
    }
}

impl From<ProofError> for LoginWithWalletError {
    fn from(e: ProofError) -> Self {
        match e {
            ProofError::NonceInvalid(e) => Self::NonceInvalid(e),
            ProofError::InvalidSignature(e) => Self::InvalidSignature(e),
            ProofError::AddressMismatch(e) => Self::AddressMismatch(e),
            ProofError::Internal(e) => Self::Internal(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
