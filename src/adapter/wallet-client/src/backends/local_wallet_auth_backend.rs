// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use wallet_auth::*;

use crate::{ChallengeTicket, FlowContext, FlowError, FlowIntent, FlowSuccess, WalletAuthBackend};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Runs flows against in-process services
#[dill::component(pub)]
#[dill::interface(dyn WalletAuthBackend)]
pub struct LocalWalletAuthBackend {
    authentication_service: Arc<dyn AuthenticationService>,
    challenge_issuer: Arc<dyn ChallengeIssuer>,
    wallet_auth_service: Arc<dyn WalletAuthService>,
}

impl LocalWalletAuthBackend {
    /// Resolves the caller the same way the server does, by its access token
    fn authenticated_account(
        &self,
        context: &FlowContext,
    ) -> Result<Option<AccountID>, FlowError> {
        let Some(access_token) = context.access_token() else {
            return Ok(None);
        };

        match self.authentication_service.account_id_by_token(access_token) {
            Ok(account_id) => Ok(Some(account_id)),
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                Err(FlowError::Unauthorized)
            }
        }
    }
}

#[async_trait::async_trait]
impl WalletAuthBackend for LocalWalletAuthBackend {
    async fn issue_challenge(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        address: &WalletAddress,
    ) -> Result<ChallengeTicket, FlowError> {
        let res = match intent {
            FlowIntent::Login => {
                self.challenge_issuer
                    .issue_login_challenge(context.session_id, Some(address.clone()))
                    .await
            }
            FlowIntent::Link => {
                let maybe_account_id = self.authenticated_account(context)?;

                self.challenge_issuer
                    .issue_link_challenge(
                        context.session_id,
                        maybe_account_id.as_ref(),
                        address.clone(),
                    )
                    .await
            }
        };

        match res {
            Ok(issued) => Ok(ChallengeTicket {
                nonce: issued.nonce.to_string(),
                message: issued.message,
            }),
            Err(IssueChallengeError::Unauthorized(_)) => Err(FlowError::Unauthorized),
            Err(IssueChallengeError::AddressAlreadyBound(e)) => {
                Err(FlowError::AddressAlreadyBound {
                    owner_hint: e.owner_hint,
                })
            }
            Err(IssueChallengeError::Internal(e)) => Err(FlowError::Internal(e.to_string())),
        }
    }

    async fn revoke_challenge(&self, context: &FlowContext) -> Result<(), FlowError> {
        self.challenge_issuer
            .revoke_challenge(&context.session_id)
            .await
            .map_err(|e| FlowError::Internal(e.to_string()))
    }

    async fn verify(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        proof: WalletProof,
    ) -> Result<FlowSuccess, FlowError> {
        match intent {
            FlowIntent::Link => {
                let maybe_account_id = self.authenticated_account(context)?;

                match self
                    .wallet_auth_service
                    .verify_and_bind(&context.session_id, maybe_account_id.as_ref(), proof)
                    .await
                {
                    Ok(binding) => Ok(FlowSuccess::Linked {
                        address: binding.address,
                    }),
                    Err(VerifyAndBindError::Unauthorized(_)) => Err(FlowError::Unauthorized),
                    Err(VerifyAndBindError::NonceInvalid(e)) => {
                        Err(FlowError::NonceInvalid(e.reason.to_string()))
                    }
                    Err(VerifyAndBindError::InvalidSignature(e)) => {
                        Err(FlowError::InvalidSignature(e.reason))
                    }
                    Err(VerifyAndBindError::AddressMismatch(_)) => Err(FlowError::AddressMismatch),
                    Err(VerifyAndBindError::AddressAlreadyBound(e)) => {
                        Err(FlowError::AddressAlreadyBound {
                            owner_hint: e.owner_hint,
                        })
                    }
                    Err(VerifyAndBindError::Internal(e)) => Err(FlowError::Internal(e.to_string())),
                }
            }
            FlowIntent::Login => {
                match self
                    .wallet_auth_service
                    .login_with_wallet(&context.session_id, proof)
                    .await
                {
                    Ok(result) => Ok(FlowSuccess::LoggedIn {
                        account_id: result.account_id,
                        account_name: result.account_name,
                        address: result.address,
                        newly_registered: result.newly_registered,
                        access_token: result.access_token,
                    }),
                    Err(LoginWithWalletError::NonceInvalid(e)) => {
                        Err(FlowError::NonceInvalid(e.reason.to_string()))
                    }
                    Err(LoginWithWalletError::InvalidSignature(e)) => {
                        Err(FlowError::InvalidSignature(e.reason))
                    }
                    Err(LoginWithWalletError::AddressMismatch(_)) => {
                        Err(FlowError::AddressMismatch)
                    }
                    Err(LoginWithWalletError::WalletNotRegistered(_)) => {
                        Err(FlowError::WalletNotRegistered)
                    }
                    Err(LoginWithWalletError::Internal(e)) => {
                        Err(FlowError::Internal(e.to_string()))
                    }
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
