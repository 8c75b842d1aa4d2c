// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http_common::ApiErrorResponse;
use internal_error::{InternalError, ResultIntoInternal};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wallet_auth::{AccountID, AccountName, ChallengePurpose, WalletAddress, WalletProof};
use wallet_auth_adapter_http::wallet::{
    AddressAlreadyBoundDetails,
    ChallengeRequest,
    ChallengeResponse,
    LoginResponse,
    VerifyResponse,
    WALLET_SESSION_HEADER,
    WalletProofRequest,
    error_codes,
};

use crate::{ChallengeTicket, FlowContext, FlowError, FlowIntent, FlowSuccess, WalletAuthBackend};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Runs flows against a remote wallet auth server
pub struct HttpWalletAuthBackend {
    client: reqwest::Client,
    base_url: url::Url,
}

impl HttpWalletAuthBackend {
    pub fn new(base_url: url::Url) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, mut base_url: url::Url) -> Self {
        // Keep the last path segment when joining endpoint paths
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self { client, base_url }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        context: &FlowContext,
    ) -> Result<reqwest::RequestBuilder, FlowError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| FlowError::Internal(e.to_string()))?;

        let mut request = self
            .client
            .request(method, url)
            .header(WALLET_SESSION_HEADER, context.session_id.to_string());

        if let Some(access_token) = context.access_token() {
            request = request.bearer_auth(access_token);
        }

        Ok(request)
    }

    async fn post<Req, Resp>(
        &self,
        path: &str,
        context: &FlowContext,
        body: &Req,
    ) -> Result<Resp, FlowError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .request(reqwest::Method::POST, path, context)?
            .json(body)
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))
    }

    async fn error_from_response(response: reqwest::Response) -> FlowError {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();

        let Ok(error) = serde_json::from_slice::<ApiErrorResponse>(&body) else {
            return if status == reqwest::StatusCode::UNAUTHORIZED {
                FlowError::Unauthorized
            } else {
                FlowError::Network(format!("Server responded with {status}"))
            };
        };

        tracing::debug!(%status, ?error, "Wallet auth request failed");

        match error.code.as_deref() {
            Some(error_codes::NONCE_INVALID) => FlowError::NonceInvalid(error.message),
            Some(error_codes::INVALID_SIGNATURE) => FlowError::InvalidSignature(error.message),
            Some(error_codes::INVALID_ADDRESS) => FlowError::InvalidAddress(error.message),
            Some(error_codes::ADDRESS_MISMATCH) => FlowError::AddressMismatch,
            Some(error_codes::WALLET_NOT_REGISTERED) => FlowError::WalletNotRegistered,
            Some(error_codes::ADDRESS_ALREADY_BOUND) => {
                let owner_hint = error
                    .details
                    .and_then(|d| serde_json::from_value::<AddressAlreadyBoundDetails>(d).ok())
                    .and_then(|d| d.owner_hint);
                FlowError::AddressAlreadyBound { owner_hint }
            }
            _ if status == reqwest::StatusCode::UNAUTHORIZED => FlowError::Unauthorized,
            _ => FlowError::Network(format!("Server responded with {status}: {}", error.message)),
        }
    }

    fn parse_login_response(response: LoginResponse) -> Result<FlowSuccess, InternalError> {
        Ok(FlowSuccess::LoggedIn {
            account_id: AccountID::try_new(response.account_id).int_err()?,
            account_name: AccountName::try_new(response.account_name).int_err()?,
            address: WalletAddress::try_new(response.address).int_err()?,
            newly_registered: response.newly_registered,
            access_token: response.access_token,
        })
    }
}

#[async_trait::async_trait]
impl WalletAuthBackend for HttpWalletAuthBackend {
    async fn issue_challenge(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        address: &WalletAddress,
    ) -> Result<ChallengeTicket, FlowError> {
        let purpose = match intent {
            FlowIntent::Login => ChallengePurpose::Login,
            FlowIntent::Link => ChallengePurpose::Link,
        };

        let response: ChallengeResponse = self
            .post(
                "wallet/challenge",
                context,
                &ChallengeRequest {
                    purpose,
                    address: Some(address.to_string()),
                },
            )
            .await?;

        Ok(ChallengeTicket {
            nonce: response.nonce,
            message: response.message,
        })
    }

    async fn revoke_challenge(&self, context: &FlowContext) -> Result<(), FlowError> {
        let response = self
            .request(reqwest::Method::DELETE, "wallet/challenge", context)?
            .send()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(())
    }

    async fn verify(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        proof: WalletProof,
    ) -> Result<FlowSuccess, FlowError> {
        let request = WalletProofRequest {
            address: proof.address.to_string(),
            signature: proof.signature.to_string(),
            nonce: proof.nonce,
            message: proof.message,
        };

        match intent {
            FlowIntent::Link => {
                let response: VerifyResponse = self.post("wallet/verify", context, &request).await?;

                let address = WalletAddress::try_new(response.bound_address)
                    .map_err(|e| FlowError::InvalidAddress(e.to_string()))?;

                Ok(FlowSuccess::Linked { address })
            }
            FlowIntent::Login => {
                let response: LoginResponse = self.post("wallet/login", context, &request).await?;

                Self::parse_login_response(response).map_err(|e| FlowError::Internal(e.to_string()))
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
