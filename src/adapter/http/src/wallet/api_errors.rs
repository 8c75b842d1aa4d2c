// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use http_common::{ApiError, IntoApiError, ResultIntoApiError};
use thiserror::Error;
use wallet_auth::*;

use crate::wallet::{AddressAlreadyBoundDetails, WalletProofRequest, error_codes};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
#[error("Invalid wallet address: '{value}'")]
pub struct InvalidAddressError {
    pub value: String,
}

#[derive(Error, Debug)]
#[error("Wallet address is required for linking")]
pub struct AddressRequiredError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn parse_address(value: &str) -> Result<WalletAddress, ApiError> {
    WalletAddress::try_new(value).map_err(|_| {
        ApiError::bad_request(InvalidAddressError {
            value: value.to_string(),
        })
        .with_code(error_codes::INVALID_ADDRESS)
    })
}

fn parse_proof(request: WalletProofRequest) -> Result<WalletProof, ApiError> {
    let address = parse_address(&request.address)?;

    let signature = request.signature.parse::<WalletSignature>().map_err(|e| {
        ApiError::bad_request(InvalidSignatureError::new(e.to_string()))
            .with_code(error_codes::INVALID_SIGNATURE)
    })?;

    Ok(WalletProof {
        address,
        signature,
        nonce: request.nonce,
        message: request.message,
    })
}

/// A proof that fails to parse still spends the session's challenge
pub(crate) async fn parse_proof_or_discard(
    wallet_auth_service: &dyn WalletAuthService,
    session_id: &WalletSessionId,
    request: WalletProofRequest,
) -> Result<WalletProof, ApiError> {
    let nonce = request.nonce.clone();

    match parse_proof(request) {
        Ok(proof) => Ok(proof),
        Err(e) => {
            wallet_auth_service
                .discard_challenge(session_id, &nonce)
                .await
                .api_err()?;
            Err(e)
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn address_already_bound(e: AddressAlreadyBoundError) -> ApiError {
    let details = AddressAlreadyBoundDetails {
        owner_hint: e.owner_hint.clone(),
    };

    ApiError::conflict(e)
        .with_code(error_codes::ADDRESS_ALREADY_BOUND)
        .with_details(serde_json::to_value(details).unwrap_or_default())
}

pub(crate) fn issue_challenge_error(e: IssueChallengeError) -> ApiError {
    match e {
        IssueChallengeError::Unauthorized(e) => ApiError::new_unauthorized_from(e),
        IssueChallengeError::AddressAlreadyBound(e) => address_already_bound(e),
        IssueChallengeError::Internal(e) => e.api_err(),
    }
}

pub(crate) fn verify_and_bind_error(e: VerifyAndBindError) -> ApiError {
    match e {
        VerifyAndBindError::Unauthorized(e) => ApiError::new_unauthorized_from(e),
        VerifyAndBindError::NonceInvalid(e) => {
            ApiError::bad_request(e).with_code(error_codes::NONCE_INVALID)
        }
        VerifyAndBindError::InvalidSignature(e) => {
            ApiError::bad_request(e).with_code(error_codes::INVALID_SIGNATURE)
        }
        VerifyAndBindError::AddressMismatch(e) => {
            ApiError::forbidden(e).with_code(error_codes::ADDRESS_MISMATCH)
        }
        VerifyAndBindError::AddressAlreadyBound(e) => address_already_bound(e),
        VerifyAndBindError::Internal(e) => e.api_err(),
    }
}

pub(crate) fn login_with_wallet_error(e: LoginWithWalletError) -> ApiError {
    match e {
        LoginWithWalletError::NonceInvalid(e) => {
            ApiError::bad_request(e).with_code(error_codes::NONCE_INVALID)
        }
        LoginWithWalletError::InvalidSignature(e) => {
            ApiError::bad_request(e).with_code(error_codes::INVALID_SIGNATURE)
        }
        LoginWithWalletError::AddressMismatch(e) => {
            ApiError::forbidden(e).with_code(error_codes::ADDRESS_MISMATCH)
        }
        LoginWithWalletError::WalletNotRegistered(e) => {
            ApiError::forbidden(e).with_code(error_codes::WALLET_NOT_REGISTERED)
        }
        LoginWithWalletError::Internal(e) => e.api_err(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
