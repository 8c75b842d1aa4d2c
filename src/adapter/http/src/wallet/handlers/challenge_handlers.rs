// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::Extension;
use axum::Json;
use dill::Catalog;
use http::StatusCode;
use http_common::{ApiError, ResultIntoApiError};
use wallet_auth::{ChallengeIssuer, ChallengePurpose};

use crate::wallet::api_errors::{AddressRequiredError, issue_challenge_error, parse_address};
use crate::wallet::{
    ChallengeRequest,
    ChallengeResponse,
    OptionalAccount,
    WalletSession,
    error_codes,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Issues a fresh challenge for the session, replacing any pending one
#[utoipa::path(
    post,
    path = "/wallet/challenge",
    request_body = ChallengeRequest,
    params(
        ("x-wallet-session" = String, Header, description = "Client session id (UUID)"),
        ("Authorization" = Option<String>, Header, description = "Bearer access token, required for linking"),
    ),
    responses(
        (status = OK, body = ChallengeResponse),
        (status = BAD_REQUEST, body = http_common::ApiErrorResponse),
        (status = UNAUTHORIZED, body = http_common::ApiErrorResponse),
        (status = CONFLICT, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn issue_challenge_handler(
    Extension(catalog): Extension<Catalog>,
    WalletSession(session_id): WalletSession,
    OptionalAccount(maybe_account_id): OptionalAccount,
    Json(request): Json<ChallengeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge_issuer = catalog.get_one::<dyn ChallengeIssuer>().unwrap();

    let claimed_address = request
        .address
        .as_deref()
        .map(parse_address)
        .transpose()?;

    let issued = match request.purpose {
        ChallengePurpose::Login => {
            challenge_issuer
                .issue_login_challenge(session_id, claimed_address)
                .await
        }
        ChallengePurpose::Link => {
            let Some(address) = claimed_address else {
                return Err(ApiError::bad_request(AddressRequiredError)
                    .with_code(error_codes::INVALID_ADDRESS));
            };

            challenge_issuer
                .issue_link_challenge(session_id, maybe_account_id.as_ref(), address)
                .await
        }
    }
    .map_err(issue_challenge_error)?;

    Ok(Json(ChallengeResponse {
        nonce: issued.nonce.to_string(),
        message: issued.message,
        expires_at: issued.expires_at,
    }))
}

/// Drops the session's pending challenge, if any
#[utoipa::path(
    delete,
    path = "/wallet/challenge",
    params(
        ("x-wallet-session" = String, Header, description = "Client session id (UUID)"),
    ),
    responses(
        (status = NO_CONTENT),
    ),
    tag = "wallet",
)]
pub async fn revoke_challenge_handler(
    Extension(catalog): Extension<Catalog>,
    WalletSession(session_id): WalletSession,
) -> Result<StatusCode, ApiError> {
    let challenge_issuer = catalog.get_one::<dyn ChallengeIssuer>().unwrap();

    challenge_issuer
        .revoke_challenge(&session_id)
        .await
        .api_err()?;

    Ok(StatusCode::NO_CONTENT)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
