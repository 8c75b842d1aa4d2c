// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::{Extension, Json};
use dill::Catalog;
use http_common::ApiError;
use wallet_auth::WalletAuthService;

use crate::wallet::api_errors::{parse_proof_or_discard, verify_and_bind_error};
use crate::wallet::{AuthenticatedAccount, VerifyResponse, WalletProofRequest, WalletSession};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Verifies the signed link challenge and binds the wallet to the caller
#[utoipa::path(
    post,
    path = "/wallet/verify",
    request_body = WalletProofRequest,
    params(
        ("x-wallet-session" = String, Header, description = "Client session id (UUID)"),
        ("Authorization" = String, Header, description = "Bearer access token from the wallet login"),
    ),
    responses(
        (status = OK, body = VerifyResponse),
        (status = BAD_REQUEST, body = http_common::ApiErrorResponse),
        (status = UNAUTHORIZED, body = http_common::ApiErrorResponse),
        (status = FORBIDDEN, body = http_common::ApiErrorResponse),
        (status = CONFLICT, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn verify_handler(
    Extension(catalog): Extension<Catalog>,
    WalletSession(session_id): WalletSession,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Json(request): Json<WalletProofRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().unwrap();

    let proof =
        parse_proof_or_discard(wallet_auth_service.as_ref(), &session_id, request).await?;

    let binding = wallet_auth_service
        .verify_and_bind(&session_id, Some(&account_id), proof)
        .await
        .map_err(verify_and_bind_error)?;

    Ok(Json(VerifyResponse {
        bound_address: binding.address.to_string(),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
