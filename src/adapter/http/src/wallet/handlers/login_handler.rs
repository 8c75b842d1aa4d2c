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

use crate::wallet::api_errors::{login_with_wallet_error, parse_proof_or_discard};
use crate::wallet::{LoginResponse, WalletProofRequest, WalletSession};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Signs in by wallet, registering a new account for an unknown wallet when
/// registration is enabled
#[utoipa::path(
    post,
    path = "/wallet/login",
    request_body = WalletProofRequest,
    params(
        ("x-wallet-session" = String, Header, description = "Client session id (UUID)"),
    ),
    responses(
        (status = OK, body = LoginResponse),
        (status = BAD_REQUEST, body = http_common::ApiErrorResponse),
        (status = FORBIDDEN, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn login_handler(
    Extension(catalog): Extension<Catalog>,
    WalletSession(session_id): WalletSession,
    Json(request): Json<WalletProofRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().unwrap();

    let proof =
        parse_proof_or_discard(wallet_auth_service.as_ref(), &session_id, request).await?;

    let result = wallet_auth_service
        .login_with_wallet(&session_id, proof)
        .await
        .map_err(login_with_wallet_error)?;

    Ok(Json(LoginResponse {
        account_id: result.account_id.to_string(),
        account_name: result.account_name.to_string(),
        address: result.address.to_string(),
        newly_registered: result.newly_registered,
        access_token: result.access_token,
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
