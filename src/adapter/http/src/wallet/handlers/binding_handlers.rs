// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::Path;
use axum::{Extension, Json};
use dill::Catalog;
use http_common::{ApiError, ResultIntoApiError};
use wallet_auth::WalletAuthService;

use crate::wallet::api_errors::parse_address;
use crate::wallet::{
    AuthenticatedAccount,
    CheckBindingRequest,
    CheckBindingResponse,
    LookupAccountResponse,
    UnbindResponse,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Removes the caller's wallet binding. Succeeds when there is none.
#[utoipa::path(
    post,
    path = "/wallet/unbind",
    params(
        ("Authorization" = String, Header, description = "Bearer access token from the wallet login"),
    ),
    responses(
        (status = OK, body = UnbindResponse),
        (status = UNAUTHORIZED, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn unbind_handler(
    Extension(catalog): Extension<Catalog>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
) -> Result<Json<UnbindResponse>, ApiError> {
    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().unwrap();

    wallet_auth_service.unbind(&account_id).await.api_err()?;

    Ok(Json(UnbindResponse { success: true }))
}

/// Whether the given address is the one bound to the caller
#[utoipa::path(
    post,
    path = "/wallet/check",
    request_body = CheckBindingRequest,
    params(
        ("Authorization" = String, Header, description = "Bearer access token from the wallet login"),
    ),
    responses(
        (status = OK, body = CheckBindingResponse),
        (status = BAD_REQUEST, body = http_common::ApiErrorResponse),
        (status = UNAUTHORIZED, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn check_binding_handler(
    Extension(catalog): Extension<Catalog>,
    AuthenticatedAccount(account_id): AuthenticatedAccount,
    Json(request): Json<CheckBindingRequest>,
) -> Result<Json<CheckBindingResponse>, ApiError> {
    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().unwrap();

    let candidate = parse_address(&request.address)?;

    let check = wallet_auth_service
        .check_binding(&account_id, &candidate)
        .await
        .api_err()?;

    Ok(Json(CheckBindingResponse {
        is_linked: check.is_linked,
        bound_address: check.bound_address.map(|a| a.to_string()),
    }))
}

/// Resolves the account a wallet is bound to
#[utoipa::path(
    get,
    path = "/wallet/accounts/{address}",
    params(
        ("address" = String, Path, description = "Wallet address, any letter case"),
    ),
    responses(
        (status = OK, body = LookupAccountResponse),
        (status = BAD_REQUEST, body = http_common::ApiErrorResponse),
    ),
    tag = "wallet",
)]
pub async fn lookup_account_handler(
    Extension(catalog): Extension<Catalog>,
    Path(address): Path<String>,
) -> Result<Json<LookupAccountResponse>, ApiError> {
    let wallet_auth_service = catalog.get_one::<dyn WalletAuthService>().unwrap();

    let address = parse_address(&address)?;

    let maybe_account_id = wallet_auth_service
        .lookup_account_by_address(&address)
        .await
        .api_err()?;

    Ok(Json(LookupAccountResponse {
        account_id: maybe_account_id.map(|id| id.to_string()),
    }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
