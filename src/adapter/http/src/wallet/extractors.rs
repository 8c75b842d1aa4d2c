// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use axum::extract::FromRequestParts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use dill::Catalog;
use http::request::Parts;
use http_common::{ApiError, IntoApiError};
use internal_error::InternalError;
use thiserror::Error;
use wallet_auth::{AccountID, AuthenticationService, WalletSessionId};

use crate::wallet::{WALLET_SESSION_HEADER, error_codes};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Session the request's challenge is scoped to
pub struct WalletSession(pub WalletSessionId);

impl<S> FromRequestParts<S> for WalletSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(WALLET_SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<uuid::Uuid>().ok())
            .map(|uuid| Self(WalletSessionId::new(uuid)))
            .ok_or_else(|| {
                ApiError::bad_request(MissingSessionError).with_code(error_codes::MISSING_SESSION)
            })
    }
}

#[derive(Error, Debug)]
#[error("Missing or malformed x-wallet-session header")]
pub struct MissingSessionError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Identity of the caller if any, taken from the `Authorization: Bearer`
/// access token. No header means anonymous. A token that is present but
/// malformed, forged or expired is rejected with 401.
pub struct OptionalAccount(pub Option<AccountID>);

impl<S> FromRequestParts<S> for OptionalAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let maybe_bearer = parts
            .headers
            .typed_try_get::<Authorization<Bearer>>()
            .map_err(ApiError::new_unauthorized_from)?;

        let Some(bearer) = maybe_bearer else {
            return Ok(Self(None));
        };

        let Some(catalog) = parts.extensions.get::<Catalog>() else {
            return Err(InternalError::new(MissingCatalogError).api_err());
        };
        let authentication_service = catalog.get_one::<dyn AuthenticationService>().unwrap();

        match authentication_service.account_id_by_token(bearer.token()) {
            Ok(account_id) => Ok(Self(Some(account_id))),
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                Err(ApiError::new_unauthorized_from(e))
            }
        }
    }
}

#[derive(Error, Debug)]
#[error("Catalog extension is not configured")]
struct MissingCatalogError;

/// Rejects anonymous callers with 401
pub struct AuthenticatedAccount(pub AccountID);

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match OptionalAccount::from_request_parts(parts, state).await? {
            OptionalAccount(Some(account_id)) => Ok(Self(account_id)),
            OptionalAccount(None) => Err(ApiError::new_unauthorized()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
