// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// This type is used to simplify error handling in HTTP handler and unify
/// logging of API errors.
///
/// The typical usage pattern is:
///
/// ```
/// async fn handler() -> Result<(), ApiError> {
///     operation().await.api_err()?;
///     Ok(())
/// }
/// ````
///
/// We on purpose avoid [From] and [Into] traits for domain errors and use
/// [`IntoApiError`] or explicit matching instead, as the same domain error can
/// mean different things in different handlers:
///
/// ```
/// async fn handler() -> Result<(), ApiError> {
///     match operation().await {
///         Ok(_) => Ok(()),
///         Err(OperationError::NotFound(e)) => Err(ApiError::not_found(e)),
///         Err(e) => Err(e.api_err())
///     }
/// }
/// ```
///
/// Clients that need to react programmatically rely on the optional
/// machine-readable `code` and `details` rather than on the message text.
#[derive(Debug, Error)]
#[error("api error {status_code:?}")]
pub struct ApiError {
    pub status_code: http::StatusCode,
    pub code: Option<&'static str>,
    pub details: Option<serde_json::Value>,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl ApiError {
    pub fn new(
        source: impl std::error::Error + Send + Sync + 'static,
        status_code: http::StatusCode,
    ) -> Self {
        Self {
            status_code,
            code: None,
            details: None,
            source: source.into(),
        }
    }

    pub fn new_unauthorized() -> Self {
        Self {
            status_code: http::StatusCode::UNAUTHORIZED,
            code: None,
            details: None,
            source: "Unauthorized access".into(),
        }
    }

    pub fn new_unauthorized_from(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::FORBIDDEN)
    }

    pub fn bad_request(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::BAD_REQUEST)
    }

    pub fn conflict(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::new(source, http::StatusCode::CONFLICT)
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<InternalError> for ApiError {
    fn from(e: InternalError) -> Self {
        e.api_err()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        // TODO: Logging as a side effect of conversion is not great - we should move
        // this into a middleware
        if self.status_code == http::StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error = ?self.source,
                error_msg = %self.source,
                status_code = %self.status_code,
                "Internal API error",
            );
            (self.status_code, "").into_response()
        } else {
            tracing::warn!(
                error = ?self.source,
                error_msg = %self.source,
                error_code = self.code,
                status_code = %self.status_code,
                "API error",
            );

            let response_body = axum::response::Json(ApiErrorResponse {
                message: self.source.to_string(),
                code: self.code.map(ToString::to_string),
                details: self.details,
            });

            (self.status_code, response_body).into_response()
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Provides explicit conversion into [`ApiError`]
pub trait IntoApiError {
    fn api_err(self) -> ApiError;
}

/// Allows using `.api_err()` method on [Result] types
pub trait ResultIntoApiError<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError>;
}

impl<K, E> ResultIntoApiError<K, E> for Result<K, E>
where
    E: IntoApiError,
{
    fn api_err(self) -> Result<K, ApiError> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.api_err()),
        }
    }
}

impl IntoApiError for InternalError {
    fn api_err(self) -> ApiError {
        ApiError::new(self, http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
