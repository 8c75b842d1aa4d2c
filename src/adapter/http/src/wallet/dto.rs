// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wallet_auth::ChallengePurpose;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Header carrying the client session a challenge belongs to (UUID)
pub const WALLET_SESSION_HEADER: &str = "x-wallet-session";

/// Machine-readable error codes returned in [`http_common::ApiErrorResponse`]
pub mod error_codes {
    pub const NONCE_INVALID: &str = "NONCE_INVALID";
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const INVALID_ADDRESS: &str = "INVALID_ADDRESS";
    pub const MISSING_SESSION: &str = "MISSING_SESSION";
    pub const ADDRESS_MISMATCH: &str = "ADDRESS_MISMATCH";
    pub const ADDRESS_ALREADY_BOUND: &str = "ADDRESS_ALREADY_BOUND";
    pub const WALLET_NOT_REGISTERED: &str = "WALLET_NOT_REGISTERED";
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[schema(value_type = String, example = "link")]
    pub purpose: ChallengePurpose,
    /// Required for `link`, optional for `login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub nonce: String,
    /// Exact text the wallet has to sign
    pub message: String,
    #[schema(value_type = String)]
    pub expires_at: DateTime<Utc>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Signed challenge, as presented by the client
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletProofRequest {
    pub address: String,
    /// Hex encoded 65-byte signature, `0x` prefix optional
    pub signature: String,
    pub nonce: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub bound_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub account_id: String,
    pub account_name: String,
    pub address: String,
    pub newly_registered: bool,
    /// Bearer token for the authenticated wallet endpoints
    pub access_token: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnbindResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckBindingRequest {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckBindingResponse {
    pub is_linked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupAccountResponse {
    pub account_id: Option<String>,
}

/// `details` of an `ADDRESS_ALREADY_BOUND` error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressAlreadyBoundDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_hint: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
