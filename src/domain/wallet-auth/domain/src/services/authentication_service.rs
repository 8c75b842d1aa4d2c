// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use internal_error::{BoxedError, InternalError};
use thiserror::Error;

use crate::AccountID;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Issues the bearer tokens that identify an account after a wallet login
/// and resolves them back on later requests
pub trait AuthenticationService: Send + Sync {
    fn make_access_token(&self, account_id: &AccountID) -> Result<String, InternalError>;

    fn account_id_by_token(&self, access_token: &str) -> Result<AccountID, AccessTokenError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum AccessTokenError {
    #[error("Invalid access token")]
    Invalid(#[source] BoxedError),

    #[error("Expired access token")]
    Expired,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
