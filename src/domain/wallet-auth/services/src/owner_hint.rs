// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use wallet_auth::{AccountID, AccountRepository, AccountRepositoryExt, AddressAlreadyBoundError};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Fills in the owner's account name so the user knows where to unlink first
pub(crate) async fn with_owner_hint(
    account_repo: &dyn AccountRepository,
    mut err: AddressAlreadyBoundError,
) -> Result<AddressAlreadyBoundError, InternalError> {
    err.owner_hint = owner_name(account_repo, &err.owner_account_id).await?;
    Ok(err)
}

async fn owner_name(
    account_repo: &dyn AccountRepository,
    owner_account_id: &AccountID,
) -> Result<Option<String>, InternalError> {
    let maybe_owner = account_repo.try_get_account_by_id(owner_account_id).await?;
    Ok(maybe_owner.map(|a| a.account_name.to_string()))
}
