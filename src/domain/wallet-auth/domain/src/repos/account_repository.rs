// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use internal_error::InternalError;
use thiserror::Error;

use crate::{Account, AccountID, AccountName};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError>;

    async fn get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Account, GetAccountByIdError>;

    async fn find_account_by_name(
        &self,
        account_name: &AccountName,
    ) -> Result<Option<Account>, FindAccountByNameError>;

    /// Idempotent. Returns whether an account was removed.
    async fn delete_account(&self, account_id: &AccountID) -> Result<bool, DeleteAccountError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait AccountRepositoryExt: AccountRepository {
    async fn try_get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Option<Account>, InternalError>;
}

#[async_trait::async_trait]
impl<T> AccountRepositoryExt for T
where
    T: AccountRepository,
    T: ?Sized,
{
    async fn try_get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Option<Account>, InternalError> {
        match self.get_account_by_id(account_id).await {
            Ok(account) => Ok(Some(account)),
            Err(GetAccountByIdError::NotFound(_)) => Ok(None),
            Err(GetAccountByIdError::Internal(e)) => Err(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum CreateAccountError {
    #[error(transparent)]
    Duplicate(CreateAccountErrorDuplicate),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Account not created, duplicate {account_field}")]
pub struct CreateAccountErrorDuplicate {
    pub account_field: CreateAccountDuplicateField,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CreateAccountDuplicateField {
    Id,
    Name,
}

impl Display for CreateAccountDuplicateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
            },
        )
    }
}

impl PartialEq for CreateAccountError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Duplicate(a), Self::Duplicate(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetAccountByIdError {
    #[error(transparent)]
    NotFound(AccountNotFoundByIdError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for GetAccountByIdError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Account not found by ID: '{account_id}'")]
pub struct AccountNotFoundByIdError {
    pub account_id: AccountID,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum FindAccountByNameError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DeleteAccountError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
