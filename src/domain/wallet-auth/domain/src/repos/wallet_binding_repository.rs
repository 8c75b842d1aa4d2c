// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{AccountID, WalletAddress, WalletBinding};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Durable address → account mapping. The mapping is injective in both
/// directions at all times.
#[async_trait::async_trait]
pub trait WalletBindingRepository: Send + Sync {
    /// Atomic check-and-set:
    /// - address owned by another account: fails, nothing is written
    /// - address already owned by the same account: record is refreshed
    /// - account owned a different address: that binding is replaced
    async fn save_binding(&self, binding: &WalletBinding) -> Result<(), SaveBindingError>;

    async fn get_binding_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<WalletBinding, GetBindingError>;

    async fn get_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<WalletBinding, GetBindingError>;

    /// Idempotent. Returns whether a binding was removed.
    async fn delete_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<bool, DeleteBindingError>;

    /// Ordered by address
    async fn list_bindings(&self) -> Result<Vec<WalletBinding>, ListBindingsError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
pub trait WalletBindingRepositoryExt: WalletBindingRepository {
    async fn find_binding_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<WalletBinding>, InternalError>;

    async fn find_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<Option<WalletBinding>, InternalError>;
}

#[async_trait::async_trait]
impl<T> WalletBindingRepositoryExt for T
where
    T: WalletBindingRepository,
    T: ?Sized,
{
    async fn find_binding_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<Option<WalletBinding>, InternalError> {
        match self.get_binding_by_address(address).await {
            Ok(binding) => Ok(Some(binding)),
            Err(GetBindingError::NotFound(_)) => Ok(None),
            Err(GetBindingError::Internal(e)) => Err(e),
        }
    }

    async fn find_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<Option<WalletBinding>, InternalError> {
        match self.get_binding_by_account(account_id).await {
            Ok(binding) => Ok(Some(binding)),
            Err(GetBindingError::NotFound(_)) => Ok(None),
            Err(GetBindingError::Internal(e)) => Err(e),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum SaveBindingError {
    #[error(transparent)]
    AddressAlreadyBound(AddressAlreadyBoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for SaveBindingError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AddressAlreadyBound(a), Self::AddressAlreadyBound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

/// The address is held by a different account. `owner_hint` is a
/// displayable name of the owner, filled in by services where disclosable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Wallet {address} is already linked to another account{}", .owner_hint.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
pub struct AddressAlreadyBoundError {
    pub address: WalletAddress,
    pub owner_account_id: AccountID,
    pub owner_hint: Option<String>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum GetBindingError {
    #[error(transparent)]
    NotFound(BindingNotFoundError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for GetBindingError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingNotFoundError {
    #[error("No wallet bound to address: {0}")]
    ByAddress(WalletAddress),

    #[error("No wallet bound to account: {0}")]
    ByAccount(AccountID),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum DeleteBindingError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ListBindingsError {
    #[error(transparent)]
    Internal(#[from] InternalError),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
