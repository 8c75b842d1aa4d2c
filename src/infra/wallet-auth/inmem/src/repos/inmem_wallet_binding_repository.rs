// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    binding_by_address: BTreeMap<WalletAddress, WalletBinding>,
    address_by_account: HashMap<AccountID, WalletAddress>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryWalletBindingRepository {
    state: Arc<RwLock<State>>,
}

#[dill::component(pub)]
#[dill::interface(dyn WalletBindingRepository)]
#[dill::scope(dill::Singleton)]
impl InMemoryWalletBindingRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl WalletBindingRepository for InMemoryWalletBindingRepository {
    async fn save_binding(&self, binding: &WalletBinding) -> Result<(), SaveBindingError> {
        // Check and write happen under one write lock
        let mut writable_state = self.state.write().await;

        if let Some(existing) = writable_state.binding_by_address.get(&binding.address) {
            if existing.account_id != binding.account_id {
                return Err(SaveBindingError::AddressAlreadyBound(
                    AddressAlreadyBoundError {
                        address: binding.address.clone(),
                        owner_account_id: existing.account_id.clone(),
                        owner_hint: None,
                    },
                ));
            }
        }

        if let Some(previous_address) = writable_state
            .address_by_account
            .insert(binding.account_id.clone(), binding.address.clone())
        {
            if previous_address != binding.address {
                writable_state.binding_by_address.remove(&previous_address);
            }
        }

        writable_state
            .binding_by_address
            .insert(binding.address.clone(), binding.clone());

        Ok(())
    }

    async fn get_binding_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<WalletBinding, GetBindingError> {
        let readable_state = self.state.read().await;

        readable_state
            .binding_by_address
            .get(address)
            .cloned()
            .ok_or_else(|| GetBindingError::NotFound(BindingNotFoundError::ByAddress(address.clone())))
    }

    async fn get_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<WalletBinding, GetBindingError> {
        let readable_state = self.state.read().await;

        readable_state
            .address_by_account
            .get(account_id)
            .and_then(|address| readable_state.binding_by_address.get(address))
            .cloned()
            .ok_or_else(|| {
                GetBindingError::NotFound(BindingNotFoundError::ByAccount(account_id.clone()))
            })
    }

    async fn delete_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<bool, DeleteBindingError> {
        let mut writable_state = self.state.write().await;

        let Some(address) = writable_state.address_by_account.remove(account_id) else {
            return Ok(false);
        };
        writable_state.binding_by_address.remove(&address);

        Ok(true)
    }

    async fn list_bindings(&self) -> Result<Vec<WalletBinding>, ListBindingsError> {
        let readable_state = self.state.read().await;

        Ok(readable_state.binding_by_address.values().cloned().collect())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
