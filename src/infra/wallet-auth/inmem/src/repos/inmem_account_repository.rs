// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
struct State {
    account_by_id: HashMap<AccountID, Account>,
    account_id_by_name: HashMap<String, AccountID>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct InMemoryAccountRepository {
    state: Arc<RwLock<State>>,
}

#[dill::component(pub)]
#[dill::interface(dyn AccountRepository)]
#[dill::scope(dill::Singleton)]
impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }
}

/// Names are unique case-insensitively
fn name_key(account_name: &AccountName) -> String {
    account_name.as_ref().to_lowercase()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError> {
        let mut writable_state = self.state.write().await;

        if writable_state.account_by_id.contains_key(&account.id) {
            return Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
                account_field: CreateAccountDuplicateField::Id,
            }));
        }

        let name_key = name_key(&account.account_name);
        if writable_state.account_id_by_name.contains_key(&name_key) {
            return Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
                account_field: CreateAccountDuplicateField::Name,
            }));
        }

        writable_state
            .account_id_by_name
            .insert(name_key, account.id.clone());
        writable_state
            .account_by_id
            .insert(account.id.clone(), account.clone());

        Ok(())
    }

    async fn get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Account, GetAccountByIdError> {
        let readable_state = self.state.read().await;

        readable_state
            .account_by_id
            .get(account_id)
            .cloned()
            .ok_or_else(|| {
                GetAccountByIdError::NotFound(AccountNotFoundByIdError {
                    account_id: account_id.clone(),
                })
            })
    }

    async fn find_account_by_name(
        &self,
        account_name: &AccountName,
    ) -> Result<Option<Account>, FindAccountByNameError> {
        let readable_state = self.state.read().await;

        Ok(readable_state
            .account_id_by_name
            .get(&name_key(account_name))
            .and_then(|id| readable_state.account_by_id.get(id))
            .cloned())
    }

    async fn delete_account(&self, account_id: &AccountID) -> Result<bool, DeleteAccountError> {
        let mut writable_state = self.state.write().await;

        let Some(account) = writable_state.account_by_id.remove(account_id) else {
            return Ok(false);
        };
        writable_state
            .account_id_by_name
            .remove(&name_key(&account.account_name));

        Ok(true)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
