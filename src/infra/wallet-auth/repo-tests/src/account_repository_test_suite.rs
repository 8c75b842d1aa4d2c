// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use dill::Catalog;
use wallet_auth::*;

use crate::make_test_account;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_missing_account_not_found(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let account_id = AccountID::try_new("acc_nosuchaccount").unwrap();
    pretty_assertions::assert_eq!(
        Err(GetAccountByIdError::NotFound(AccountNotFoundByIdError {
            account_id: account_id.clone()
        })),
        account_repo.get_account_by_id(&account_id).await
    );

    let account_name = AccountName::try_new("nobody").unwrap();
    assert_matches!(
        account_repo.find_account_by_name(&account_name).await,
        Ok(None)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_create_and_get_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let account = make_test_account("acc_alice001", "alice");
    account_repo.create_account(&account).await.unwrap();

    pretty_assertions::assert_eq!(
        Ok(account.clone()),
        account_repo.get_account_by_id(&account.id).await
    );

    let by_name = account_repo
        .find_account_by_name(&AccountName::try_new("Alice").unwrap())
        .await
        .unwrap();
    pretty_assertions::assert_eq!(Some(account), by_name);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_create_duplicate_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    account_repo
        .create_account(&make_test_account("acc_alice001", "alice"))
        .await
        .unwrap();

    pretty_assertions::assert_eq!(
        Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
            account_field: CreateAccountDuplicateField::Id
        })),
        account_repo
            .create_account(&make_test_account("acc_alice001", "alice2"))
            .await
    );

    pretty_assertions::assert_eq!(
        Err(CreateAccountError::Duplicate(CreateAccountErrorDuplicate {
            account_field: CreateAccountDuplicateField::Name
        })),
        account_repo
            .create_account(&make_test_account("acc_alice002", "ALICE"))
            .await
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_delete_account(catalog: &Catalog) {
    let account_repo = catalog.get_one::<dyn AccountRepository>().unwrap();

    let account = make_test_account("acc_bob00001", "bob");
    account_repo.create_account(&account).await.unwrap();

    assert_matches!(account_repo.delete_account(&account.id).await, Ok(true));
    assert_matches!(account_repo.delete_account(&account.id).await, Ok(false));
    assert_matches!(
        account_repo.try_get_account_by_id(&account.id).await,
        Ok(None)
    );

    // The name is free again
    account_repo
        .create_account(&make_test_account("acc_bob00002", "bob"))
        .await
        .unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
