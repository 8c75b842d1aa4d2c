// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use assert_matches::assert_matches;
use dill::Catalog;
use wallet_auth::*;

use crate::{make_test_address, make_test_binding};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn account_id(s: &str) -> AccountID {
    AccountID::try_new(s).unwrap()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_no_bindings(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let address = make_test_address('1');
    let alice = account_id("acc_alice001");

    pretty_assertions::assert_eq!(
        Err(GetBindingError::NotFound(BindingNotFoundError::ByAddress(
            address.clone()
        ))),
        binding_repo.get_binding_by_address(&address).await
    );
    pretty_assertions::assert_eq!(
        Err(GetBindingError::NotFound(BindingNotFoundError::ByAccount(
            alice.clone()
        ))),
        binding_repo.get_binding_by_account(&alice).await
    );
    assert_matches!(binding_repo.list_bindings().await, Ok(v) if v.is_empty());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_save_and_get_binding(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let binding = make_test_binding(&make_test_address('1'), &account_id("acc_alice001"));
    binding_repo.save_binding(&binding).await.unwrap();

    pretty_assertions::assert_eq!(
        Ok(binding.clone()),
        binding_repo.get_binding_by_address(&binding.address).await
    );
    pretty_assertions::assert_eq!(
        Ok(binding.clone()),
        binding_repo.get_binding_by_account(&binding.account_id).await
    );

    // Same pair again refreshes the record
    binding_repo.save_binding(&binding).await.unwrap();
    pretty_assertions::assert_eq!(vec![binding], binding_repo.list_bindings().await.unwrap());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_binding_without_proof(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let binding = WalletBinding {
        signature_proof: None,
        ..make_test_binding(&make_test_address('7'), &account_id("acc_legacy01"))
    };
    binding_repo.save_binding(&binding).await.unwrap();

    pretty_assertions::assert_eq!(
        Ok(binding.clone()),
        binding_repo.get_binding_by_address(&binding.address).await
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_address_bound_to_other_account(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let address = make_test_address('1');
    let alice = account_id("acc_alice001");
    let bob = account_id("acc_bob00001");

    binding_repo
        .save_binding(&make_test_binding(&address, &alice))
        .await
        .unwrap();

    pretty_assertions::assert_eq!(
        Err(SaveBindingError::AddressAlreadyBound(
            AddressAlreadyBoundError {
                address: address.clone(),
                owner_account_id: alice.clone(),
                owner_hint: None,
            }
        )),
        binding_repo
            .save_binding(&make_test_binding(&address, &bob))
            .await
    );

    // Nothing changed
    assert_matches!(
        binding_repo.find_binding_by_address(&address).await,
        Ok(Some(b)) if b.account_id == alice
    );
    assert_matches!(binding_repo.find_binding_by_account(&bob).await, Ok(None));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_rebinding_replaces_previous_address(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let alice = account_id("acc_alice001");
    let old_address = make_test_address('3');
    let new_address = make_test_address('4');

    binding_repo
        .save_binding(&make_test_binding(&old_address, &alice))
        .await
        .unwrap();
    binding_repo
        .save_binding(&make_test_binding(&new_address, &alice))
        .await
        .unwrap();

    assert_matches!(
        binding_repo.find_binding_by_account(&alice).await,
        Ok(Some(b)) if b.address == new_address
    );
    assert_matches!(
        binding_repo.find_binding_by_address(&old_address).await,
        Ok(None)
    );

    let all = binding_repo.list_bindings().await.unwrap();
    pretty_assertions::assert_eq!(1, all.len());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_delete_binding_idempotent(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let alice = account_id("acc_alice001");
    let address = make_test_address('1');

    binding_repo
        .save_binding(&make_test_binding(&address, &alice))
        .await
        .unwrap();

    assert_matches!(binding_repo.delete_binding_by_account(&alice).await, Ok(true));
    assert_matches!(binding_repo.delete_binding_by_account(&alice).await, Ok(false));
    assert_matches!(
        binding_repo.find_binding_by_address(&address).await,
        Ok(None)
    );

    // The freed address can go to someone else
    let bob = account_id("acc_bob00001");
    binding_repo
        .save_binding(&make_test_binding(&address, &bob))
        .await
        .unwrap();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_list_bindings_ordered(catalog: &Catalog) {
    let binding_repo = catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    for (digit, id) in [('c', "acc_carol001"), ('a', "acc_alice001"), ('b', "acc_bob00001")] {
        binding_repo
            .save_binding(&make_test_binding(&make_test_address(digit), &account_id(id)))
            .await
            .unwrap();
    }

    let addresses: Vec<_> = binding_repo
        .list_bindings()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.address)
        .collect();

    pretty_assertions::assert_eq!(
        vec![
            make_test_address('a'),
            make_test_address('b'),
            make_test_address('c'),
        ],
        addresses
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_bind_same_address(catalog: &Catalog) {
    let binding_repo: Arc<dyn WalletBindingRepository> =
        catalog.get_one::<dyn WalletBindingRepository>().unwrap();

    let address = make_test_address('5');
    let bindings: Vec<_> = (0..8)
        .map(|i| make_test_binding(&address, &account_id(&format!("acc_racer{i:03}"))))
        .collect();

    let results =
        futures::future::join_all(bindings.iter().map(|b| binding_repo.save_binding(b))).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    pretty_assertions::assert_eq!(1, winners);
    assert!(
        results
            .iter()
            .all(|r| matches!(r, Ok(()) | Err(SaveBindingError::AddressAlreadyBound(_))))
    );

    let all = binding_repo.list_bindings().await.unwrap();
    pretty_assertions::assert_eq!(1, all.len());
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
