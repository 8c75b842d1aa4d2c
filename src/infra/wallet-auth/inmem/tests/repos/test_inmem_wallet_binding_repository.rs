// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use wallet_auth_inmem::InMemoryWalletBindingRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_no_bindings() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_no_bindings(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_save_and_get_binding() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_save_and_get_binding(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_binding_without_proof() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_binding_without_proof(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_address_bound_to_other_account() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_address_bound_to_other_account(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_rebinding_replaces_previous_address() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_rebinding_replaces_previous_address(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_delete_binding_idempotent() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_delete_binding_idempotent(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_list_bindings_ordered() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_list_bindings_ordered(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_concurrent_bind_same_address() {
    let harness = InmemWalletBindingRepositoryHarness::new();
    wallet_auth_repo_tests::test_concurrent_bind_same_address(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct InmemWalletBindingRepositoryHarness {
    catalog: Catalog,
}

impl InmemWalletBindingRepositoryHarness {
    pub fn new() -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add::<InMemoryWalletBindingRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
