// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use wallet_auth_inmem::InMemoryNonceChallengeRepository;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_save_and_get_challenge() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_save_and_get_challenge(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_newer_challenge_supersedes() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_newer_challenge_supersedes(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_take_challenge_once() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_take_challenge_once(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_take_challenge_with_stale_nonce() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_take_challenge_with_stale_nonce(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_concurrent_take_challenge() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_concurrent_take_challenge(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_delete_challenge() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_delete_challenge(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_cleanup_expired_challenges() {
    let harness = InmemNonceChallengeRepositoryHarness::new();
    wallet_auth_repo_tests::test_cleanup_expired_challenges(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct InmemNonceChallengeRepositoryHarness {
    catalog: Catalog,
}

impl InmemNonceChallengeRepositoryHarness {
    pub fn new() -> Self {
        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add::<InMemoryNonceChallengeRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
