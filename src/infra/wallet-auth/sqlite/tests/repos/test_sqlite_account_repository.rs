// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::{Catalog, CatalogBuilder};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use wallet_auth_sqlite::{MIGRATOR, SqliteAccountRepository};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_missing_account_not_found() {
    let harness = SqliteAccountRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_missing_account_not_found(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_create_and_get_account() {
    let harness = SqliteAccountRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_create_and_get_account(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_create_duplicate_account() {
    let harness = SqliteAccountRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_create_duplicate_account(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_delete_account() {
    let harness = SqliteAccountRepositoryHarness::new().await;
    wallet_auth_repo_tests::test_delete_account(&harness.catalog).await;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct SqliteAccountRepositoryHarness {
    catalog: Catalog,
}

impl SqliteAccountRepositoryHarness {
    pub async fn new() -> Self {
        // A single long-lived connection keeps the in-memory database alive
        let sqlite_pool: SqlitePool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&sqlite_pool).await.unwrap();

        let mut catalog_builder = CatalogBuilder::new();
        catalog_builder.add_value(sqlite_pool);
        catalog_builder.add::<SqliteAccountRepository>();

        Self {
            catalog: catalog_builder.build(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
