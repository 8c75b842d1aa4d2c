// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;

use crate::{AccountID, AddressAlreadyBoundError, LegacyWalletRecord};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One-time import of bindings kept under the legacy user-meta keys
#[async_trait::async_trait]
pub trait LegacyBindingMigrator: Send + Sync {
    async fn migrate(
        &self,
        records: Vec<LegacyWalletRecord>,
    ) -> Result<LegacyMigrationReport, InternalError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LegacyMigrationReport {
    pub migrated: usize,
    /// Accounts that already hold a binding in the consolidated store
    pub already_bound: usize,
    /// Records that carry no address under either key
    pub skipped_empty: usize,
    pub skipped_invalid: Vec<LegacySkippedRecord>,
    pub conflicts: Vec<AddressAlreadyBoundError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySkippedRecord {
    pub account_id: AccountID,
    pub value: String,
    pub reason: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
