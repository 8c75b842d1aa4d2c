// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::DateTime;
use internal_error::InternalError;
use time_source::SystemTimeSource;
use wallet_auth::*;

use crate::owner_hint::with_owner_hint;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Consolidates the two legacy keys into a single binding per account. Meant
/// to run once; accounts that already hold a binding are left untouched, so
/// re-running it is harmless.
#[dill::component(pub)]
#[dill::interface(dyn LegacyBindingMigrator)]
pub struct LegacyBindingMigratorImpl {
    binding_repo: Arc<dyn WalletBindingRepository>,
    account_repo: Arc<dyn AccountRepository>,
    time_source: Arc<dyn SystemTimeSource>,
}

impl LegacyBindingMigratorImpl {
    fn skip(
        report: &mut LegacyMigrationReport,
        record: &LegacyWalletRecord,
        value: &str,
        reason: &str,
    ) {
        tracing::warn!(account_id = %record.account_id, value, reason, "Legacy record skipped");

        report.skipped_invalid.push(LegacySkippedRecord {
            account_id: record.account_id.clone(),
            value: value.to_string(),
            reason: reason.to_string(),
        });
    }
}

#[async_trait::async_trait]
impl LegacyBindingMigrator for LegacyBindingMigratorImpl {
    #[tracing::instrument(level = "info", skip_all, fields(num_records = records.len()))]
    async fn migrate(
        &self,
        records: Vec<LegacyWalletRecord>,
    ) -> Result<LegacyMigrationReport, InternalError> {
        let mut report = LegacyMigrationReport::default();

        for record in &records {
            let Some(raw_address) = record.effective_address() else {
                report.skipped_empty += 1;
                continue;
            };

            let Ok(address) = WalletAddress::try_new(raw_address) else {
                Self::skip(&mut report, record, raw_address, "malformed address");
                continue;
            };

            if self
                .account_repo
                .try_get_account_by_id(&record.account_id)
                .await?
                .is_none()
            {
                Self::skip(&mut report, record, raw_address, "unknown account");
                continue;
            }

            if self
                .binding_repo
                .find_binding_by_account(&record.account_id)
                .await?
                .is_some()
            {
                report.already_bound += 1;
                continue;
            }

            let linked_at = record
                .wallet_connection_timestamp
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .unwrap_or_else(|| self.time_source.now());

            let signature_proof = record
                .wallet_connection_signature
                .as_deref()
                .and_then(|s| s.parse::<WalletSignature>().ok());

            let binding = WalletBinding {
                address,
                account_id: record.account_id.clone(),
                linked_at,
                signature_proof,
            };

            match self.binding_repo.save_binding(&binding).await {
                Ok(()) => report.migrated += 1,
                Err(SaveBindingError::AddressAlreadyBound(e)) => {
                    let e = with_owner_hint(self.account_repo.as_ref(), e).await?;
                    tracing::warn!(
                        account_id = %record.account_id,
                        error = %e,
                        "Legacy binding conflicts with an existing one"
                    );
                    report.conflicts.push(e);
                }
                Err(SaveBindingError::Internal(e)) => return Err(e),
            }
        }

        tracing::info!(
            migrated = report.migrated,
            already_bound = report.already_bound,
            skipped_empty = report.skipped_empty,
            skipped_invalid = report.skipped_invalid.len(),
            conflicts = report.conflicts.len(),
            "Legacy wallet bindings migrated"
        );

        Ok(report)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
