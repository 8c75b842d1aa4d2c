// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;
use std::sync::Arc;

use internal_error::{InternalError, ResultIntoInternal};
use wallet_auth::{LegacyBindingMigrator, LegacyMigrationReport, LegacyWalletRecord};

use super::Command;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct MigrateLegacyCommand {
    migrator: Arc<dyn LegacyBindingMigrator>,
    file: PathBuf,
}

impl MigrateLegacyCommand {
    pub fn new(migrator: Arc<dyn LegacyBindingMigrator>, file: PathBuf) -> Self {
        Self { migrator, file }
    }

    pub async fn migrate(&self) -> Result<LegacyMigrationReport, InternalError> {
        let text = std::fs::read_to_string(&self.file).int_err()?;
        let records: Vec<LegacyWalletRecord> = serde_json::from_str(&text).int_err()?;

        tracing::info!(file = %self.file.display(), num_records = records.len(), "Read legacy export");

        self.migrator.migrate(records).await
    }
}

#[async_trait::async_trait]
impl Command for MigrateLegacyCommand {
    async fn run(&self) -> Result<(), InternalError> {
        let report = self.migrate().await?;
        print!("{}", MigrationSummary(&report));
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct MigrationSummary<'a>(&'a LegacyMigrationReport);

impl std::fmt::Display for MigrationSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let report = self.0;

        writeln!(f, "Migrated: {}", report.migrated)?;
        writeln!(f, "Already bound: {}", report.already_bound)?;
        writeln!(f, "Skipped (no address): {}", report.skipped_empty)?;
        writeln!(f, "Skipped (invalid): {}", report.skipped_invalid.len())?;
        for skipped in &report.skipped_invalid {
            writeln!(
                f,
                "  {}: '{}' ({})",
                skipped.account_id, skipped.value, skipped.reason
            )?;
        }
        writeln!(f, "Conflicts: {}", report.conflicts.len())?;
        for conflict in &report.conflicts {
            writeln!(f, "  {conflict}")?;
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
