// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use dill::{Catalog, CatalogBuilder};
use internal_error::{InternalError, ResultIntoInternal};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use time_source::SystemTimeSourceDefault;
use wallet_auth::{ChallengeIssuer, LegacyBindingMigrator};

use crate::cli::{Cli, SubCommand};
use crate::commands::*;
use crate::config::{DatabaseConfig, ServerConfig};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const SQLITE_MAX_CONNECTIONS: u32 = 5;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn run(cli: Cli) -> Result<(), InternalError> {
    let config = ServerConfig::load(cli.config.as_deref())?;

    let _guards = observability::init::init(&config.logging);
    observability::panic_handler::set_hook_trace_panics(true);

    let res = run_command(config, cli.command).await;

    if let Err(err) = &res {
        tracing::error!(error = ?err, error_msg = %err, "Command failed");
    }

    res
}

async fn run_command(config: ServerConfig, command: SubCommand) -> Result<(), InternalError> {
    let catalog = build_catalog(&config).await?;

    let command: Box<dyn Command> = match command {
        SubCommand::Run { address, port } => Box::new(RunServerCommand::new(
            catalog,
            address.unwrap_or(config.http.address),
            port.unwrap_or(config.http.port),
            config.maintenance.challenge_cleanup_interval,
        )),
        SubCommand::MigrateLegacy { file } => Box::new(MigrateLegacyCommand::new(
            catalog.get_one::<dyn LegacyBindingMigrator>().int_err()?,
            file,
        )),
        SubCommand::CleanupChallenges => Box::new(CleanupChallengesCommand::new(
            catalog.get_one::<dyn ChallengeIssuer>().int_err()?,
        )),
    };

    command.run().await
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn build_catalog(config: &ServerConfig) -> Result<Catalog, InternalError> {
    let mut b = CatalogBuilder::new();

    b.add::<SystemTimeSourceDefault>();
    b.add_value(config.auth.to_domain_config()?);
    b.add_value(config.auth.to_jwt_config()?);

    match &config.database {
        DatabaseConfig::InMemory => {
            tracing::warn!("Using in-memory storage, state will be lost on restart");

            b.add::<wallet_auth_inmem::InMemoryAccountRepository>();
            b.add::<wallet_auth_inmem::InMemoryNonceChallengeRepository>();
            b.add::<wallet_auth_inmem::InMemoryWalletBindingRepository>();
        }
        DatabaseConfig::Sqlite { database_path } => {
            let pool = connect_sqlite(database_path).await?;

            b.add_value(pool);
            b.add::<wallet_auth_sqlite::SqliteAccountRepository>();
            b.add::<wallet_auth_sqlite::SqliteNonceChallengeRepository>();
            b.add::<wallet_auth_sqlite::SqliteWalletBindingRepository>();
        }
    }

    wallet_auth_services::register_dependencies(&mut b);

    Ok(b.build())
}

#[tracing::instrument(level = "info", skip_all, fields(database_path = %database_path.display()))]
async fn connect_sqlite(database_path: &Path) -> Result<SqlitePool, InternalError> {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(SQLITE_MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .int_err()?;

    wallet_auth_sqlite::MIGRATOR.run(&pool).await.int_err()?;

    tracing::info!("Database migrations applied");

    Ok(pool)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
