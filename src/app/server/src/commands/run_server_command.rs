// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use dill::Catalog;
use internal_error::{InternalError, ResultIntoInternal};
use wallet_auth::ChallengeIssuer;

use super::Command;
use crate::WalletAuthApiServer;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct RunServerCommand {
    catalog: Catalog,
    address: IpAddr,
    port: u16,
    cleanup_interval: Duration,
}

impl RunServerCommand {
    pub fn new(catalog: Catalog, address: IpAddr, port: u16, cleanup_interval: Duration) -> Self {
        Self {
            catalog,
            address,
            port,
            cleanup_interval,
        }
    }
}

#[async_trait::async_trait]
impl Command for RunServerCommand {
    async fn run(&self) -> Result<(), InternalError> {
        let challenge_issuer = self.catalog.get_one::<dyn ChallengeIssuer>().int_err()?;

        // Leftovers of a previous run
        purge_expired_challenges(challenge_issuer.as_ref()).await;

        let server = WalletAuthApiServer::new(self.catalog.clone(), self.address, self.port).await?;

        tokio::select! {
            res = server.run(shutdown_signal()) => res,
            () = run_periodic_cleanup(challenge_issuer, self.cleanup_interval) => Ok(()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "Failed to listen for the shutdown signal");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down");
}

/// Never completes
async fn run_periodic_cleanup(challenge_issuer: Arc<dyn ChallengeIssuer>, interval: Duration) {
    if interval.is_zero() {
        return std::future::pending().await;
    }

    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        purge_expired_challenges(challenge_issuer.as_ref()).await;
    }
}

async fn purge_expired_challenges(challenge_issuer: &dyn ChallengeIssuer) {
    if let Err(err) = challenge_issuer.cleanup_expired_challenges().await {
        tracing::error!(error = ?err, error_msg = %err, "Challenge cleanup failed");
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
