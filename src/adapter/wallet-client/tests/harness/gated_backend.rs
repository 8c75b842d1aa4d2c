// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use wallet_auth::{WalletAddress, WalletProof};
use wallet_auth_client::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub enum VerifyBehavior {
    PassThrough,
    /// The server processes the proof, but the response is held back until
    /// [`GatedBackend::release_verification`]
    Gated,
    Hang,
}

/// Wraps a real backend to control when verification responses arrive
pub struct GatedBackend {
    inner: Arc<dyn WalletAuthBackend>,
    verify: VerifyBehavior,
    verify_gate: Semaphore,
    verify_requests: AtomicUsize,
}

impl GatedBackend {
    pub fn new(inner: Arc<dyn WalletAuthBackend>, verify: VerifyBehavior) -> Self {
        Self {
            inner,
            verify,
            verify_gate: Semaphore::new(0),
            verify_requests: AtomicUsize::new(0),
        }
    }

    pub fn verify_requests(&self) -> usize {
        self.verify_requests.load(Ordering::SeqCst)
    }

    pub fn release_verification(&self) {
        self.verify_gate.add_permits(1);
    }
}

#[async_trait::async_trait]
impl WalletAuthBackend for GatedBackend {
    async fn issue_challenge(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        address: &WalletAddress,
    ) -> Result<ChallengeTicket, FlowError> {
        self.inner.issue_challenge(context, intent, address).await
    }

    async fn revoke_challenge(&self, context: &FlowContext) -> Result<(), FlowError> {
        self.inner.revoke_challenge(context).await
    }

    async fn verify(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        proof: WalletProof,
    ) -> Result<FlowSuccess, FlowError> {
        self.verify_requests.fetch_add(1, Ordering::SeqCst);

        match self.verify {
            VerifyBehavior::PassThrough => self.inner.verify(context, intent, proof).await,
            VerifyBehavior::Gated => {
                let result = self.inner.verify(context, intent, proof).await;
                self.verify_gate.acquire().await.unwrap().forget();
                result
            }
            VerifyBehavior::Hang => std::future::pending().await,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
