// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use tokio::sync::watch;

use crate::FlowError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Resolves once the wallet provider has been injected into the environment.
/// Waiting is bounded; a provider that never shows up ends in
/// [`FlowError::NoWalletDetected`].
#[derive(Clone)]
pub struct WalletAvailability {
    rx: watch::Receiver<bool>,
}

/// Producer side of [`WalletAvailability`]
pub struct WalletAvailabilityNotifier {
    tx: watch::Sender<bool>,
}

impl WalletAvailability {
    pub fn channel() -> (WalletAvailabilityNotifier, Self) {
        let (tx, rx) = watch::channel(false);
        (WalletAvailabilityNotifier { tx }, Self { rx })
    }

    /// For environments where the provider is present from the start
    pub fn ready() -> Self {
        let (notifier, availability) = Self::channel();
        notifier.mark_available();
        availability
    }

    pub fn is_available(&self) -> bool {
        *self.rx.borrow()
    }

    pub async fn wait(&self, timeout: Duration) -> Result<(), FlowError> {
        let mut rx = self.rx.clone();

        match tokio::time::timeout(timeout, rx.wait_for(|available| *available)).await {
            Ok(Ok(_)) => Ok(()),
            // Notifier dropped before the provider appeared
            Ok(Err(_)) | Err(_) => Err(FlowError::NoWalletDetected),
        }
    }
}

impl WalletAvailabilityNotifier {
    pub fn mark_available(&self) {
        self.tx.send_replace(true);
    }

    pub fn mark_unavailable(&self) {
        self.tx.send_replace(false);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
