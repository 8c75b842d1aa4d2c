// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use wallet_auth::WalletAddress;
use wallet_auth_client::{WalletProvider, WalletProviderError};
use wallet_auth_services::testing::TestWallet;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub enum AccountsBehavior {
    Approve,
    Reject,
    Empty,
    Hang,
}

pub enum SignBehavior {
    Approve,
    Reject,
    Hang,
    /// Waits for [`FakeWallet::release_signature`]
    Gated,
    /// Signs with a different key than the one it exposes
    SignWith(TestWallet),
    Garbage,
}

/// Scriptable stand-in for a browser wallet
pub struct FakeWallet {
    wallet: TestWallet,
    accounts: AccountsBehavior,
    sign: SignBehavior,
    sign_gate: Semaphore,
    sign_requests: AtomicUsize,
}

impl FakeWallet {
    pub fn new(seed: &str) -> Self {
        Self {
            wallet: TestWallet::from_seed(seed),
            accounts: AccountsBehavior::Approve,
            sign: SignBehavior::Approve,
            sign_gate: Semaphore::new(0),
            sign_requests: AtomicUsize::new(0),
        }
    }

    pub fn with_accounts(self, accounts: AccountsBehavior) -> Self {
        Self { accounts, ..self }
    }

    pub fn with_sign(self, sign: SignBehavior) -> Self {
        Self { sign, ..self }
    }

    pub fn address(&self) -> WalletAddress {
        self.wallet.address()
    }

    pub fn sign_requests(&self) -> usize {
        self.sign_requests.load(Ordering::SeqCst)
    }

    pub fn release_signature(&self) {
        self.sign_gate.add_permits(1);
    }
}

#[async_trait::async_trait]
impl WalletProvider for FakeWallet {
    async fn get_accounts(&self) -> Result<Vec<String>, WalletProviderError> {
        // Never pre-authorized
        Ok(Vec::new())
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletProviderError> {
        match self.accounts {
            AccountsBehavior::Approve => Ok(vec![self.checksummed_looking_address()]),
            AccountsBehavior::Reject => Err(WalletProviderError::UserRejected),
            AccountsBehavior::Empty => Ok(Vec::new()),
            AccountsBehavior::Hang => std::future::pending().await,
        }
    }

    async fn sign_message(
        &self,
        address: &WalletAddress,
        message: &str,
    ) -> Result<String, WalletProviderError> {
        self.sign_requests.fetch_add(1, Ordering::SeqCst);
        assert_eq!(*address, self.wallet.address());

        match &self.sign {
            SignBehavior::Approve => Ok(self.wallet.sign_message(message).to_string()),
            SignBehavior::Reject => Err(WalletProviderError::UserRejected),
            SignBehavior::Hang => std::future::pending().await,
            SignBehavior::Gated => {
                self.sign_gate.acquire().await.unwrap().forget();
                Ok(self.wallet.sign_message(message).to_string())
            }
            SignBehavior::SignWith(other) => Ok(other.sign_message(message).to_string()),
            SignBehavior::Garbage => Ok("0xnot-a-signature".to_string()),
        }
    }
}

impl FakeWallet {
    /// Wallets report mixed-case addresses
    fn checksummed_looking_address(&self) -> String {
        let address = self.wallet.address();
        format!("0x{}", address.as_ref()[2..].to_uppercase())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
