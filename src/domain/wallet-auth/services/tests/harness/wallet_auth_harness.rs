// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use dill::{Catalog, CatalogBuilder};
use time_source::{SystemTimeSource, SystemTimeSourceStub};
use wallet_auth::*;
use wallet_auth_inmem::{
    InMemoryAccountRepository,
    InMemoryNonceChallengeRepository,
    InMemoryWalletBindingRepository,
};
use wallet_auth_services::testing::TestWallet;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const TEST_APP_NAME: &str = "Test App";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 2, 0, 0, 0).unwrap()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct WalletAuthHarness {
    #[allow(dead_code)]
    pub catalog: Catalog,
    pub time_source: Arc<SystemTimeSourceStub>,
    pub authentication_service: Arc<dyn AuthenticationService>,
    pub challenge_issuer: Arc<dyn ChallengeIssuer>,
    pub wallet_auth_service: Arc<dyn WalletAuthService>,
    pub legacy_migrator: Arc<dyn LegacyBindingMigrator>,
    pub account_repo: Arc<dyn AccountRepository>,
    pub binding_repo: Arc<dyn WalletBindingRepository>,
    pub challenge_repo: Arc<dyn NonceChallengeRepository>,
}

impl WalletAuthHarness {
    pub fn new() -> Self {
        Self::with_config(Self::default_config())
    }

    pub fn default_config() -> WalletAuthConfig {
        WalletAuthConfig {
            app_name: TEST_APP_NAME.to_string(),
            ..WalletAuthConfig::default()
        }
    }

    pub fn with_config(config: WalletAuthConfig) -> Self {
        let catalog = {
            let mut b = CatalogBuilder::new();

            b.add_value(config)
                .add_value(JwtAuthenticationConfig::new(Some(TEST_JWT_SECRET.to_string())))
                .add_value(SystemTimeSourceStub::new_set(t0()))
                .bind::<dyn SystemTimeSource, SystemTimeSourceStub>()
                .add::<InMemoryAccountRepository>()
                .add::<InMemoryNonceChallengeRepository>()
                .add::<InMemoryWalletBindingRepository>();

            wallet_auth_services::register_dependencies(&mut b);

            b.build()
        };

        Self {
            time_source: catalog.get_one().unwrap(),
            authentication_service: catalog.get_one().unwrap(),
            challenge_issuer: catalog.get_one().unwrap(),
            wallet_auth_service: catalog.get_one().unwrap(),
            legacy_migrator: catalog.get_one().unwrap(),
            account_repo: catalog.get_one().unwrap(),
            binding_repo: catalog.get_one().unwrap(),
            challenge_repo: catalog.get_one().unwrap(),
            catalog,
        }
    }

    pub async fn create_account(&self, id: &str, name: &str) -> Account {
        let account = Account::test(id, name);
        self.account_repo.create_account(&account).await.unwrap();
        account
    }

    pub async fn issue_link(
        &self,
        session_id: WalletSessionId,
        account: &Account,
        address: &WalletAddress,
    ) -> IssuedChallenge {
        self.challenge_issuer
            .issue_link_challenge(session_id, Some(&account.id), address.clone())
            .await
            .unwrap()
    }

    pub async fn issue_login(
        &self,
        session_id: WalletSessionId,
        claimed_address: Option<&WalletAddress>,
    ) -> IssuedChallenge {
        self.challenge_issuer
            .issue_login_challenge(session_id, claimed_address.cloned())
            .await
            .unwrap()
    }

    /// Full link flow: challenge, signature, verification
    pub async fn link_wallet(
        &self,
        account: &Account,
        wallet: &TestWallet,
    ) -> Result<WalletBinding, VerifyAndBindError> {
        let session_id = WalletSessionId::new_generated();
        let issued = self.issue_link(session_id, account, &wallet.address()).await;

        self.wallet_auth_service
            .verify_and_bind(&session_id, Some(&account.id), signed_proof(wallet, &issued))
            .await
    }

    /// Full login flow: challenge, signature, verification
    pub async fn login_wallet(
        &self,
        wallet: &TestWallet,
    ) -> Result<WalletLoginResult, LoginWithWalletError> {
        let session_id = WalletSessionId::new_generated();
        let issued = self.issue_login(session_id, None).await;

        self.wallet_auth_service
            .login_with_wallet(&session_id, signed_proof(wallet, &issued))
            .await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn signed_proof(wallet: &TestWallet, issued: &IssuedChallenge) -> WalletProof {
    WalletProof {
        address: wallet.address(),
        signature: wallet.sign_message(&issued.message),
        nonce: issued.nonce.to_string(),
        message: issued.message.clone(),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
