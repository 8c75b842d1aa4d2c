// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Extension;
use chrono::Utc;
use dill::Catalog;
use pretty_assertions::assert_eq;
use wallet_auth::*;
use wallet_auth_client::*;

use crate::harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

macro_rules! await_client_server_flow {
    ($api_server_handle: expr, $client_handle: expr) => {
        tokio::select! {
            _ = tokio::time::sleep(std::time::Duration::from_secs(60)) => panic!("test timeout!"),
            _ = $api_server_handle => panic!("server-side aborted"),
            _ = $client_handle => {} // Pass, do nothing
        }
    };
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_link_over_http() {
    let harness = HttpBackendHarness::new().await;
    let alice = harness.create_account("acc_00000001", "alice").await;
    let wallet = Arc::new(FakeWallet::new("alice-wallet"));
    let session = harness.session(
        wallet.clone(),
        FlowContext::for_account(credentials_for(&harness.catalog, &alice)),
    );

    let binding_repo = harness
        .catalog
        .get_one::<dyn WalletBindingRepository>()
        .unwrap();

    let client = async move {
        let bound = session.connect(FlowIntent::Link).await.unwrap();

        assert_eq!(bound.address, wallet.address());
        assert_eq!(bound.account_id, Some(alice.id.clone()));

        let binding = binding_repo
            .get_binding_by_address(&wallet.address())
            .await
            .unwrap();
        assert_eq!(binding.account_id, alice.id);
    };

    await_client_server_flow!(harness.server.run(), client);
}

#[test_log::test(tokio::test)]
async fn test_login_over_http() {
    let harness = HttpBackendHarness::new().await;
    let wallet = Arc::new(FakeWallet::new("newcomer"));
    let session = harness.session(wallet.clone(), FlowContext::anonymous());
    let authentication_service = harness
        .catalog
        .get_one::<dyn AuthenticationService>()
        .unwrap();

    let client = async move {
        let bound = session.connect(FlowIntent::Login).await.unwrap();

        assert!(bound.newly_registered);
        assert_eq!(
            bound.account_name.unwrap().to_string(),
            format!("wallet_{}", wallet.address().short_hex())
        );

        // The issued token identifies the new account on later requests
        let access_token = bound.access_token.unwrap();
        assert_eq!(
            authentication_service
                .account_id_by_token(&access_token)
                .ok(),
            bound.account_id
        );
    };

    await_client_server_flow!(harness.server.run(), client);
}

#[test_log::test(tokio::test)]
async fn test_errors_mapped_from_codes() {
    let harness = HttpBackendHarness::new().await;
    let alice = harness.create_account("acc_00000001", "alice").await;
    let bob = harness.create_account("acc_00000002", "bob").await;

    let shared = Arc::new(FakeWallet::new("shared-wallet"));
    harness
        .catalog
        .get_one::<dyn WalletBindingRepository>()
        .unwrap()
        .save_binding(&WalletBinding {
            address: shared.address(),
            account_id: bob.id.clone(),
            linked_at: Utc::now(),
            signature_proof: None,
        })
        .await
        .unwrap();

    let alice_credentials = credentials_for(&harness.catalog, &alice);
    let conflicting = harness.session(shared, FlowContext::for_account(alice_credentials.clone()));
    let forged_link = harness.session(
        Arc::new(FakeWallet::new("alice-wallet")),
        FlowContext::for_account(AccountCredentials {
            account_id: alice.id.clone(),
            access_token: "forged".to_string(),
        }),
    );
    let anonymous_link = harness.session(
        Arc::new(FakeWallet::new("alice-wallet")),
        FlowContext::anonymous(),
    );
    let base_url = harness.base_url();

    let client = async move {
        assert_eq!(
            conflicting.connect(FlowIntent::Link).await,
            Err(FlowError::AddressAlreadyBound {
                owner_hint: Some("bob".to_string())
            })
        );

        assert_eq!(
            anonymous_link.connect(FlowIntent::Link).await,
            Err(FlowError::Unauthorized)
        );

        assert_eq!(
            forged_link.connect(FlowIntent::Link).await,
            Err(FlowError::Unauthorized)
        );

        // Nothing pending for a fresh session
        let backend = HttpWalletAuthBackend::new(base_url);
        let wallet = FakeWallet::new("alice-wallet");
        let res = backend
            .verify(
                &FlowContext::for_account(alice_credentials),
                FlowIntent::Link,
                WalletProof {
                    address: wallet.address(),
                    signature: "0x00".parse().unwrap(),
                    nonce: "abcdefghij0123456789".to_string(),
                    message: "hello".to_string(),
                },
            )
            .await;
        assert!(
            matches!(res, Err(FlowError::NonceInvalid(_))),
            "{res:?}"
        );
    };

    await_client_server_flow!(harness.server.run(), client);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Harness
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct TestApiServer {
    listener: tokio::net::TcpListener,
    router: axum::Router,
}

impl TestApiServer {
    async fn new(catalog: Catalog) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

        let (router, _api) = wallet_auth_adapter_http::wallet::root_router().split_for_parts();
        let router = router.layer(Extension(catalog));

        Self { listener, router }
    }

    fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr().unwrap()
    }

    async fn run(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router.into_make_service()).await
    }
}

struct HttpBackendHarness {
    catalog: Catalog,
    server: TestApiServer,
}

impl HttpBackendHarness {
    async fn new() -> Self {
        let catalog = build_catalog(WalletAuthConfig::default());
        let server = TestApiServer::new(catalog.clone()).await;

        Self { catalog, server }
    }

    fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}", self.server.local_addr())).unwrap()
    }

    async fn create_account(&self, id: &str, name: &str) -> Account {
        let account = Account::test(id, name);
        self.catalog
            .get_one::<dyn AccountRepository>()
            .unwrap()
            .create_account(&account)
            .await
            .unwrap();
        account
    }

    fn session(&self, wallet: Arc<FakeWallet>, context: FlowContext) -> AuthSession {
        AuthSession::new(
            wallet,
            WalletAvailability::ready(),
            Arc::new(HttpWalletAuthBackend::new(self.base_url())),
            context,
            AuthSessionConfig::default(),
        )
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
