// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::{IpAddr, Ipv4Addr};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wallet_auth_server::WalletAuthApiServer;
use wallet_auth_server::config::ServerConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_serves_wallet_routes_and_openapi() {
    let base_url = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{base_url}/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let openapi: Value = res.json().await.unwrap();
    assert_eq!(openapi["info"]["title"], "Wallet Auth");
    for path in [
        "/wallet/challenge",
        "/wallet/verify",
        "/wallet/login",
        "/wallet/unbind",
        "/wallet/check",
        "/wallet/accounts/{address}",
    ] {
        assert!(openapi["paths"].get(path).is_some(), "{path} is not documented");
    }

    let res = client
        .post(format!("{base_url}/wallet/challenge"))
        .header("x-wallet-session", "1f0e3b5c-8a4d-4c1e-9f2a-6b7c8d9e0f1a")
        .json(&json!({ "purpose": "login" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    let nonce = body["nonce"].as_str().unwrap();
    assert!(body["message"].as_str().unwrap().contains(nonce));
}

#[test_log::test(tokio::test)]
async fn test_account_routes_require_access_token() {
    let base_url = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base_url}/wallet/unbind"))
        .header("x-account-id", "acc_00000001")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{base_url}/wallet/unbind"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNAUTHORIZED);
}

#[test_log::test(tokio::test)]
async fn test_unknown_route() {
    let base_url = start_server().await;

    let res = reqwest::get(format!("{base_url}/no/such/route"))
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

async fn start_server() -> String {
    let catalog = wallet_auth_server::build_catalog(&ServerConfig::default())
        .await
        .unwrap();

    let server = WalletAuthApiServer::new(catalog, IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
        .await
        .unwrap();
    let base_url = format!("http://{}", server.local_addr());

    tokio::spawn(server.run(std::future::pending()));

    base_url
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
