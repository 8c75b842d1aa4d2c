// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use assert_matches::assert_matches;
use chrono::Duration;
use wallet_auth::*;
use wallet_auth_services::testing::TestWallet;

use crate::harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_login_challenge_persisted() {
    let harness = WalletAuthHarness::new();
    let session_id = WalletSessionId::new_generated();

    let issued = harness.issue_login(session_id, None).await;

    pretty_assertions::assert_eq!(session_id, issued.session_id);
    pretty_assertions::assert_eq!(
        t0() + Duration::seconds(DEFAULT_CHALLENGE_TTL_SECONDS),
        issued.expires_at
    );
    assert!(issued.message.contains(TEST_APP_NAME));
    assert!(issued.message.contains(&issued.nonce.to_string()));

    let stored = harness
        .challenge_repo
        .get_challenge(&session_id)
        .await
        .unwrap();
    pretty_assertions::assert_eq!(issued.nonce, stored.nonce);
    pretty_assertions::assert_eq!(issued.message, stored.message);
    pretty_assertions::assert_eq!(ChallengePurpose::Login, stored.purpose);
    pretty_assertions::assert_eq!(None, stored.account_id);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_nonces_are_unique() {
    let harness = WalletAuthHarness::new();

    let a = harness.issue_login(WalletSessionId::new_generated(), None).await;
    let b = harness.issue_login(WalletSessionId::new_generated(), None).await;

    assert_ne!(a.nonce, b.nonce);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_reissue_supersedes_pending_challenge() {
    let harness = WalletAuthHarness::new();
    let session_id = WalletSessionId::new_generated();

    let first = harness.issue_login(session_id, None).await;
    let second = harness.issue_login(session_id, None).await;
    assert_ne!(first.nonce, second.nonce);

    let stored = harness
        .challenge_repo
        .get_challenge(&session_id)
        .await
        .unwrap();
    pretty_assertions::assert_eq!(second.nonce, stored.nonce);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_link_challenge_mentions_wallet_and_account() {
    let harness = WalletAuthHarness::new();
    let alice = harness.create_account("acc_alice001", "alice").await;
    let wallet = TestWallet::from_seed("alice");
    let session_id = WalletSessionId::new_generated();

    let issued = harness.issue_link(session_id, &alice, &wallet.address()).await;

    assert!(issued.message.contains(&wallet.address().to_string()));
    assert!(issued.message.contains("alice"));

    let stored = harness
        .challenge_repo
        .get_challenge(&session_id)
        .await
        .unwrap();
    pretty_assertions::assert_eq!(ChallengePurpose::Link, stored.purpose);
    pretty_assertions::assert_eq!(Some(alice.id), stored.account_id);
    pretty_assertions::assert_eq!(Some(wallet.address()), stored.address);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_link_challenge_requires_identity() {
    let harness = WalletAuthHarness::new();
    let wallet = TestWallet::from_seed("alice");
    let session_id = WalletSessionId::new_generated();

    assert_matches!(
        harness
            .challenge_issuer
            .issue_link_challenge(session_id, None, wallet.address())
            .await,
        Err(IssueChallengeError::Unauthorized(_))
    );

    let ghost = AccountID::try_new("acc_ghost001").unwrap();
    assert_matches!(
        harness
            .challenge_issuer
            .issue_link_challenge(session_id, Some(&ghost), wallet.address())
            .await,
        Err(IssueChallengeError::Unauthorized(_))
    );

    assert_matches!(
        harness.challenge_repo.try_get_challenge(&session_id).await,
        Ok(None)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_link_challenge_for_foreign_wallet_rejected() {
    let harness = WalletAuthHarness::new();
    let alice = harness.create_account("acc_alice001", "alice").await;
    let bob = harness.create_account("acc_bob00001", "bob").await;
    let wallet = TestWallet::from_seed("shared");

    harness.link_wallet(&alice, &wallet).await.unwrap();

    let result = harness
        .challenge_issuer
        .issue_link_challenge(WalletSessionId::new_generated(), Some(&bob.id), wallet.address())
        .await;

    assert_matches!(
        result,
        Err(IssueChallengeError::AddressAlreadyBound(e))
            if e.owner_account_id == alice.id && e.owner_hint.as_deref() == Some("alice")
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_revoke_challenge_idempotent() {
    let harness = WalletAuthHarness::new();
    let session_id = WalletSessionId::new_generated();

    harness.issue_login(session_id, None).await;

    harness
        .challenge_issuer
        .revoke_challenge(&session_id)
        .await
        .unwrap();
    harness
        .challenge_issuer
        .revoke_challenge(&session_id)
        .await
        .unwrap();

    assert_matches!(
        harness.challenge_repo.try_get_challenge(&session_id).await,
        Ok(None)
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test)]
async fn test_cleanup_expired_challenges() {
    let harness = WalletAuthHarness::new();

    let old_session = WalletSessionId::new_generated();
    harness.issue_login(old_session, None).await;

    harness.time_source.advance(Duration::minutes(4));
    let fresh_session = WalletSessionId::new_generated();
    harness.issue_login(fresh_session, None).await;

    harness.time_source.advance(Duration::minutes(2));
    assert_matches!(
        harness.challenge_issuer.cleanup_expired_challenges().await,
        Ok(1)
    );

    assert_matches!(
        harness.challenge_repo.try_get_challenge(&old_session).await,
        Ok(None)
    );
    assert_matches!(
        harness.challenge_repo.try_get_challenge(&fresh_session).await,
        Ok(Some(_))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
