// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::Utc;
use pretty_assertions::assert_eq;
use wallet_auth::*;
use wallet_auth_client::*;
use wallet_auth_services::testing::TestWallet;

use crate::harness::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test(tokio::test(start_paused = true))]
async fn test_link_flow_binds_wallet() {
    let harness = SessionHarness::logged_in(FakeWallet::new("alice-wallet")).await;
    let address = harness.wallet.address();

    let bound = harness.session.connect(FlowIntent::Link).await.unwrap();

    assert_eq!(
        bound,
        BoundWallet {
            address: address.clone(),
            account_id: Some(AccountID::try_new("acc_00000001").unwrap()),
            account_name: None,
            newly_registered: false,
            access_token: None,
        }
    );
    assert_eq!(harness.session.phase(), FlowPhase::Bound(bound));
    assert_eq!(harness.wallet.sign_requests(), 1);
    assert_eq!(
        harness.bound_account(&address).await,
        Some(AccountID::try_new("acc_00000001").unwrap())
    );
    assert_eq!(harness.pending_challenge().await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_login_flow_registers_account() {
    let harness = SessionHarness::anonymous(FakeWallet::new("newcomer"));
    let address = harness.wallet.address();

    let bound = harness.session.connect(FlowIntent::Login).await.unwrap();

    assert_eq!(bound.address, address);
    assert!(bound.newly_registered);
    assert_eq!(
        bound.account_name.map(|n| n.to_string()),
        Some(format!("wallet_{}", address.short_hex()))
    );
    assert_eq!(harness.bound_account(&address).await, bound.account_id);
    assert!(bound.access_token.is_some());

    // Second login resolves the same account
    let again = harness.session.connect(FlowIntent::Login).await.unwrap();
    assert!(!again.newly_registered);
    assert_eq!(again.account_id, harness.bound_account(&address).await);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_double_connect_issues_single_signature_request() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Gated),
    )
    .await;

    let first = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_sign_requests(1).await;

    assert_matches!(
        harness.session.phase(),
        FlowPhase::AwaitingSignature {
            message: Some(_),
            ..
        }
    );
    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::AlreadyInProgress)
    );
    assert_eq!(harness.wallet.sign_requests(), 1);

    harness.wallet.release_signature();

    assert_matches!(first.await.unwrap(), Ok(_));
    assert_eq!(harness.wallet.sign_requests(), 1);
    assert_matches!(harness.session.phase(), FlowPhase::Bound(_));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_user_rejects_accounts() {
    for behavior in [AccountsBehavior::Reject, AccountsBehavior::Empty] {
        let harness =
            SessionHarness::logged_in(FakeWallet::new("alice-wallet").with_accounts(behavior))
                .await;

        assert_eq!(
            harness.session.connect(FlowIntent::Link).await,
            Err(FlowError::UserRejected)
        );
        assert_eq!(
            harness.session.phase(),
            FlowPhase::Failed(FlowError::UserRejected)
        );
        assert_eq!(harness.wallet.sign_requests(), 0);
    }
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_user_rejects_signature_revokes_challenge() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Reject),
    )
    .await;

    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::UserRejected)
    );
    assert_eq!(harness.pending_challenge().await, None);
    assert_eq!(harness.bound_account(&harness.wallet.address()).await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_accounts_request_times_out() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_accounts(AccountsBehavior::Hang),
    )
    .await;

    let expected = FlowError::Timeout {
        step: FlowStep::RequestingAccounts,
    };

    let started = tokio::time::Instant::now();
    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(expected.clone())
    );
    assert!(started.elapsed() >= DEFAULT_ACCOUNTS_TIMEOUT);
    assert_eq!(harness.session.phase(), FlowPhase::Failed(expected.clone()));

    // Guards were released, the retry runs again instead of being refused
    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(expected)
    );
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_signature_times_out() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Hang),
    )
    .await;

    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::Timeout {
            step: FlowStep::Signing
        })
    );
    assert_eq!(harness.pending_challenge().await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_cancel_while_awaiting_signature() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Gated),
    )
    .await;

    let flow = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_sign_requests(1).await;
    assert!(harness.pending_challenge().await.is_some());

    assert!(harness.session.cancel());
    assert!(!harness.session.cancel());
    assert_eq!(
        harness.session.phase(),
        FlowPhase::Failed(FlowError::Cancelled)
    );

    assert_eq!(flow.await.unwrap(), Err(FlowError::Cancelled));
    assert_eq!(harness.pending_challenge().await, None);
    assert_eq!(harness.bound_account(&harness.wallet.address()).await, None);

    // Immediately retryable
    harness.wallet.release_signature();
    assert_matches!(harness.session.connect(FlowIntent::Link).await, Ok(_));
    assert_eq!(harness.wallet.sign_requests(), 2);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_cancel_ignored_while_verifying() {
    let harness = SessionHarness::logged_in_with_verify(
        FakeWallet::new("alice-wallet"),
        VerifyBehavior::Gated,
    )
    .await;
    let address = harness.wallet.address();

    let flow = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_verify_requests(1).await;
    assert_eq!(
        harness.session.phase(),
        FlowPhase::Verifying {
            address: address.clone()
        }
    );

    assert!(!harness.session.cancel());
    assert_eq!(
        harness.session.phase(),
        FlowPhase::Verifying {
            address: address.clone()
        }
    );

    harness.backend.release_verification();
    let bound = flow.await.unwrap().unwrap();
    assert_eq!(bound.address, address);
    assert_eq!(harness.session.phase(), FlowPhase::Bound(bound));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_reset_while_verifying_discards_late_result() {
    let harness = SessionHarness::logged_in_with_verify(
        FakeWallet::new("alice-wallet"),
        VerifyBehavior::Gated,
    )
    .await;

    let flow = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_verify_requests(1).await;

    harness.session.reset();
    assert_eq!(harness.session.phase(), FlowPhase::Idle);

    harness.backend.release_verification();
    assert_eq!(flow.await.unwrap(), Err(FlowError::Cancelled));

    // The late success does not resurrect the abandoned flow, although the
    // server did bind the wallet
    assert_eq!(harness.session.phase(), FlowPhase::Idle);
    assert_eq!(
        harness.bound_account(&harness.wallet.address()).await,
        Some(AccountID::try_new("acc_00000001").unwrap())
    );
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_wallet_event_while_verifying_discards_late_result() {
    let harness = SessionHarness::logged_in_with_verify(
        FakeWallet::new("alice-wallet"),
        VerifyBehavior::Gated,
    )
    .await;

    let flow = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_verify_requests(1).await;

    let other = TestWallet::from_seed("other-wallet");
    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::AccountsChanged(vec![
                other.address().to_string()
            ])),
        WalletEventOutcome::Reset
    );

    harness.backend.release_verification();
    assert_eq!(flow.await.unwrap(), Err(FlowError::Cancelled));
    assert_eq!(harness.session.phase(), FlowPhase::Idle);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_verification_times_out() {
    let harness = SessionHarness::logged_in_with_verify(
        FakeWallet::new("alice-wallet"),
        VerifyBehavior::Hang,
    )
    .await;

    let expected = FlowError::Timeout {
        step: FlowStep::Verifying,
    };

    let started = tokio::time::Instant::now();
    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(expected.clone())
    );
    assert!(started.elapsed() >= DEFAULT_VERIFICATION_TIMEOUT);
    assert_eq!(harness.session.phase(), FlowPhase::Failed(expected));
    assert_eq!(harness.bound_account(&harness.wallet.address()).await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_no_wallet_detected() {
    let (_notifier, availability) = WalletAvailability::channel();
    let harness = SessionHarness::logged_in_with_availability(
        FakeWallet::new("alice-wallet"),
        availability,
    )
    .await;

    let res = harness.session.connect(FlowIntent::Link).await;

    assert_eq!(res, Err(FlowError::NoWalletDetected));
    assert!(!FlowError::NoWalletDetected.is_retryable());
    assert_eq!(harness.wallet.sign_requests(), 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_wallet_injected_late() {
    let (notifier, availability) = WalletAvailability::channel();
    let harness = SessionHarness::logged_in_with_availability(
        FakeWallet::new("alice-wallet"),
        availability,
    )
    .await;

    let flow = harness.spawn_connect(FlowIntent::Link);
    tokio::time::sleep(Duration::from_secs(2)).await;
    notifier.mark_available();

    assert_matches!(flow.await.unwrap(), Ok(_));
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_signature_from_other_key() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::SignWith(TestWallet::from_seed(
            "impostor",
        ))),
    )
    .await;

    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::AddressMismatch)
    );
    assert_eq!(harness.bound_account(&harness.wallet.address()).await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_garbage_signature() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Garbage),
    )
    .await;

    assert_matches!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::InvalidSignature(_))
    );
    assert_eq!(harness.pending_challenge().await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_link_requires_login() {
    let harness = SessionHarness::anonymous(FakeWallet::new("alice-wallet"));

    assert_eq!(
        harness.session.connect(FlowIntent::Link).await,
        Err(FlowError::Unauthorized)
    );
    assert_eq!(harness.wallet.sign_requests(), 0);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_wallet_owned_by_other_account() {
    let harness = SessionHarness::logged_in(FakeWallet::new("shared-wallet")).await;

    let account_repo = harness
        .catalog
        .get_one::<dyn AccountRepository>()
        .unwrap();
    let bob = Account::test("acc_00000002", "bob");
    account_repo.create_account(&bob).await.unwrap();

    harness
        .binding_repo
        .save_binding(&WalletBinding {
            address: harness.wallet.address(),
            account_id: bob.id.clone(),
            linked_at: Utc::now(),
            signature_proof: None,
        })
        .await
        .unwrap();

    let err = harness.session.connect(FlowIntent::Link).await.unwrap_err();

    assert_eq!(
        err,
        FlowError::AddressAlreadyBound {
            owner_hint: Some("bob".to_string())
        }
    );
    assert!(!err.is_retryable());
    assert_eq!(harness.wallet.sign_requests(), 0);
    assert_eq!(
        harness.bound_account(&harness.wallet.address()).await,
        Some(bob.id)
    );
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_account_change_while_bound() {
    let harness = SessionHarness::logged_in(FakeWallet::new("alice-wallet")).await;
    let address = harness.wallet.address();

    harness.session.connect(FlowIntent::Link).await.unwrap();

    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::AccountsChanged(vec![address.to_string()])),
        WalletEventOutcome::Unchanged
    );
    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::ChainChanged("0x89".to_string())),
        WalletEventOutcome::Unchanged
    );
    assert_matches!(harness.session.phase(), FlowPhase::Bound(_));

    let other = TestWallet::from_seed("other").address();
    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::AccountsChanged(vec![other.to_string()])),
        WalletEventOutcome::ReverifyRequired
    );
    assert_eq!(harness.session.phase(), FlowPhase::Idle);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_disconnect_while_bound() {
    let harness = SessionHarness::logged_in(FakeWallet::new("alice-wallet")).await;
    harness.session.connect(FlowIntent::Link).await.unwrap();

    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::AccountsChanged(Vec::new())),
        WalletEventOutcome::Disconnected
    );
    assert_eq!(harness.session.phase(), FlowPhase::Idle);

    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::Disconnected),
        WalletEventOutcome::Unchanged
    );
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_chain_change_abandons_flow() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_sign(SignBehavior::Gated),
    )
    .await;

    let flow = harness.spawn_connect(FlowIntent::Link);
    harness.wait_for_sign_requests(1).await;

    assert_eq!(
        harness
            .session
            .handle_wallet_event(&WalletEvent::ChainChanged("0x1".to_string())),
        WalletEventOutcome::Reset
    );

    assert_eq!(flow.await.unwrap(), Err(FlowError::Cancelled));
    // The abandoned flow does not overwrite the reset state
    assert_eq!(harness.session.phase(), FlowPhase::Idle);
    assert_eq!(harness.pending_challenge().await, None);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_reset_from_failed() {
    let harness = SessionHarness::logged_in(
        FakeWallet::new("alice-wallet").with_accounts(AccountsBehavior::Reject),
    )
    .await;

    harness.session.connect(FlowIntent::Link).await.unwrap_err();
    assert_matches!(harness.session.phase(), FlowPhase::Failed(_));

    harness.session.reset();
    assert_eq!(harness.session.phase(), FlowPhase::Idle);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
