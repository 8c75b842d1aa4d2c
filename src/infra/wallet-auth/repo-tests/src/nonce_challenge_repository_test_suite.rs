// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use dill::Catalog;
use wallet_auth::*;

use crate::{make_test_challenge, test_time};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_save_and_get_challenge(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();

    pretty_assertions::assert_eq!(
        Err(GetChallengeError::NotFound(ChallengeNotFoundError { session_id })),
        challenge_repo.get_challenge(&session_id).await
    );

    let challenge = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    challenge_repo.save_challenge(&challenge).await.unwrap();

    pretty_assertions::assert_eq!(
        Ok(challenge.clone()),
        challenge_repo.get_challenge(&session_id).await
    );

    // Reading does not consume
    pretty_assertions::assert_eq!(
        Ok(Some(challenge)),
        challenge_repo.try_get_challenge(&session_id).await.map_err(|e| e.reason())
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_newer_challenge_supersedes(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();
    let first = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    let second = make_test_challenge(session_id, test_time(), Duration::minutes(5));

    challenge_repo.save_challenge(&first).await.unwrap();
    challenge_repo.save_challenge(&second).await.unwrap();

    let stored = challenge_repo.get_challenge(&session_id).await.unwrap();
    pretty_assertions::assert_eq!(second.nonce, stored.nonce);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_take_challenge_once(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();
    let challenge = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    challenge_repo.save_challenge(&challenge).await.unwrap();

    let nonce = challenge.nonce.to_string();

    pretty_assertions::assert_eq!(
        Ok(Some(challenge)),
        challenge_repo.try_take_challenge(&session_id, &nonce).await.map_err(|e| e.reason())
    );
    assert_matches!(
        challenge_repo.try_take_challenge(&session_id, &nonce).await,
        Ok(None)
    );
    assert_matches!(challenge_repo.try_get_challenge(&session_id).await, Ok(None));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_take_challenge_with_stale_nonce(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();
    let first = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    let second = make_test_challenge(session_id, test_time(), Duration::minutes(5));

    challenge_repo.save_challenge(&first).await.unwrap();
    challenge_repo.save_challenge(&second).await.unwrap();

    // The superseded nonce leaves the live challenge alone
    assert_matches!(
        challenge_repo
            .try_take_challenge(&session_id, first.nonce.as_ref())
            .await,
        Ok(None)
    );
    pretty_assertions::assert_eq!(
        Ok(Some(second.clone())),
        challenge_repo.try_get_challenge(&session_id).await.map_err(|e| e.reason())
    );

    pretty_assertions::assert_eq!(
        Ok(Some(second.clone())),
        challenge_repo
            .try_take_challenge(&session_id, second.nonce.as_ref())
            .await.map_err(|e| e.reason())
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_concurrent_take_challenge(catalog: &Catalog) {
    let challenge_repo: Arc<dyn NonceChallengeRepository> =
        catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();
    let challenge = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    challenge_repo.save_challenge(&challenge).await.unwrap();

    let nonce = challenge.nonce.as_ref();
    let results = futures::future::join_all(
        (0..8).map(|_| challenge_repo.try_take_challenge(&session_id, nonce)),
    )
    .await;

    let taken = results
        .into_iter()
        .map(Result::unwrap)
        .filter(Option::is_some)
        .count();
    pretty_assertions::assert_eq!(1, taken);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_delete_challenge(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let session_id = WalletSessionId::new_generated();
    let challenge = make_test_challenge(session_id, test_time(), Duration::minutes(5));
    challenge_repo.save_challenge(&challenge).await.unwrap();

    assert_matches!(challenge_repo.delete_challenge(&session_id).await, Ok(true));
    assert_matches!(challenge_repo.delete_challenge(&session_id).await, Ok(false));
    assert_matches!(challenge_repo.try_get_challenge(&session_id).await, Ok(None));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub async fn test_cleanup_expired_challenges(catalog: &Catalog) {
    let challenge_repo = catalog.get_one::<dyn NonceChallengeRepository>().unwrap();

    let t0 = test_time();

    let short_lived = make_test_challenge(WalletSessionId::new_generated(), t0, Duration::minutes(1));
    let long_lived = make_test_challenge(WalletSessionId::new_generated(), t0, Duration::minutes(10));
    challenge_repo.save_challenge(&short_lived).await.unwrap();
    challenge_repo.save_challenge(&long_lived).await.unwrap();

    assert_matches!(
        challenge_repo.cleanup_expired_challenges(t0).await,
        Ok(0)
    );

    // Expiry is inclusive of the boundary
    assert_matches!(
        challenge_repo
            .cleanup_expired_challenges(t0 + Duration::minutes(1))
            .await,
        Ok(1)
    );

    assert_matches!(
        challenge_repo
            .try_get_challenge(&short_lived.session_id)
            .await,
        Ok(None)
    );
    assert_matches!(
        challenge_repo.try_get_challenge(&long_lived.session_id).await,
        Ok(Some(_))
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
