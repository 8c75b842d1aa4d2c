// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Duration, TimeZone, Utc};
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2050, 1, 2, 3, 4, 5).unwrap()
}

pub fn make_test_account(id: &str, name: &str) -> Account {
    Account::test(id, name)
}

pub fn make_test_address(hex_digit: char) -> WalletAddress {
    WalletAddress::try_new(format!("0x{}", hex_digit.to_string().repeat(40))).unwrap()
}

pub fn make_test_binding(address: &WalletAddress, account_id: &AccountID) -> WalletBinding {
    WalletBinding {
        address: address.clone(),
        account_id: account_id.clone(),
        linked_at: test_time(),
        signature_proof: Some(WalletSignature::new(vec![0xab; 65])),
    }
}

pub fn make_test_challenge(
    session_id: WalletSessionId,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> NonceChallenge {
    let nonce = ChallengeNonce::new_random();

    NonceChallenge {
        session_id,
        message: format!("Sign this message\n\nNonce: {nonce}"),
        nonce,
        purpose: ChallengePurpose::Login,
        account_id: None,
        address: None,
        issued_at,
        expires_at: issued_at + ttl,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
