// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, SecondsFormat, Utc};
use wallet_auth::{AccountName, ChallengeNonce, WalletAddress};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Text shown in the wallet's signing prompt for login-by-wallet
pub fn login_challenge_message(
    app_name: &str,
    nonce: &ChallengeNonce,
    issued_at: DateTime<Utc>,
    claimed_address: Option<&WalletAddress>,
) -> String {
    let mut message = format!(
        "Sign this message to authenticate with {app_name}.\n\nNonce: {nonce}\nIssued At: {}",
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    if let Some(address) = claimed_address {
        message.push_str("\nWallet: ");
        message.push_str(address.as_ref());
    }

    message
}

/// Text shown in the wallet's signing prompt when linking to an account
pub fn link_challenge_message(
    app_name: &str,
    address: &WalletAddress,
    account_name: &AccountName,
    nonce: &ChallengeNonce,
    issued_at: DateTime<Utc>,
) -> String {
    format!(
        "I confirm that I am linking this wallet ({address}) to my {app_name} account ({account_name}).\nTimestamp: {}\nNonce: {nonce}",
        issued_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
