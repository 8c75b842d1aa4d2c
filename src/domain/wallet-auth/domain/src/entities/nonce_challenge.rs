// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use random_strings::{AllowedSymbols, get_random_string};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{AccountID, WalletAddress, WalletSessionId};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// 32 alphanumeric characters, ~190 bits of entropy
pub const CHALLENGE_NONCE_LENGTH: usize = 32;

static CHALLENGE_NONCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z0-9]{16,128}$").unwrap());

#[nutype::nutype(
    sanitize(trim),
    validate(regex = CHALLENGE_NONCE_REGEX),
    derive(AsRef, Clone, Debug, Display, Eq, PartialEq, TryFrom, Serialize, Deserialize)
)]
pub struct ChallengeNonce(String);

impl ChallengeNonce {
    pub fn new_random() -> Self {
        Self::try_new(get_random_string(
            None,
            CHALLENGE_NONCE_LENGTH,
            &AllowedSymbols::Alphanumeric,
        ))
        .expect("Invalid nonce generated")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengePurpose {
    /// Wallet-as-identity: authenticate (or register) by signature
    Login,
    /// Attach a wallet to an already authenticated account
    Link,
}

impl ChallengePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Link => "link",
        }
    }
}

impl std::str::FromStr for ChallengePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "link" => Ok(Self::Link),
            _ => Err(format!("Unknown challenge purpose: {s}")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A pending challenge. Lives in the session store until consumed by a
/// verification attempt, superseded by a newer challenge for the same
/// session, revoked, or purged after `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceChallenge {
    pub session_id: WalletSessionId,
    pub nonce: ChallengeNonce,
    pub purpose: ChallengePurpose,
    /// Requesting identity, absent for login-by-wallet
    pub account_id: Option<AccountID>,
    /// Address the challenge was issued for, if one was claimed up front
    pub address: Option<WalletAddress>,
    pub message: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NonceChallenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
