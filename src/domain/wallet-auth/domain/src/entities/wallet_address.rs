// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use regex::Regex;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static WALLET_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^0x[0-9a-f]{40}$").unwrap());

/// EVM account address in canonical form: `0x` followed by 40 lowercase hex
/// digits. Input is lowercased before validation, so mixed-case (checksummed)
/// spellings of the same address are equal after parsing.
#[nutype::nutype(
    sanitize(lowercase),
    validate(regex = WALLET_ADDRESS_REGEX),
    derive(
        AsRef,
        Clone,
        Debug,
        Display,
        Eq,
        PartialEq,
        Hash,
        Ord,
        PartialOrd,
        TryFrom,
        FromStr,
        Serialize,
        Deserialize,
    )
)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        Self::try_new(format!("0x{}", hex::encode(bytes)))
            .expect("20 bytes always encode into a valid address")
    }

    /// First 8 hex digits after the prefix
    pub fn short_hex(&self) -> &str {
        &self.as_ref()[2..10]
    }
}

/// Syntax check for a candidate address: `0x` + 40 hex digits, any case
pub fn validate_wallet_address(candidate: &str) -> bool {
    WalletAddress::try_new(candidate).is_ok()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
