// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Raw signature bytes as produced by the wallet. Text form is `0x`-prefixed
/// hex. Length is not checked here: recovery rejects anything that is not a
/// 65-byte `r || s || v` signature.
#[derive(Clone, PartialEq, Eq, Hash, serde_with::SerializeDisplay, serde_with::DeserializeFromStr)]
pub struct WalletSignature(Vec<u8>);

impl WalletSignature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl std::fmt::Display for WalletSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl std::fmt::Debug for WalletSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletSignature({self})")
    }
}

impl std::str::FromStr for WalletSignature {
    type Err = ParseWalletSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if hex_part.is_empty() {
            return Err(ParseWalletSignatureError::Empty);
        }

        hex::decode(hex_part)
            .map(Self)
            .map_err(|e| ParseWalletSignatureError::NotHex(e.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWalletSignatureError {
    #[error("Signature is empty")]
    Empty,

    #[error("Signature is not valid hex: {0}")]
    NotHex(String),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
