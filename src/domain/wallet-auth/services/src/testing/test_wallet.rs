// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::{eip191_hash_message, keccak256};
use k256::ecdsa::SigningKey;
use wallet_auth::{WalletAddress, WalletSignature};

use crate::address_of;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A software wallet producing `personal_sign` signatures, for tests
#[derive(Clone)]
pub struct TestWallet {
    signing_key: SigningKey,
}

impl TestWallet {
    /// Deterministic key derived from a seed phrase
    pub fn from_seed(seed: &str) -> Self {
        let secret = keccak256(seed.as_bytes());
        Self {
            signing_key: SigningKey::from_slice(secret.as_slice()).unwrap(),
        }
    }

    pub fn from_private_key_hex(private_key: &str) -> Self {
        let bytes = alloy_primitives::hex::decode(private_key).unwrap();
        Self {
            signing_key: SigningKey::from_slice(&bytes).unwrap(),
        }
    }

    pub fn address(&self) -> WalletAddress {
        address_of(self.signing_key.verifying_key())
    }

    /// 65 bytes `r || s || v` with `v` in 27/28
    pub fn sign_message(&self, message: &str) -> WalletSignature {
        let prehash = eip191_hash_message(message);

        let (sig, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(prehash.as_slice())
            .unwrap();

        let mut bytes = sig.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);

        WalletSignature::new(bytes)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
