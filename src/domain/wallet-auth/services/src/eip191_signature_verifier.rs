// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use alloy_primitives::{eip191_hash_message, keccak256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use wallet_auth::{
    InvalidSignatureError,
    RecoverAddressError,
    SignatureVerifier,
    WalletAddress,
    WalletSignature,
};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const ETH_SIGNATURE_LENGTH: usize = 65;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Recovers the signer of an EIP-191 `personal_sign` message:
/// `keccak256("\x19Ethereum Signed Message:\n" + len(message) + message)`
/// signed as 65 bytes `r || s || v`, `v` being 0/1 or 27/28.
///
/// High-s signatures are rejected, as they are malleable twins of a valid
/// low-s signature and no compliant wallet produces them.
pub struct Eip191SignatureVerifier {}

#[dill::component(pub)]
#[dill::interface(dyn SignatureVerifier)]
impl Eip191SignatureVerifier {
    pub fn new() -> Self {
        Self {}
    }
}

impl SignatureVerifier for Eip191SignatureVerifier {
    fn recover_address(
        &self,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<WalletAddress, RecoverAddressError> {
        if message.is_empty() {
            return Err(InvalidSignatureError::new("message is empty").into());
        }

        let bytes = signature.as_bytes();
        if bytes.len() != ETH_SIGNATURE_LENGTH {
            return Err(InvalidSignatureError::new(format!(
                "expected {ETH_SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            ))
            .into());
        }

        let v = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            v => {
                return Err(
                    InvalidSignatureError::new(format!("unsupported recovery id: {v}")).into(),
                );
            }
        };
        let recovery_id = RecoveryId::from_byte(v)
            .ok_or_else(|| InvalidSignatureError::new(format!("invalid recovery id: {v}")))?;

        let sig = Signature::from_slice(&bytes[..64])
            .map_err(|e| InvalidSignatureError::new(format!("malformed r/s: {e}")))?;

        if sig.normalize_s().is_some() {
            return Err(InvalidSignatureError::new("non-canonical (high-s) signature").into());
        }

        let prehash = eip191_hash_message(message);

        let verifying_key = VerifyingKey::recover_from_prehash(prehash.as_slice(), &sig, recovery_id)
            .map_err(|e| InvalidSignatureError::new(format!("recovery failed: {e}")))?;

        Ok(address_of(&verifying_key))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Last 20 bytes of `keccak256` over the uncompressed public key (sans the
/// `0x04` tag)
pub fn address_of(verifying_key: &VerifyingKey) -> WalletAddress {
    let point = verifying_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);

    WalletAddress::from_bytes(&address)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
