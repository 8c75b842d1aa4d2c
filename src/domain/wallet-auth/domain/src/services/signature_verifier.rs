// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use internal_error::InternalError;
use thiserror::Error;

use crate::{InvalidSignatureError, WalletAddress, WalletSignature};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Pure recovery of the signer's address. Comparing the result against the
/// claimed address is the caller's job.
pub trait SignatureVerifier: Send + Sync {
    fn recover_address(
        &self,
        message: &str,
        signature: &WalletSignature,
    ) -> Result<WalletAddress, RecoverAddressError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum RecoverAddressError {
    #[error(transparent)]
    InvalidSignature(#[from] InvalidSignatureError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PartialEq for RecoverAddressError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidSignature(a), Self::InvalidSignature(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a.reason().eq(&b.reason()),
            (_, _) => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
