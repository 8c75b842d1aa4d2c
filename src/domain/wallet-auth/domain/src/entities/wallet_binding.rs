// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};

use crate::{AccountID, WalletAddress, WalletSignature};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Durable association between a wallet and an account. An address belongs
/// to at most one account and an account holds at most one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletBinding {
    pub address: WalletAddress,
    pub account_id: AccountID,
    pub linked_at: DateTime<Utc>,
    /// Signature that established the binding. Only bindings imported from
    /// legacy storage may lack one.
    pub signature_proof: Option<WalletSignature>,
}
