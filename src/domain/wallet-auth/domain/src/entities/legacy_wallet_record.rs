// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::AccountID;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Per-account wallet metadata exported from the legacy user-meta storage,
/// where the same binding was historically kept under two different keys.
/// Field names follow the legacy keys.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyWalletRecord {
    pub account_id: AccountID,

    /// Written by the original login-by-wallet flow
    #[serde(default)]
    pub metamask_wallet_address: Option<String>,

    /// Written by the later account linking flow
    #[serde(default)]
    pub connected_wallet_address: Option<String>,

    /// Unix seconds, stored either as a number or as a string
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub wallet_connection_timestamp: Option<i64>,

    #[serde(default)]
    pub wallet_connection_signature: Option<String>,
}

impl LegacyWalletRecord {
    /// The linking key wins when both are present: it is the newer of the two
    /// and is the one the legacy unlink action cleared
    pub fn effective_address(&self) -> Option<&str> {
        [
            self.connected_wallet_address.as_deref(),
            self.metamask_wallet_address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
