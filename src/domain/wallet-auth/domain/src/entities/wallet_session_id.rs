// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use uuid::Uuid;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Identifies the client session that owns a pending challenge. At most one
/// live challenge exists per session id.
#[nutype::nutype(derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    FromStr,
    Serialize,
    Deserialize,
))]
pub struct WalletSessionId(Uuid);

impl WalletSessionId {
    pub fn new_generated() -> Self {
        Self::new(Uuid::new_v4())
    }
}
