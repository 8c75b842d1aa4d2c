// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod account;
mod legacy_wallet_record;
mod nonce_challenge;
mod wallet_address;
mod wallet_binding;
mod wallet_session_id;
mod wallet_signature;

pub use account::*;
pub use legacy_wallet_record::*;
pub use nonce_challenge::*;
pub use wallet_address::*;
pub use wallet_binding::*;
pub use wallet_session_id::*;
pub use wallet_signature::*;
