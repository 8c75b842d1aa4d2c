// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod authentication_service_impl;
mod challenge_issuer_impl;
mod challenge_messages;
mod dependencies;
mod eip191_signature_verifier;
mod legacy_binding_migrator_impl;
mod owner_hint;
mod wallet_auth_service_impl;

#[cfg(any(feature = "testing", test))]
pub mod testing;

pub use authentication_service_impl::*;
pub use challenge_issuer_impl::*;
pub use challenge_messages::*;
pub use dependencies::*;
pub use eip191_signature_verifier::*;
pub use legacy_binding_migrator_impl::*;
pub use wallet_auth_service_impl::*;
