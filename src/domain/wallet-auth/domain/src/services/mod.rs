// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod authentication_service;
mod challenge_issuer;
mod errors;
mod legacy_binding_migrator;
mod signature_verifier;
mod wallet_auth_service;

pub use authentication_service::*;
pub use challenge_issuer::*;
pub use errors::*;
pub use legacy_binding_migrator::*;
pub use signature_verifier::*;
pub use wallet_auth_service::*;
