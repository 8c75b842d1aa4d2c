// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod account_repository_test_suite;
mod helpers;
mod nonce_challenge_repository_test_suite;
mod wallet_binding_repository_test_suite;

pub use account_repository_test_suite::*;
pub use helpers::*;
pub use nonce_challenge_repository_test_suite::*;
pub use wallet_binding_repository_test_suite::*;
