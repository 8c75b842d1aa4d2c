// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod auth_session;
mod backends;
mod flow_error;
mod wallet_availability;
mod wallet_provider;

pub use auth_session::*;
pub use backends::*;
pub use flow_error::*;
pub use wallet_availability::*;
pub use wallet_provider::*;
