// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod binding_handlers;
mod challenge_handlers;
mod login_handler;
mod verify_handler;

pub use binding_handlers::*;
pub use challenge_handlers::*;
pub use login_handler::*;
pub use verify_handler::*;
