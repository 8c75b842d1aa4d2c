// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

// Re-exports
pub use wallet_auth as domain;

mod repos;

pub use repos::*;

/// Schema of all the wallet authentication tables
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
