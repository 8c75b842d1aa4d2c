// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use internal_error::InternalError;
use wallet_auth::ChallengeIssuer;

use super::Command;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct CleanupChallengesCommand {
    challenge_issuer: Arc<dyn ChallengeIssuer>,
}

impl CleanupChallengesCommand {
    pub fn new(challenge_issuer: Arc<dyn ChallengeIssuer>) -> Self {
        Self { challenge_issuer }
    }
}

#[async_trait::async_trait]
impl Command for CleanupChallengesCommand {
    async fn run(&self) -> Result<(), InternalError> {
        let removed = self.challenge_issuer.cleanup_expired_challenges().await?;
        println!("Removed {removed} expired challenge(s)");
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
