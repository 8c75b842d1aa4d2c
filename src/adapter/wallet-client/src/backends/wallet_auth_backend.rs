// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use wallet_auth::{AccountID, AccountName, WalletAddress, WalletProof, WalletSessionId};

use crate::FlowError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Server side of a flow as seen by the client
#[async_trait::async_trait]
pub trait WalletAuthBackend: Send + Sync {
    async fn issue_challenge(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        address: &WalletAddress,
    ) -> Result<ChallengeTicket, FlowError>;

    async fn revoke_challenge(&self, context: &FlowContext) -> Result<(), FlowError>;

    async fn verify(
        &self,
        context: &FlowContext,
        intent: FlowIntent,
        proof: WalletProof,
    ) -> Result<FlowSuccess, FlowError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowIntent {
    /// Sign in with the wallet as the identity
    Login,
    /// Attach the wallet to the account the client is logged into
    Link,
}

/// Who runs the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowContext {
    pub session_id: WalletSessionId,
    pub credentials: Option<AccountCredentials>,
}

impl FlowContext {
    pub fn anonymous() -> Self {
        Self {
            session_id: WalletSessionId::new_generated(),
            credentials: None,
        }
    }

    pub fn for_account(credentials: AccountCredentials) -> Self {
        Self {
            session_id: WalletSessionId::new_generated(),
            credentials: Some(credentials),
        }
    }

    pub fn account_id(&self) -> Option<&AccountID> {
        self.credentials.as_ref().map(|c| &c.account_id)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.access_token.as_str())
    }
}

/// The account a client is logged into and the bearer token the server
/// issued for it
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    pub account_id: AccountID,
    pub access_token: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeTicket {
    pub nonce: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowSuccess {
    Linked {
        address: WalletAddress,
    },
    LoggedIn {
        account_id: AccountID,
        account_name: AccountName,
        address: WalletAddress,
        newly_registered: bool,
        access_token: String,
    },
}

impl FlowSuccess {
    pub fn address(&self) -> &WalletAddress {
        match self {
            Self::Linked { address } | Self::LoggedIn { address, .. } => address,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
