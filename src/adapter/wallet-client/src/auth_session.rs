// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use wallet_auth::{AccountID, AccountName, WalletAddress, WalletProof, WalletSignature};

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const DEFAULT_DETECTION_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ACCOUNTS_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SIGNATURE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_VERIFICATION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSessionConfig {
    /// How long to wait for the wallet provider to show up
    pub detection_timeout: Duration,
    pub accounts_timeout: Duration,
    /// The user has to read and approve the message
    pub signature_timeout: Duration,
    /// Bounds each server round-trip
    pub verification_timeout: Duration,
}

impl Default for AuthSessionConfig {
    fn default() -> Self {
        Self {
            detection_timeout: DEFAULT_DETECTION_TIMEOUT,
            accounts_timeout: DEFAULT_ACCOUNTS_TIMEOUT,
            signature_timeout: DEFAULT_SIGNATURE_TIMEOUT,
            verification_timeout: DEFAULT_VERIFICATION_TIMEOUT,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    AwaitingAccounts,
    /// `message` is set once the challenge has been issued
    AwaitingSignature {
        address: WalletAddress,
        message: Option<String>,
    },
    Verifying {
        address: WalletAddress,
    },
    Bound(BoundWallet),
    Failed(FlowError),
}

impl FlowPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Self::AwaitingAccounts | Self::AwaitingSignature { .. } | Self::Verifying { .. }
        )
    }

    fn flow_address(&self) -> Option<&WalletAddress> {
        match self {
            Self::AwaitingSignature { address, .. } | Self::Verifying { address } => Some(address),
            Self::Bound(bound) => Some(&bound.address),
            Self::Idle | Self::AwaitingAccounts | Self::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundWallet {
    pub address: WalletAddress,
    pub account_id: Option<AccountID>,
    /// Known for login flows only
    pub account_name: Option<AccountName>,
    pub newly_registered: bool,
    /// Issued by login flows only
    pub access_token: Option<String>,
}

/// What the caller has to do after a provider notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEventOutcome {
    Unchanged,
    /// An in-flight flow was abandoned
    Reset,
    /// The wallet switched to a different account while bound
    ReverifyRequired,
    Disconnected,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// One client's wallet session. Runs at most one flow at a time:
///
/// ```text
/// Idle -> AwaitingAccounts -> AwaitingSignature -> Verifying -> Bound
///                 \                  \                \
///                  +------------------+----------------+--> Failed(e)
/// ```
///
/// `Bound` and `Failed` accept a new `connect`. Guard state lives in one
/// place and is cleared by every terminal transition, `cancel` and `reset`.
pub struct AuthSession {
    provider: Arc<dyn WalletProvider>,
    availability: WalletAvailability,
    backend: Arc<dyn WalletAuthBackend>,
    context: FlowContext,
    config: AuthSessionConfig,
    state: Mutex<SessionState>,
}

struct SessionState {
    phase: FlowPhase,
    /// Bumped whenever a flow starts or is reset, so stale results are dropped
    epoch: u64,
    /// Epoch at which the most recent flow started
    latest_flow: u64,
    cancel_token: Option<CancellationToken>,
}

struct ActiveFlow {
    epoch: u64,
    intent: FlowIntent,
    cancel_token: CancellationToken,
}

impl AuthSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        availability: WalletAvailability,
        backend: Arc<dyn WalletAuthBackend>,
        context: FlowContext,
        config: AuthSessionConfig,
    ) -> Self {
        Self {
            provider,
            availability,
            backend,
            context,
            config,
            state: Mutex::new(SessionState {
                phase: FlowPhase::Idle,
                epoch: 0,
                latest_flow: 0,
                cancel_token: None,
            }),
        }
    }

    pub fn context(&self) -> &FlowContext {
        &self.context
    }

    pub fn phase(&self) -> FlowPhase {
        self.state.lock().unwrap().phase.clone()
    }

    /// Runs a complete flow. While another flow is in flight the call is
    /// rejected with [`FlowError::AlreadyInProgress`] and leaves it untouched.
    #[tracing::instrument(level = "debug", skip_all, fields(session_id = %self.context.session_id, ?intent))]
    pub async fn connect(&self, intent: FlowIntent) -> Result<BoundWallet, FlowError> {
        let flow = self.begin_flow(intent)?;
        let result = self.run_flow(&flow).await;
        self.finish_flow(&flow, result)
    }

    /// Aborts the flow unless its proof was already dispatched for
    /// verification. Returns whether anything was cancelled.
    pub fn cancel(&self) -> bool {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;

        match state.phase {
            FlowPhase::AwaitingAccounts | FlowPhase::AwaitingSignature { .. } => {
                if let Some(cancel_token) = state.cancel_token.take() {
                    cancel_token.cancel();
                }
                state.phase = FlowPhase::Failed(FlowError::Cancelled);

                tracing::info!(session_id = %self.context.session_id, "Wallet flow cancelled");
                true
            }
            FlowPhase::Verifying { .. } => {
                tracing::debug!("Verification already dispatched, cancel ignored");
                false
            }
            FlowPhase::Idle | FlowPhase::Bound(_) | FlowPhase::Failed(_) => false,
        }
    }

    /// Back to `Idle` from any phase. Results of an abandoned flow are
    /// discarded when they arrive.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        Self::reset_locked(&mut state);
    }

    /// Re-derives the session state after a provider notification
    pub fn handle_wallet_event(&self, event: &WalletEvent) -> WalletEventOutcome {
        let mut state = self.state.lock().unwrap();

        let outcome = match event {
            WalletEvent::Disconnected => match state.phase {
                FlowPhase::Idle => WalletEventOutcome::Unchanged,
                _ => WalletEventOutcome::Disconnected,
            },
            WalletEvent::AccountsChanged(accounts) => {
                let current = accounts
                    .first()
                    .and_then(|a| WalletAddress::try_new(a.as_str()).ok());

                match (&state.phase, current) {
                    (FlowPhase::Bound(_), None) => WalletEventOutcome::Disconnected,
                    (FlowPhase::Bound(bound), Some(current)) if bound.address == current => {
                        WalletEventOutcome::Unchanged
                    }
                    (FlowPhase::Bound(_), Some(_)) => WalletEventOutcome::ReverifyRequired,
                    (phase, current) if phase.is_in_flight() => {
                        match (phase.flow_address(), current) {
                            // Accounts are still being requested
                            (None, _) => WalletEventOutcome::Unchanged,
                            (Some(address), Some(current)) if *address == current => {
                                WalletEventOutcome::Unchanged
                            }
                            _ => WalletEventOutcome::Reset,
                        }
                    }
                    _ => WalletEventOutcome::Unchanged,
                }
            }
            // Signatures are chain-agnostic, only an in-flight flow is dropped
            WalletEvent::ChainChanged(_) if state.phase.is_in_flight() => WalletEventOutcome::Reset,
            WalletEvent::ChainChanged(_) => WalletEventOutcome::Unchanged,
        };

        if outcome != WalletEventOutcome::Unchanged {
            Self::reset_locked(&mut state);
        }

        tracing::debug!(?event, ?outcome, "Wallet event handled");
        outcome
    }

    fn reset_locked(state: &mut SessionState) {
        state.epoch += 1;
        if let Some(cancel_token) = state.cancel_token.take() {
            cancel_token.cancel();
        }
        state.phase = FlowPhase::Idle;
    }

    fn begin_flow(&self, intent: FlowIntent) -> Result<ActiveFlow, FlowError> {
        let mut state = self.state.lock().unwrap();

        if state.phase.is_in_flight() {
            tracing::debug!(phase = ?state.phase, "Connect ignored, a flow is in progress");
            return Err(FlowError::AlreadyInProgress);
        }

        let cancel_token = CancellationToken::new();

        state.epoch += 1;
        state.latest_flow = state.epoch;
        state.cancel_token = Some(cancel_token.clone());
        state.phase = FlowPhase::AwaitingAccounts;

        Ok(ActiveFlow {
            epoch: state.epoch,
            intent,
            cancel_token,
        })
    }

    /// Moves the flow forward unless it was cancelled or superseded
    fn advance(&self, flow: &ActiveFlow, phase: FlowPhase) -> Result<(), FlowError> {
        let mut state = self.state.lock().unwrap();

        if state.epoch != flow.epoch || flow.cancel_token.is_cancelled() {
            return Err(FlowError::Cancelled);
        }

        state.phase = phase;
        Ok(())
    }

    fn finish_flow(
        &self,
        flow: &ActiveFlow,
        result: Result<BoundWallet, FlowError>,
    ) -> Result<BoundWallet, FlowError> {
        let mut state = self.state.lock().unwrap();

        if state.epoch != flow.epoch {
            tracing::debug!(succeeded = result.is_ok(), "Discarding result of an abandoned flow");
            return Err(FlowError::Cancelled);
        }

        state.cancel_token = None;
        state.phase = match &result {
            Ok(bound) => {
                tracing::info!(
                    address = %bound.address,
                    account_id = ?bound.account_id,
                    newly_registered = bound.newly_registered,
                    "Wallet flow completed"
                );
                FlowPhase::Bound(bound.clone())
            }
            Err(e) => {
                tracing::info!(error = %e, error_class = ?e.class(), "Wallet flow failed");
                FlowPhase::Failed(e.clone())
            }
        };

        result
    }

    async fn run_flow(&self, flow: &ActiveFlow) -> Result<BoundWallet, FlowError> {
        self.cancellable(flow, self.availability.wait(self.config.detection_timeout))
            .await?;

        let address = self
            .bounded(
                flow,
                FlowStep::RequestingAccounts,
                self.config.accounts_timeout,
                self.request_address(),
            )
            .await?;

        self.advance(
            flow,
            FlowPhase::AwaitingSignature {
                address: address.clone(),
                message: None,
            },
        )?;

        let ticket = match self
            .bounded(
                flow,
                FlowStep::IssuingChallenge,
                self.config.verification_timeout,
                self.backend.issue_challenge(&self.context, flow.intent, &address),
            )
            .await
        {
            Ok(ticket) => ticket,
            Err(e @ (FlowError::Cancelled | FlowError::Timeout { .. })) => {
                // The challenge may still have been stored server-side
                self.revoke_abandoned_challenge(flow).await;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let signature = match self.collect_signature(flow, &address, &ticket).await {
            Ok(signature) => signature,
            Err(e) => {
                self.revoke_abandoned_challenge(flow).await;
                return Err(e);
            }
        };

        // Past this point the flow can only be reset, not cancelled
        self.advance(
            flow,
            FlowPhase::Verifying {
                address: address.clone(),
            },
        )?;

        let proof = WalletProof {
            address: address.clone(),
            signature,
            nonce: ticket.nonce,
            message: ticket.message,
        };

        let success = tokio::time::timeout(
            self.config.verification_timeout,
            self.backend.verify(&self.context, flow.intent, proof),
        )
        .await
        .unwrap_or(Err(FlowError::Timeout {
            step: FlowStep::Verifying,
        }))?;

        if *success.address() != address {
            return Err(FlowError::AddressMismatch);
        }

        Ok(match success {
            FlowSuccess::Linked { address } => BoundWallet {
                address,
                account_id: self.context.account_id().cloned(),
                account_name: None,
                newly_registered: false,
                access_token: None,
            },
            FlowSuccess::LoggedIn {
                account_id,
                account_name,
                address,
                newly_registered,
                access_token,
            } => BoundWallet {
                address,
                account_id: Some(account_id),
                account_name: Some(account_name),
                newly_registered,
                access_token: Some(access_token),
            },
        })
    }

    async fn request_address(&self) -> Result<WalletAddress, FlowError> {
        let mut accounts = self
            .provider
            .get_accounts()
            .await
            .map_err(provider_error)?;

        if accounts.is_empty() {
            accounts = self
                .provider
                .request_accounts()
                .await
                .map_err(provider_error)?;
        }

        let Some(first) = accounts.first() else {
            return Err(FlowError::UserRejected);
        };

        WalletAddress::try_new(first.as_str()).map_err(|_| FlowError::InvalidAddress(first.clone()))
    }

    async fn collect_signature(
        &self,
        flow: &ActiveFlow,
        address: &WalletAddress,
        ticket: &ChallengeTicket,
    ) -> Result<WalletSignature, FlowError> {
        self.advance(
            flow,
            FlowPhase::AwaitingSignature {
                address: address.clone(),
                message: Some(ticket.message.clone()),
            },
        )?;

        let raw_signature = self
            .bounded(
                flow,
                FlowStep::Signing,
                self.config.signature_timeout,
                async {
                    self.provider
                        .sign_message(address, &ticket.message)
                        .await
                        .map_err(provider_error)
                },
            )
            .await?;

        raw_signature
            .parse::<WalletSignature>()
            .map_err(|e| FlowError::InvalidSignature(e.to_string()))
    }

    async fn revoke_abandoned_challenge(&self, flow: &ActiveFlow) {
        // A newer flow of this session owns the pending challenge by now
        let is_latest = self.state.lock().unwrap().latest_flow == flow.epoch;
        if !is_latest {
            return;
        }

        if let Err(e) = self.backend.revoke_challenge(&self.context).await {
            tracing::warn!(error = %e, "Failed to revoke abandoned challenge");
        }
    }

    async fn cancellable<T, F>(&self, flow: &ActiveFlow, fut: F) -> Result<T, FlowError>
    where
        F: Future<Output = Result<T, FlowError>>,
    {
        tokio::select! {
            biased;
            () = flow.cancel_token.cancelled() => Err(FlowError::Cancelled),
            res = fut => res,
        }
    }

    async fn bounded<T, F>(
        &self,
        flow: &ActiveFlow,
        step: FlowStep,
        limit: Duration,
        fut: F,
    ) -> Result<T, FlowError>
    where
        F: Future<Output = Result<T, FlowError>>,
    {
        self.cancellable(flow, async {
            tokio::time::timeout(limit, fut).await.unwrap_or_else(|_| {
                tracing::warn!(%step, ?limit, "Wallet flow step timed out");
                Err(FlowError::Timeout { step })
            })
        })
        .await
    }
}

fn provider_error(e: WalletProviderError) -> FlowError {
    match e {
        WalletProviderError::UserRejected => FlowError::UserRejected,
        WalletProviderError::Other(message) => FlowError::Wallet(message),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
