// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::{LogFormat, LoggingConfig};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Keeps the non-blocking writer flushing until dropped
#[must_use]
#[derive(Default)]
pub struct Guards {
    pub appender: Option<WorkerGuard>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Installs the global subscriber. Returns empty guards when a subscriber is
/// already set (e.g. under `test-log`).
pub fn init(cfg: &LoggingConfig) -> Guards {
    if tracing::dispatcher::has_been_set() {
        return Guards::default();
    }

    // Use configuration from RUST_LOG env var if provided
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(&cfg.filter),
    };

    let (writer, appender_guard) = tracing_appender::non_blocking(std::io::stderr());

    let res = match cfg.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(env_filter)
            .with_writer(writer)
            .try_init(),
    };

    if let Err(err) = res {
        eprintln!("Failed to install tracing subscriber: {err}");
        return Guards::default();
    }

    tracing::info!(service_name = %cfg.service_name, format = ?cfg.format, "Logging initialized");

    Guards {
        appender: Some(appender_guard),
    }
}
