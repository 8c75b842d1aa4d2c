// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::IpAddr;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, clap::Parser)]
#[command(name = "wallet-auth-server", version, about = "Wallet signature authentication service")]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, short, env = "WALLET_AUTH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: SubCommand,
}

#[derive(Debug, PartialEq, Eq, clap::Subcommand)]
pub enum SubCommand {
    /// Serve the HTTP API
    Run {
        /// Overrides `http.address` of the config
        #[arg(long)]
        address: Option<IpAddr>,

        /// Overrides `http.port` of the config
        #[arg(long)]
        port: Option<u16>,
    },

    /// Import wallet bindings from a legacy user-meta export (JSON array)
    MigrateLegacy {
        file: PathBuf,
    },

    /// Purge expired challenges and exit
    CleanupChallenges,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
