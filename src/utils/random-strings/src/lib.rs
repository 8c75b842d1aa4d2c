// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use rand::Rng;
use rand::distributions::{Alphanumeric, DistString};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AllowedSymbols {
    /// `[A-Za-z0-9]`, roughly 5.95 bits of entropy per character
    Alphanumeric,
    /// `[a-z0-9]`, safe for identifiers that are later lowercased
    AsciiLowercaseAlphanumeric,
}

/// Produces a random string using the thread-local CSPRNG (`ChaCha`-based and
/// periodically reseeded from the OS)
pub fn get_random_string(prefix: Option<&str>, length: usize, symbols: &AllowedSymbols) -> String {
    let mut rng = rand::thread_rng();
    let mut result = String::with_capacity(prefix.map_or(0, str::len) + length);

    if let Some(prefix) = prefix {
        result.push_str(prefix);
    }

    match symbols {
        AllowedSymbols::Alphanumeric => Alphanumeric.append_string(&mut rng, &mut result, length),
        AllowedSymbols::AsciiLowercaseAlphanumeric => {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            result.extend(
                (0..length).map(|_| char::from(CHARSET[rng.gen_range(0..CHARSET.len())])),
            );
        }
    }

    result
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
