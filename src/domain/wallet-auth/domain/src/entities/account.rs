// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use random_strings::{AllowedSymbols, get_random_string};
use regex::Regex;
use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static ACCOUNT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^acc_[a-z0-9]{8,64}$").unwrap());

static ACCOUNT_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9][a-zA-Z0-9_.-]{0,63}$").unwrap());

const ACCOUNT_ID_RANDOM_LENGTH: usize = 24;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[nutype::nutype(
    sanitize(trim),
    validate(regex = ACCOUNT_ID_REGEX),
    derive(
        AsRef,
        Clone,
        Debug,
        Display,
        Eq,
        PartialEq,
        Hash,
        Ord,
        PartialOrd,
        TryFrom,
        FromStr,
        Serialize,
        Deserialize,
    )
)]
pub struct AccountID(String);

impl AccountID {
    pub fn new_generated() -> Self {
        Self::try_new(get_random_string(
            Some("acc_"),
            ACCOUNT_ID_RANDOM_LENGTH,
            &AllowedSymbols::AsciiLowercaseAlphanumeric,
        ))
        .expect("Invalid account id generated")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[nutype::nutype(
    sanitize(trim),
    validate(regex = ACCOUNT_NAME_REGEX),
    derive(
        AsRef,
        Clone,
        Debug,
        Display,
        Eq,
        PartialEq,
        Hash,
        TryFrom,
        FromStr,
        Serialize,
        Deserialize,
    )
)]
pub struct AccountName(String);

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    User,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown account role: {s}")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountID,
    pub account_name: AccountName,
    pub display_name: String,
    pub role: AccountRole,
    pub registered_at: DateTime<Utc>,
}

#[cfg(any(feature = "testing", test))]
impl Account {
    pub fn test(id: &str, name: &str) -> Self {
        use chrono::TimeZone;

        Self {
            id: AccountID::try_new(id).unwrap(),
            account_name: AccountName::try_new(name).unwrap(),
            display_name: name.to_string(),
            role: AccountRole::User,
            registered_at: Utc.with_ymd_and_hms(2050, 1, 1, 12, 0, 0).unwrap(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
