// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.


use std::sync::Arc;

use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time_source::SystemTimeSource;
use wallet_auth::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const WALLET_AUTH_JWT_ISSUER: &str = "dev.kamu.wallet-auth";
const WALLET_AUTH_JWT_ALGORITHM: Algorithm = Algorithm::HS384;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct AuthenticationServiceImpl {
    time_source: Arc<dyn SystemTimeSource>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: chrono::Duration,
}

#[dill::component(pub)]
#[dill::interface(dyn AuthenticationService)]
impl AuthenticationServiceImpl {
    pub fn new(
        config: Arc<JwtAuthenticationConfig>,
        time_source: Arc<dyn SystemTimeSource>,
    ) -> Self {
        Self {
            time_source,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_token_ttl: config.access_token_ttl,
        }
    }

    fn current_timestamp(&self) -> Result<usize, InternalError> {
        usize::try_from(self.time_source.now().timestamp()).int_err()
    }
}

impl AuthenticationService for AuthenticationServiceImpl {
    fn make_access_token(&self, account_id: &AccountID) -> Result<String, InternalError> {
        let iat = self.current_timestamp()?;
        let exp = iat + usize::try_from(self.access_token_ttl.num_seconds()).int_err()?;

        let claims = WalletAuthAccessTokenClaims {
            exp,
            iat,
            iss: String::from(WALLET_AUTH_JWT_ISSUER),
            sub: account_id.to_string(),
        };

        encode(
            &Header::new(WALLET_AUTH_JWT_ALGORITHM),
            &claims,
            &self.encoding_key,
        )
        .map_err(ErrorIntoInternal::int_err)
    }

    fn account_id_by_token(&self, access_token: &str) -> Result<AccountID, AccessTokenError> {
        let mut validation = Validation::new(WALLET_AUTH_JWT_ALGORITHM);
        validation.set_issuer(&[WALLET_AUTH_JWT_ISSUER]);
        // Expiry is judged against the injected clock below
        validation.validate_exp = false;

        let token_data =
            decode::<WalletAuthAccessTokenClaims>(access_token, &self.decoding_key, &validation)
                .map_err(|e| match *e.kind() {
                    ErrorKind::ExpiredSignature => AccessTokenError::Expired,
                    _ => AccessTokenError::Invalid(Box::new(e)),
                })?;

        let now = self
            .current_timestamp()
            .map_err(|e| AccessTokenError::Invalid(Box::new(e)))?;
        if token_data.claims.exp <= now {
            return Err(AccessTokenError::Expired);
        }

        AccountID::try_new(token_data.claims.sub)
            .map_err(|e| AccessTokenError::Invalid(Box::new(e)))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Serialize, Deserialize)]
struct WalletAuthAccessTokenClaims {
    exp: usize,
    iat: usize,
    iss: String,
    sub: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
