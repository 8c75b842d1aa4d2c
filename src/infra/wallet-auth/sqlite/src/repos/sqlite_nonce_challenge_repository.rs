// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use internal_error::{InternalError, ResultIntoInternal};
use sqlx::SqlitePool;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteNonceChallengeRepository {
    pool: Arc<SqlitePool>,
}

#[dill::component(pub)]
#[dill::interface(dyn NonceChallengeRepository)]
impl SqliteNonceChallengeRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct NonceChallengeRowModel {
    session_id: String,
    nonce: String,
    purpose: String,
    account_id: Option<String>,
    address: Option<String>,
    message: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl TryFrom<NonceChallengeRowModel> for NonceChallenge {
    type Error = InternalError;

    fn try_from(row: NonceChallengeRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: WalletSessionId::new(row.session_id.parse::<uuid::Uuid>().int_err()?),
            nonce: ChallengeNonce::try_new(row.nonce).int_err()?,
            purpose: row.purpose.parse::<ChallengePurpose>().int_err()?,
            account_id: row.account_id.map(AccountID::try_new).transpose().int_err()?,
            address: row.address.map(WalletAddress::try_new).transpose().int_err()?,
            message: row.message,
            issued_at: row.issued_at,
            expires_at: row.expires_at,
        })
    }
}

fn not_found(session_id: &WalletSessionId) -> GetChallengeError {
    GetChallengeError::NotFound(ChallengeNotFoundError {
        session_id: *session_id,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl NonceChallengeRepository for SqliteNonceChallengeRepository {
    async fn save_challenge(&self, challenge: &NonceChallenge) -> Result<(), SaveChallengeError> {
        sqlx::query(
            r#"
            INSERT INTO nonce_challenges (session_id, nonce, purpose, account_id, address, message, issued_at, expires_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (session_id) DO UPDATE
                SET nonce      = excluded.nonce,
                    purpose    = excluded.purpose,
                    account_id = excluded.account_id,
                    address    = excluded.address,
                    message    = excluded.message,
                    issued_at  = excluded.issued_at,
                    expires_at = excluded.expires_at
            "#,
        )
        .bind(challenge.session_id.to_string())
        .bind(challenge.nonce.as_ref())
        .bind(challenge.purpose.as_str())
        .bind(challenge.account_id.as_ref().map(AsRef::<str>::as_ref))
        .bind(challenge.address.as_ref().map(AsRef::<str>::as_ref))
        .bind(&challenge.message)
        .bind(challenge.issued_at)
        .bind(challenge.expires_at)
        .execute(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(())
    }

    async fn get_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<NonceChallenge, GetChallengeError> {
        let maybe_row = sqlx::query_as::<_, NonceChallengeRowModel>(
            r#"
            SELECT session_id, nonce, purpose, account_id, address, message, issued_at, expires_at
            FROM nonce_challenges
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.to_string())
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(not_found(session_id)),
        }
    }

    async fn take_challenge(
        &self,
        session_id: &WalletSessionId,
        nonce: &str,
    ) -> Result<NonceChallenge, GetChallengeError> {
        // A single statement, so two takers can never both see the row
        let maybe_row = sqlx::query_as::<_, NonceChallengeRowModel>(
            r#"
            DELETE
            FROM nonce_challenges
            WHERE session_id = $1 AND nonce = $2
            RETURNING session_id, nonce, purpose, account_id, address, message, issued_at, expires_at
            "#,
        )
        .bind(session_id.to_string())
        .bind(nonce)
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(not_found(session_id)),
        }
    }

    async fn delete_challenge(
        &self,
        session_id: &WalletSessionId,
    ) -> Result<bool, DeleteChallengeError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM nonce_challenges
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.to_string())
        .execute(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(delete_result.rows_affected() > 0)
    }

    async fn cleanup_expired_challenges(
        &self,
        now: DateTime<Utc>,
    ) -> Result<usize, CleanupExpiredChallengesError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM nonce_challenges
            WHERE expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(usize::try_from(delete_result.rows_affected()).int_err()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
