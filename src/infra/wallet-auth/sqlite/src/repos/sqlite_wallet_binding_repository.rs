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

pub struct SqliteWalletBindingRepository {
    pool: Arc<SqlitePool>,
}

#[dill::component(pub)]
#[dill::interface(dyn WalletBindingRepository)]
impl SqliteWalletBindingRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct WalletBindingRowModel {
    address: String,
    account_id: String,
    linked_at: DateTime<Utc>,
    signature_proof: Option<String>,
}

impl TryFrom<WalletBindingRowModel> for WalletBinding {
    type Error = InternalError;

    fn try_from(row: WalletBindingRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            address: WalletAddress::try_new(row.address).int_err()?,
            account_id: AccountID::try_new(row.account_id).int_err()?,
            linked_at: row.linked_at,
            signature_proof: row
                .signature_proof
                .map(|s| s.parse::<WalletSignature>())
                .transpose()
                .int_err()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl WalletBindingRepository for SqliteWalletBindingRepository {
    async fn save_binding(&self, binding: &WalletBinding) -> Result<(), SaveBindingError> {
        let mut tr = self.pool.begin().await.int_err()?;

        let address = binding.address.as_ref();
        let account_id = binding.account_id.as_ref();

        // Release whatever other address the account held
        sqlx::query(
            r#"
            DELETE
            FROM wallet_bindings
            WHERE account_id = $1
              AND address <> $2
            "#,
        )
        .bind(account_id)
        .bind(address)
        .execute(&mut *tr)
        .await
        .int_err()?;

        // The guard turns a foreign owner into a no-op
        let upsert_result = sqlx::query(
            r#"
            INSERT INTO wallet_bindings (address, account_id, linked_at, signature_proof)
                VALUES ($1, $2, $3, $4)
            ON CONFLICT (address) DO UPDATE
                SET linked_at       = excluded.linked_at,
                    signature_proof = excluded.signature_proof
                WHERE wallet_bindings.account_id = excluded.account_id
            "#,
        )
        .bind(address)
        .bind(account_id)
        .bind(binding.linked_at)
        .bind(binding.signature_proof.as_ref().map(ToString::to_string))
        .execute(&mut *tr)
        .await
        .int_err()?;

        if upsert_result.rows_affected() == 0 {
            let owner_account_id: String = sqlx::query_scalar(
                r#"
                SELECT account_id
                FROM wallet_bindings
                WHERE address = $1
                "#,
            )
            .bind(address)
            .fetch_one(&mut *tr)
            .await
            .int_err()?;

            // Dropping the transaction rolls back the release above
            return Err(SaveBindingError::AddressAlreadyBound(
                AddressAlreadyBoundError {
                    address: binding.address.clone(),
                    owner_account_id: AccountID::try_new(owner_account_id).int_err()?,
                    owner_hint: None,
                },
            ));
        }

        tr.commit().await.int_err()?;

        Ok(())
    }

    async fn get_binding_by_address(
        &self,
        address: &WalletAddress,
    ) -> Result<WalletBinding, GetBindingError> {
        let maybe_row = sqlx::query_as::<_, WalletBindingRowModel>(
            r#"
            SELECT address, account_id, linked_at, signature_proof
            FROM wallet_bindings
            WHERE address = $1
            "#,
        )
        .bind(address.as_ref())
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(GetBindingError::NotFound(BindingNotFoundError::ByAddress(
                address.clone(),
            ))),
        }
    }

    async fn get_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<WalletBinding, GetBindingError> {
        let maybe_row = sqlx::query_as::<_, WalletBindingRowModel>(
            r#"
            SELECT address, account_id, linked_at, signature_proof
            FROM wallet_bindings
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_ref())
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(GetBindingError::NotFound(BindingNotFoundError::ByAccount(
                account_id.clone(),
            ))),
        }
    }

    async fn delete_binding_by_account(
        &self,
        account_id: &AccountID,
    ) -> Result<bool, DeleteBindingError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM wallet_bindings
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_ref())
        .execute(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(delete_result.rows_affected() > 0)
    }

    async fn list_bindings(&self) -> Result<Vec<WalletBinding>, ListBindingsError> {
        let rows = sqlx::query_as::<_, WalletBindingRowModel>(
            r#"
            SELECT address, account_id, linked_at, signature_proof
            FROM wallet_bindings
            ORDER BY address
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(rows
            .into_iter()
            .map(WalletBinding::try_from)
            .collect::<Result<Vec<_>, InternalError>>()?)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
