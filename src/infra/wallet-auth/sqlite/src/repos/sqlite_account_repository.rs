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
use internal_error::{ErrorIntoInternal, InternalError, ResultIntoInternal};
use sqlx::SqlitePool;
use sqlx::error::DatabaseError;

use crate::domain::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct SqliteAccountRepository {
    pool: Arc<SqlitePool>,
}

#[dill::component(pub)]
#[dill::interface(dyn AccountRepository)]
impl SqliteAccountRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    fn convert_unique_constraint_violation(e: &dyn DatabaseError) -> CreateAccountErrorDuplicate {
        let sqlite_error_message = e.message();

        let account_field = if sqlite_error_message.contains("accounts.id") {
            CreateAccountDuplicateField::Id
        } else if sqlite_error_message.contains("accounts.account_name") {
            CreateAccountDuplicateField::Name
        } else {
            tracing::error!(
                error = ?e,
                error_msg = sqlite_error_message,
                "Unexpected SQLite error"
            );
            CreateAccountDuplicateField::Id
        };

        CreateAccountErrorDuplicate { account_field }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(sqlx::FromRow)]
struct AccountRowModel {
    id: String,
    account_name: String,
    display_name: String,
    role: String,
    registered_at: DateTime<Utc>,
}

impl TryFrom<AccountRowModel> for Account {
    type Error = InternalError;

    fn try_from(row: AccountRowModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AccountID::try_new(row.id).int_err()?,
            account_name: AccountName::try_new(row.account_name).int_err()?,
            display_name: row.display_name,
            role: row.role.parse::<AccountRole>().int_err()?,
            registered_at: row.registered_at,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait::async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn create_account(&self, account: &Account) -> Result<(), CreateAccountError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, account_name, display_name, role, registered_at)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(account.id.as_ref())
        .bind(account.account_name.as_ref())
        .bind(&account.display_name)
        .bind(account.role.as_str())
        .bind(account.registered_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e: sqlx::Error| match e {
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                CreateAccountError::Duplicate(Self::convert_unique_constraint_violation(e.as_ref()))
            }
            _ => CreateAccountError::Internal(e.int_err()),
        })?;

        Ok(())
    }

    async fn get_account_by_id(
        &self,
        account_id: &AccountID,
    ) -> Result<Account, GetAccountByIdError> {
        let maybe_row = sqlx::query_as::<_, AccountRowModel>(
            r#"
            SELECT id, account_name, display_name, role, registered_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_ref())
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        match maybe_row {
            Some(row) => Ok(row.try_into()?),
            None => Err(GetAccountByIdError::NotFound(AccountNotFoundByIdError {
                account_id: account_id.clone(),
            })),
        }
    }

    async fn find_account_by_name(
        &self,
        account_name: &AccountName,
    ) -> Result<Option<Account>, FindAccountByNameError> {
        // The column collation makes the lookup case-insensitive
        let maybe_row = sqlx::query_as::<_, AccountRowModel>(
            r#"
            SELECT id, account_name, display_name, role, registered_at
            FROM accounts
            WHERE account_name = $1
            "#,
        )
        .bind(account_name.as_ref())
        .fetch_optional(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(maybe_row.map(Account::try_from).transpose()?)
    }

    async fn delete_account(&self, account_id: &AccountID) -> Result<bool, DeleteAccountError> {
        let delete_result = sqlx::query(
            r#"
            DELETE
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id.as_ref())
        .execute(self.pool.as_ref())
        .await
        .int_err()?;

        Ok(delete_result.rows_affected() > 0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
