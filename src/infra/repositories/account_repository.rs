//! Account repository over the accounts table.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use crate::domain::Account;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Outcome of an insert against the table's unique constraints.
///
/// A constraint violation is returned as data rather than a storage error so
/// the service can resolve the check-then-insert race to a domain conflict.
#[derive(Debug)]
pub enum InsertOutcome {
    Created(Account),
    UniqueViolation,
}

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account matching any of username, email, or phone
    /// (single OR query).
    async fn find_by_username_email_or_phone(
        &self,
        username: &str,
        email: &str,
        phone: &str,
    ) -> AppResult<Option<Account>>;

    /// Insert a new account, reporting unique-constraint conflicts as
    /// `InsertOutcome::UniqueViolation`.
    async fn insert_unique(&self, account: Account) -> AppResult<InsertOutcome>;
}

/// Concrete implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_username_email_or_phone(
        &self,
        username: &str,
        email: &str,
        phone: &str,
    ) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(
                Condition::any()
                    .add(account::Column::Username.eq(username))
                    .add(account::Column::Email.eq(email))
                    .add(account::Column::Phone.eq(phone)),
            )
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn insert_unique(&self, account: Account) -> AppResult<InsertOutcome> {
        let active_model = ActiveModel {
            id: Set(account.id),
            full_name: Set(account.full_name),
            username: Set(account.username),
            email: Set(account.email),
            phone: Set(account.phone),
            password_hash: Set(account.password_hash),
            dob: Set(account.dob),
            status: Set(account.status.to_string()),
            accepted_terms: Set(account.accepted_terms),
            created_at: Set(account.created_at),
            updated_at: Set(account.updated_at),
            verified_at: Set(account.verified_at),
        };

        match active_model.insert(&self.db).await {
            Ok(model) => Ok(InsertOutcome::Created(Account::from(model))),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Ok(InsertOutcome::UniqueViolation),
                _ => Err(AppError::from(err)),
            },
        }
    }
}
