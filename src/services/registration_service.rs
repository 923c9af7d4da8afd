//! Registration service - Handles account creation business logic.
//!
//! Orchestrates the duplicate pre-check, password hashing, identifier
//! assignment, persistence, and the simulated verification dispatch.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::domain::{generate_account_id, Account, AccountStatus, Password, VerificationDispatch};
use crate::errors::{AppError, AppResult};
use crate::infra::{AccountRepository, InsertOutcome};
use crate::validation::ValidRegistration;

/// Registration service trait for dependency injection.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register a new account from validated input.
    ///
    /// Returns the created account along with the verification dispatch
    /// produced for it, or a conflict error when any of username, email, or
    /// phone is already taken.
    async fn register(
        &self,
        registration: ValidRegistration,
    ) -> AppResult<(Account, VerificationDispatch)>;
}

/// Concrete implementation of RegistrationService.
pub struct RegistrationManager<R: AccountRepository> {
    accounts: Arc<R>,
}

impl<R: AccountRepository> RegistrationManager<R> {
    /// Create new registration service instance
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    /// Simulate sending a verification email.
    ///
    /// Fire-and-forget: produces the dispatch record and logs it. Cannot fail
    /// and never rolls back the created account.
    fn send_verification(&self, account: &Account) -> VerificationDispatch {
        let dispatch = VerificationDispatch::email_now();
        tracing::info!(
            account_id = %account.id,
            channel = %dispatch.channel,
            "Sending verification email to {}",
            account.email
        );
        dispatch
    }
}

#[async_trait]
impl<R: AccountRepository> RegistrationService for RegistrationManager<R> {
    async fn register(
        &self,
        registration: ValidRegistration,
    ) -> AppResult<(Account, VerificationDispatch)> {
        // Pre-check for a friendlier conflict message. The table's unique
        // constraints remain the authority; see the insert below.
        if let Some(existing) = self
            .accounts
            .find_by_username_email_or_phone(
                &registration.username,
                &registration.email,
                &registration.phone,
            )
            .await?
        {
            let field = if existing.username == registration.username {
                "Username"
            } else if existing.email == registration.email {
                "Email"
            } else {
                "Phone number"
            };
            return Err(AppError::conflict(field));
        }

        let password_hash = Password::new(&registration.password)?.into_string();

        let account = Account {
            id: generate_account_id(),
            full_name: registration.full_name,
            username: registration.username,
            email: registration.email,
            phone: registration.phone,
            password_hash,
            dob: registration.dob,
            status: AccountStatus::PendingVerification,
            accepted_terms: registration.accepted_terms,
            created_at: Utc::now(),
            updated_at: None,
            verified_at: None,
        };

        match self.accounts.insert_unique(account).await? {
            InsertOutcome::Created(account) => {
                tracing::info!(account_id = %account.id, "Account created successfully");
                let dispatch = self.send_verification(&account);
                Ok((account, dispatch))
            }
            // A concurrent registration won the race between the pre-check
            // and the write. Exactly one of the two succeeds.
            InsertOutcome::UniqueViolation => {
                tracing::warn!("Unique constraint hit on insert after clean pre-check");
                Err(AppError::conflict("User with this information"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockall::predicate::always;

    use crate::infra::MockAccountRepository;

    fn registration() -> ValidRegistration {
        ValidRegistration {
            full_name: "Somkiat Pui".to_string(),
            username: "somkiat.p".to_string(),
            email: "somkiat.p@example.com".to_string(),
            phone: "+66812345678".to_string(),
            password: "Pa$$w0rd2025!".to_string(),
            dob: NaiveDate::from_ymd_opt(1995, 5, 10).unwrap(),
            accepted_terms: true,
        }
    }

    fn existing_account(username: &str, email: &str, phone: &str) -> Account {
        Account {
            id: "usr_0123456789".to_string(),
            full_name: "Existing User".to_string(),
            username: username.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            password_hash: "hashed".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            status: AccountStatus::PendingVerification,
            accepted_terms: true,
            created_at: Utc::now(),
            updated_at: None,
            verified_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| Ok(None));
        repo.expect_insert_unique()
            .with(always())
            .returning(|account| Ok(InsertOutcome::Created(account)));

        let service = RegistrationManager::new(Arc::new(repo));
        let (account, dispatch) = service.register(registration()).await.unwrap();

        assert!(account.id.starts_with("usr_"));
        assert_eq!(account.status, AccountStatus::PendingVerification);
        assert!(account.verified_at.is_none());
        assert_ne!(account.password_hash, "Pa$$w0rd2025!");
        assert_eq!(dispatch.channel, "email");
    }

    #[tokio::test]
    async fn test_register_hashes_password_with_fresh_salt() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| Ok(None));
        repo.expect_insert_unique()
            .returning(|account| Ok(InsertOutcome::Created(account)));

        let service = RegistrationManager::new(Arc::new(repo));
        let (first, _) = service.register(registration()).await.unwrap();

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| Ok(None));
        repo.expect_insert_unique()
            .returning(|account| Ok(InsertOutcome::Created(account)));

        let service = RegistrationManager::new(Arc::new(repo));
        let (second, _) = service.register(registration()).await.unwrap();

        // Same plaintext, different hashes; both verify
        assert_ne!(first.password_hash, second.password_hash);
        assert!(Password::from_hash(first.password_hash).verify("Pa$$w0rd2025!"));
        assert!(Password::from_hash(second.password_hash).verify("Pa$$w0rd2025!"));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| {
                Ok(Some(existing_account(
                    "somkiat.p",
                    "other@example.com",
                    "+66000000000",
                )))
            });
        // No insert may be attempted after a pre-check hit
        repo.expect_insert_unique().never();

        let service = RegistrationManager::new(Arc::new(repo));
        let err = service.register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref field) if field == "Username"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| {
                Ok(Some(existing_account(
                    "other.user",
                    "somkiat.p@example.com",
                    "+66000000000",
                )))
            });
        repo.expect_insert_unique().never();

        let service = RegistrationManager::new(Arc::new(repo));
        let err = service.register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref field) if field == "Email"));
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| {
                Ok(Some(existing_account(
                    "other.user",
                    "other@example.com",
                    "+66812345678",
                )))
            });
        repo.expect_insert_unique().never();

        let service = RegistrationManager::new(Arc::new(repo));
        let err = service.register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref field) if field == "Phone number"));
    }

    #[tokio::test]
    async fn test_username_collision_reported_first() {
        // Every field collides; the conflict names username.
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| {
                Ok(Some(existing_account(
                    "somkiat.p",
                    "somkiat.p@example.com",
                    "+66812345678",
                )))
            });
        repo.expect_insert_unique().never();

        let service = RegistrationManager::new(Arc::new(repo));
        let err = service.register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref field) if field == "Username"));
    }

    #[tokio::test]
    async fn test_insert_race_downgraded_to_conflict() {
        // Pre-check sees nothing, but a concurrent registration wins the
        // write; the unique violation becomes a generic conflict.
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username_email_or_phone()
            .returning(|_, _, _| Ok(None));
        repo.expect_insert_unique()
            .returning(|_| Ok(InsertOutcome::UniqueViolation));

        let service = RegistrationManager::new(Arc::new(repo));
        let err = service.register(registration()).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == "User with this information"));
    }
}
