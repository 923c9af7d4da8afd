//! Persistence adapters for domain entities.

pub mod account_repository;
pub mod entities;

pub use account_repository::{AccountRepository, AccountStore, InsertOutcome};

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
