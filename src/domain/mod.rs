//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod account;
pub mod account_id;
pub mod password;

pub use account::{Account, AccountStatus, VerificationDispatch};
pub use account_id::generate_account_id;
pub use password::Password;
