//! User Registration API
//!
//! A single-purpose registration service: validates a registration payload,
//! enforces uniqueness of username/email/phone, stores a credential record
//! with a hashed password, and reports a simulated verification dispatch.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities (account, password, identifiers)
//! - **validation**: Registration payload rule set
//! - **services**: Registration use case
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **api**: HTTP handlers, extractors, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod validation;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Account, AccountStatus, Password, VerificationDispatch};
pub use errors::{AppError, AppResult, FieldErrors};
