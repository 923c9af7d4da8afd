//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::infra::{AccountStore, Database};
use crate::services::{RegistrationManager, RegistrationService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Registration service
    pub registration_service: Arc<dyn RegistrationService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state wired to the real repository.
    pub fn from_database(database: Arc<Database>) -> Self {
        let accounts = Arc::new(AccountStore::new(database.get_connection()));
        let registration_service = Arc::new(RegistrationManager::new(accounts));

        Self {
            registration_service,
            database,
        }
    }

    /// Create application state with manually injected services (tests).
    pub fn new(
        registration_service: Arc<dyn RegistrationService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            registration_service,
            database,
        }
    }
}
