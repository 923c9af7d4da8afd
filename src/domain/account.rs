//! Account domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{STATUS_ACTIVE, STATUS_PENDING_VERIFICATION, VERIFICATION_CHANNEL_EMAIL};

/// Account lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    PendingVerification,
    Active,
}

impl AccountStatus {
    /// Check whether the account still awaits verification
    pub fn is_pending(&self) -> bool {
        matches!(self, AccountStatus::PendingVerification)
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_ACTIVE => AccountStatus::Active,
            _ => AccountStatus::PendingVerification,
        }
    }
}

impl From<String> for AccountStatus {
    fn from(s: String) -> Self {
        AccountStatus::from(s.as_str())
    }
}

impl From<AccountStatus> for String {
    fn from(status: AccountStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::PendingVerification => write!(f, "{}", STATUS_PENDING_VERIFICATION),
            AccountStatus::Active => write!(f, "{}", STATUS_ACTIVE),
        }
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub dob: NaiveDate,
    pub status: AccountStatus,
    pub accepted_terms: bool,
    pub created_at: DateTime<Utc>,
    /// Set on the first mutation after creation (None until then)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set once verification completes (out of scope for registration)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Check if the account awaits verification
    pub fn is_pending_verification(&self) -> bool {
        self.status.is_pending()
    }
}

/// Simulated verification dispatch.
///
/// Produced once per successful registration; never persisted, never retried.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationDispatch {
    pub channel: String,
    pub sent_at: DateTime<Utc>,
}

impl VerificationDispatch {
    /// Create an email dispatch stamped with the current time
    pub fn email_now() -> Self {
        Self {
            channel: VERIFICATION_CHANNEL_EMAIL.to_string(),
            sent_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(
            AccountStatus::PendingVerification.to_string(),
            "pending_verification"
        );
        assert_eq!(AccountStatus::Active.to_string(), "active");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            AccountStatus::from("pending_verification"),
            AccountStatus::PendingVerification
        );
        assert_eq!(AccountStatus::from("active"), AccountStatus::Active);
        // Unknown values fall back to pending
        assert_eq!(
            AccountStatus::from("unknown"),
            AccountStatus::PendingVerification
        );
    }

    #[test]
    fn test_email_dispatch_channel() {
        let dispatch = VerificationDispatch::email_now();
        assert_eq!(dispatch.channel, "email");
    }
}
