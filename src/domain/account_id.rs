//! Opaque account identifier generation.

use uuid::Uuid;

use crate::config::{ACCOUNT_ID_PREFIX, ACCOUNT_ID_SUFFIX_LENGTH};

/// Generate a unique opaque account identifier.
///
/// The identifier is the `usr_` prefix followed by the first hex characters
/// of a v4 UUID. Truncation keeps ids short; the primary-key constraint
/// backstops the (negligible) collision probability.
pub fn generate_account_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", ACCOUNT_ID_PREFIX, &hex[..ACCOUNT_ID_SUFFIX_LENGTH])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_has_prefix_and_length() {
        let id = generate_account_id();
        assert!(id.starts_with(ACCOUNT_ID_PREFIX));
        assert_eq!(id.len(), ACCOUNT_ID_PREFIX.len() + ACCOUNT_ID_SUFFIX_LENGTH);
    }

    #[test]
    fn test_id_suffix_is_hex() {
        let id = generate_account_id();
        let suffix = &id[ACCOUNT_ID_PREFIX.len()..];
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = generate_account_id();
        let b = generate_account_id();
        assert_ne!(a, b);
    }
}
