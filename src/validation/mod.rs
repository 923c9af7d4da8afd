//! Registration payload validation.
//!
//! An explicit, ordered list of validator functions per field, composed by a
//! single pass that aggregates every field violation before returning. A
//! client gets all fixable problems from one response; only the cross-field
//! password equality check is gated on its own field passing first.
//!
//! Validation is pure: the same payload always yields the same error map.

use chrono::{Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::config::{
    FULL_NAME_MAX_LENGTH, FULL_NAME_MIN_LENGTH, MAX_AGE_YEARS, MIN_AGE_YEARS,
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PASSWORD_SYMBOLS, USERNAME_MAX_LENGTH,
    USERNAME_MIN_LENGTH,
};
use crate::errors::FieldErrors;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid username regex"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{10,15}$").expect("valid phone regex"));

pub const MSG_REQUIRED: &str = "Field required";
pub const MSG_FULL_NAME_LENGTH: &str = "Full name must be between 1 and 100 characters";
pub const MSG_USERNAME_LENGTH: &str = "Username must be between 3 and 30 characters";
pub const MSG_USERNAME_CHARSET: &str =
    "Username can only contain letters, numbers, dots, underscores, and hyphens";
pub const MSG_EMAIL_INVALID: &str = "Invalid email address";
pub const MSG_PHONE_INVALID: &str = "Phone number must be '+' followed by 10-15 digits";
pub const MSG_PASSWORD_POLICY: &str = "Password must be 8–64 chars incl. upper/lower/digit/special";
pub const MSG_CONFIRM_PASSWORD_LENGTH: &str =
    "Password confirmation must be between 8 and 64 characters";
pub const MSG_PASSWORDS_MISMATCH: &str = "Passwords do not match";
pub const MSG_TERMS_NOT_ACCEPTED: &str = "You must accept the terms and conditions";
pub const MSG_TOO_YOUNG: &str = "You must be at least 13 years old to register";
pub const MSG_DOB_INVALID: &str = "Invalid date of birth";

/// Raw registration payload as received on the wire.
///
/// Every field is optional at this level so that missing fields surface as
/// per-field validation errors rather than a body-level parse failure.
/// `dob` arrives as a string for the same reason.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// User's full name
    #[schema(example = "Somkiat Pui")]
    pub full_name: Option<String>,
    /// Unique username (3-30 chars, alphanumeric with ._-)
    #[schema(example = "somkiat.p")]
    pub username: Option<String>,
    /// Valid email address
    #[schema(example = "somkiat.p@example.com")]
    pub email: Option<String>,
    /// Phone number in international format
    #[schema(example = "+66812345678")]
    pub phone: Option<String>,
    /// 8-64 chars including upper/lower/digit/special
    #[schema(example = "Pa$$w0rd2025!")]
    pub password: Option<String>,
    /// Must match password
    #[schema(example = "Pa$$w0rd2025!")]
    pub confirm_password: Option<String>,
    /// Date of birth, ISO date (must be 13+ years old)
    #[schema(example = "1995-05-10")]
    pub dob: Option<String>,
    /// Must be true
    #[schema(example = true)]
    pub accept_terms: Option<bool>,
}

/// Normalized, fully validated registration data.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub dob: NaiveDate,
    pub accepted_terms: bool,
}

/// Validate a raw registration payload against the full rule set.
///
/// Runs every field rule, collecting all violations, and returns either the
/// normalized payload or the per-field error map.
pub fn validate_registration(request: &RegisterRequest) -> Result<ValidRegistration, FieldErrors> {
    validate_registration_at(request, Utc::now().date_naive())
}

/// Validation pass with an explicit reference date for age computation.
fn validate_registration_at(
    request: &RegisterRequest,
    today: NaiveDate,
) -> Result<ValidRegistration, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = collect(&mut errors, "fullName", validate_full_name(request.full_name.as_deref()));
    let username = collect(&mut errors, "username", validate_username(request.username.as_deref()));
    let email = collect(&mut errors, "email", validate_email(request.email.as_deref()));
    let phone = collect(&mut errors, "phone", validate_phone(request.phone.as_deref()));
    let password = collect(&mut errors, "password", validate_password(request.password.as_deref()));
    let confirm_password = collect(
        &mut errors,
        "confirmPassword",
        validate_confirm_password(request.confirm_password.as_deref()),
    );
    let accepted_terms = collect(
        &mut errors,
        "acceptTerms",
        validate_accept_terms(request.accept_terms),
    );
    let dob = collect(&mut errors, "dob", validate_dob(request.dob.as_deref(), today));

    // Cross-field rule: only meaningful once confirmPassword passed its own
    // length rule. Mirrors the original model-level check running after the
    // field validators.
    if let (Some(password), Some(confirm)) = (password.as_ref(), confirm_password.as_ref()) {
        if password != confirm {
            errors.insert("confirmPassword", MSG_PASSWORDS_MISMATCH.to_string());
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    // All individual collectors succeeded once the map is empty.
    Ok(ValidRegistration {
        full_name: full_name.expect("validated"),
        username: username.expect("validated"),
        email: email.expect("validated"),
        phone: phone.expect("validated"),
        password: password.expect("validated"),
        dob: dob.expect("validated"),
        accepted_terms: accepted_terms.expect("validated"),
    })
}

/// Record a field result, keeping only the first message per field.
fn collect<T>(
    errors: &mut FieldErrors,
    field: &'static str,
    result: Result<T, String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(message) => {
            errors.entry(field).or_insert(message);
            None
        }
    }
}

fn validate_full_name(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    let length = value.chars().count();
    if !(FULL_NAME_MIN_LENGTH..=FULL_NAME_MAX_LENGTH).contains(&length) {
        return Err(MSG_FULL_NAME_LENGTH.to_string());
    }
    Ok(value.to_string())
}

fn validate_username(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    let length = value.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        return Err(MSG_USERNAME_LENGTH.to_string());
    }
    if !USERNAME_RE.is_match(value) {
        return Err(MSG_USERNAME_CHARSET.to_string());
    }
    Ok(value.to_string())
}

fn validate_email(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    if !EMAIL_RE.is_match(value) {
        return Err(MSG_EMAIL_INVALID.to_string());
    }
    Ok(value.to_string())
}

fn validate_phone(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    if !PHONE_RE.is_match(value) {
        return Err(MSG_PHONE_INVALID.to_string());
    }
    Ok(value.to_string())
}

fn validate_password(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    let length = value.chars().count();
    // A single composite message for any policy violation so the rule set is
    // not an oracle for which class is missing.
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length)
        || !value.chars().any(|c| c.is_ascii_uppercase())
        || !value.chars().any(|c| c.is_ascii_lowercase())
        || !value.chars().any(|c| c.is_ascii_digit())
        || !value.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
    {
        return Err(MSG_PASSWORD_POLICY.to_string());
    }
    Ok(value.to_string())
}

fn validate_confirm_password(value: Option<&str>) -> Result<String, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    let length = value.chars().count();
    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
        return Err(MSG_CONFIRM_PASSWORD_LENGTH.to_string());
    }
    Ok(value.to_string())
}

fn validate_accept_terms(value: Option<bool>) -> Result<bool, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    if !value {
        return Err(MSG_TERMS_NOT_ACCEPTED.to_string());
    }
    Ok(value)
}

fn validate_dob(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, String> {
    let value = value.ok_or_else(|| MSG_REQUIRED.to_string())?;
    let dob = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| MSG_DOB_INVALID.to_string())?;

    let age = age_on(dob, today);
    if age < MIN_AGE_YEARS {
        return Err(MSG_TOO_YOUNG.to_string());
    }
    if age > MAX_AGE_YEARS {
        return Err(MSG_DOB_INVALID.to_string());
    }
    Ok(dob)
}

/// Age in whole years as of `today`, counting a birthday today as reached.
fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegisterRequest {
        RegisterRequest {
            full_name: Some("Somkiat Pui".to_string()),
            username: Some("somkiat.p".to_string()),
            email: Some("somkiat.p@example.com".to_string()),
            phone: Some("+66812345678".to_string()),
            password: Some("Pa$$w0rd2025!".to_string()),
            confirm_password: Some("Pa$$w0rd2025!".to_string()),
            dob: Some("1995-05-10".to_string()),
            accept_terms: Some(true),
        }
    }

    #[test]
    fn test_valid_registration_request() {
        let valid = validate_registration(&valid_request()).unwrap();
        assert_eq!(valid.full_name, "Somkiat Pui");
        assert_eq!(valid.username, "somkiat.p");
        assert_eq!(valid.email, "somkiat.p@example.com");
        assert_eq!(valid.dob, NaiveDate::from_ymd_opt(1995, 5, 10).unwrap());
        assert!(valid.accepted_terms);
    }

    #[test]
    fn test_invalid_email() {
        let mut request = valid_request();
        request.email = Some("invalid-email".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("email").unwrap(), MSG_EMAIL_INVALID);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_email_without_domain_dot() {
        let mut request = valid_request();
        request.email = Some("user@localhost".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_password_mismatch() {
        let mut request = valid_request();
        request.confirm_password = Some("DifferentPassword1!".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("confirmPassword").unwrap(), MSG_PASSWORDS_MISMATCH);
    }

    #[test]
    fn test_password_mismatch_reported_even_with_other_failures() {
        let mut request = valid_request();
        request.email = Some("not-an-email".to_string());
        request.confirm_password = Some("DifferentPassword1!".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert!(errors.contains_key("email"));
        assert_eq!(errors.get("confirmPassword").unwrap(), MSG_PASSWORDS_MISMATCH);
    }

    #[test]
    fn test_weak_password_classes() {
        let weak = [
            "weakpass1!",   // no uppercase
            "WEAKPASS1!",   // no lowercase
            "Weakpass!!",   // no digit
            "Weakpass11",   // no symbol
            "We1!",         // too short
        ];
        for password in weak {
            let mut request = valid_request();
            request.password = Some(password.to_string());
            request.confirm_password = Some(password.to_string());

            let errors = validate_registration(&request).unwrap_err();
            assert_eq!(
                errors.get("password").unwrap(),
                MSG_PASSWORD_POLICY,
                "password {:?} should fail the composite rule",
                password
            );
        }
    }

    #[test]
    fn test_password_too_long() {
        let long = format!("Aa1!{}", "x".repeat(64));
        let mut request = valid_request();
        request.password = Some(long.clone());
        request.confirm_password = Some(long);

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("password").unwrap(), MSG_PASSWORD_POLICY);
    }

    #[test]
    fn test_username_charset() {
        let mut request = valid_request();
        request.username = Some("bad name!".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("username").unwrap(), MSG_USERNAME_CHARSET);
    }

    #[test]
    fn test_username_length_checked_before_charset() {
        let mut request = valid_request();
        request.username = Some("a!".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("username").unwrap(), MSG_USERNAME_LENGTH);
    }

    #[test]
    fn test_full_name_bounds() {
        let mut request = valid_request();
        request.full_name = Some(String::new());
        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("fullName").unwrap(), MSG_FULL_NAME_LENGTH);

        let mut request = valid_request();
        request.full_name = Some("x".repeat(101));
        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("fullName").unwrap(), MSG_FULL_NAME_LENGTH);

        let mut request = valid_request();
        request.full_name = Some("x".repeat(100));
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn test_phone_format() {
        for phone in ["66812345678", "+66 81234567", "+123456789", "+1234567890123456"] {
            let mut request = valid_request();
            request.phone = Some(phone.to_string());

            let errors = validate_registration(&request).unwrap_err();
            assert_eq!(errors.get("phone").unwrap(), MSG_PHONE_INVALID, "{:?}", phone);
        }

        // 10 and 15 digits are both acceptable
        for phone in ["+1234567890", "+123456789012345"] {
            let mut request = valid_request();
            request.phone = Some(phone.to_string());
            assert!(validate_registration(&request).is_ok(), "{:?}", phone);
        }
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut request = valid_request();
        request.accept_terms = Some(false);

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("acceptTerms").unwrap(), MSG_TERMS_NOT_ACCEPTED);
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let request = RegisterRequest {
            full_name: None,
            username: None,
            email: None,
            phone: None,
            password: None,
            confirm_password: None,
            dob: None,
            accept_terms: None,
        };

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.len(), 8);
        for field in [
            "fullName",
            "username",
            "email",
            "phone",
            "password",
            "confirmPassword",
            "dob",
            "acceptTerms",
        ] {
            assert_eq!(errors.get(field).unwrap(), MSG_REQUIRED, "{}", field);
        }
    }

    #[test]
    fn test_thirteenth_birthday_today_is_accepted() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut request = valid_request();
        request.dob = Some("2012-05-10".to_string());

        assert!(validate_registration_at(&request, today).is_ok());
    }

    #[test]
    fn test_one_day_short_of_thirteen_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut request = valid_request();
        request.dob = Some("2012-05-11".to_string());

        let errors = validate_registration_at(&request, today).unwrap_err();
        assert_eq!(errors.get("dob").unwrap(), MSG_TOO_YOUNG);
    }

    #[test]
    fn test_over_120_years_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut request = valid_request();
        request.dob = Some("1900-01-01".to_string());

        let errors = validate_registration_at(&request, today).unwrap_err();
        assert_eq!(errors.get("dob").unwrap(), MSG_DOB_INVALID);
    }

    #[test]
    fn test_exactly_120_years_is_accepted() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let mut request = valid_request();
        request.dob = Some("1905-05-10".to_string());

        assert!(validate_registration_at(&request, today).is_ok());
    }

    #[test]
    fn test_unparseable_dob() {
        let mut request = valid_request();
        request.dob = Some("10/05/1995".to_string());

        let errors = validate_registration(&request).unwrap_err();
        assert_eq!(errors.get("dob").unwrap(), MSG_DOB_INVALID);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut request = valid_request();
        request.email = Some("bad".to_string());
        request.password = Some("weak".to_string());
        request.confirm_password = Some("weak".to_string());

        let first = validate_registration(&request).unwrap_err();
        let second = validate_registration(&request).unwrap_err();
        assert_eq!(first, second);
    }
}
