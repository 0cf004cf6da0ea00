//! Client-side form checks. These run before any request is made.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both username and password.")]
    MissingCredentials,

    #[error("Password must contain at least one capital letter, one small letter, one number, and one symbol")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please choose a location")]
    MissingLocation,

    #[error("Please enter a valid amount")]
    InvalidAmount,
}

impl From<ValidationError> for String {
    fn from(err: ValidationError) -> Self {
        err.to_string()
    }
}

/// At least one lowercase letter, one uppercase letter, one digit and one
/// symbol (anything that is not an ASCII letter or digit).
pub fn is_strong_password(password: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut symbol = false;

    for c in password.chars() {
        if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else {
            symbol = true;
        }
    }

    lower && upper && digit && symbol
}

pub fn check_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

/// Password for a new account.
pub fn check_new_password(password: &str) -> Result<(), ValidationError> {
    if !is_strong_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Optional password change. An empty password leaves the current one in place.
pub fn check_password_change(password: &str, confirm: &str) -> Result<Option<String>, ValidationError> {
    if password.is_empty() {
        return Ok(None);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    check_new_password(password)?;
    Ok(Some(password.to_string()))
}

pub fn check_location(location: &str) -> Result<(), ValidationError> {
    if location.trim().is_empty() {
        return Err(ValidationError::MissingLocation);
    }
    Ok(())
}

/// Parse a payment amount in ringgit. Must be a positive, finite number.
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let amount: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_password_with_all_classes() {
        assert!(is_strong_password("Abc123!"));
        assert!(is_strong_password("SuperAdmin@123"));
    }

    #[test]
    fn test_rejects_password_missing_capital_and_symbol() {
        assert!(!is_strong_password("abc123"));
    }

    #[test]
    fn test_underscore_counts_as_symbol() {
        assert!(is_strong_password("Abc_123"));
    }

    #[test]
    fn test_rejects_each_missing_class() {
        assert!(!is_strong_password("ABC123!"));
        assert!(!is_strong_password("abc123!"));
        assert!(!is_strong_password("Abcdef!"));
        assert!(!is_strong_password("Abc1234"));
        assert!(!is_strong_password(""));
    }

    #[test]
    fn test_check_credentials_requires_both_fields() {
        assert_eq!(
            check_credentials("", "secret"),
            Err(ValidationError::MissingCredentials)
        );
        assert_eq!(
            check_credentials("admin.kl@bankedge.com", ""),
            Err(ValidationError::MissingCredentials)
        );
        assert!(check_credentials("admin.kl@bankedge.com", "Admin@123").is_ok());
    }

    #[test]
    fn test_password_change_mismatch_checked_first() {
        assert_eq!(
            check_password_change("abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            check_password_change("abc", "abc"),
            Err(ValidationError::WeakPassword)
        );
    }

    #[test]
    fn test_password_change_empty_keeps_current() {
        assert_eq!(check_password_change("", "anything"), Ok(None));
        assert_eq!(
            check_password_change("Abc123!", "Abc123!"),
            Ok(Some("Abc123!".to_string()))
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 150.25 "), Ok(150.25));
        assert_eq!(parse_amount("0"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("-5"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("abc"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("NaN"), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn test_weak_password_message() {
        assert_eq!(
            ValidationError::WeakPassword.to_string(),
            "Password must contain at least one capital letter, one small letter, one number, and one symbol"
        );
    }
}
