//! Input rules checked locally, before any boundary call.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::Password;
use crate::wizard::WizardError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL_PATTERN.is_match(email)
}

pub fn validate_credentials(email: &str, password: &Password) -> Result<(), WizardError> {
    if !is_valid_email(email) {
        return Err(WizardError::InvalidEmail);
    }
    if password.char_len() < MIN_PASSWORD_LEN {
        return Err(WizardError::PasswordTooShort {
            min_len: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, ISO_DATE_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("new@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("space @x.com"));
        assert!(!is_valid_email("user@localhost"));
    }

    #[test]
    fn password_must_have_six_characters() {
        assert_eq!(
            validate_credentials("a@b.com", &Password::new("12345")),
            Err(WizardError::PasswordTooShort { min_len: 6 })
        );
        assert_eq!(validate_credentials("a@b.com", &Password::new("123456")), Ok(()));
    }

    #[test]
    fn email_is_checked_before_password() {
        assert_eq!(
            validate_credentials("bad", &Password::new("1")),
            Err(WizardError::InvalidEmail)
        );
    }

    #[test]
    fn iso_dates_only() {
        assert!(is_iso_date("1990-02-28"));
        assert!(!is_iso_date("1990-02-30"));
        assert!(!is_iso_date("02/28/1990"));
        assert!(!is_iso_date("1990-2-8"));
    }
}
