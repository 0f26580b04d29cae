//! Client-side field validation, a UX convenience only.
//!
//! The backend re-validates everything; nothing here is a security boundary.

use regex::Regex;
use url::Url;

/// Strip non-digits and keep the first ten.
#[must_use]
pub fn format_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(char::is_ascii_digit)
        .take(10)
        .collect()
}

#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

#[must_use]
pub fn valid_phone_number(phone: &str) -> bool {
    format_phone_number(phone).len() == 10
}

#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

#[must_use]
pub fn valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(valid_email("user@example.com"));
        assert!(valid_email("first.last@sub.example.co"));
        assert!(!valid_email("user@example"));
        assert!(!valid_email("user example@example.com"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn phone_formatting_strips_and_truncates() {
        assert_eq!(format_phone_number("(987) 654-3210"), "9876543210");
        assert_eq!(format_phone_number("98765432109999"), "9876543210");
        assert_eq!(format_phone_number("abc"), "");
    }

    #[test]
    fn phone_validation() {
        assert!(valid_phone_number("9876543210"));
        assert!(valid_phone_number("(987) 654-3210"));
        assert!(!valid_phone_number("12345"));
        assert!(!valid_phone_number(""));
    }

    #[test]
    fn password_validation() {
        assert!(valid_password("12345678"));
        assert!(!valid_password("1234567"));
    }

    #[test]
    fn url_validation() {
        assert!(valid_url("https://example.com/avatar.png"));
        assert!(!valid_url("not a url"));
        assert!(!valid_url("/relative/path"));
    }
}
