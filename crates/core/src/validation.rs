//! Field-level validation helpers shared by registration and staff creation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::MerchantError;

/// Mainland China mobile numbers: 11 digits, `1` followed by `3`-`9`.
const MOBILE_PATTERN: &str = r"^1[3-9][0-9]{9}$";

static MOBILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MOBILE_PATTERN).expect("valid regex"));

/// `true` if the value is `None`, empty, or whitespace only.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// `true` if the value matches the accepted mobile number pattern.
pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

/// Check a mobile number: present first, then well-formed.
pub fn validate_mobile(mobile: &str) -> Result<(), MerchantError> {
    if is_blank(Some(mobile)) {
        return Err(MerchantError::MissingMobile);
    }
    if !is_valid_mobile(mobile) {
        return Err(MerchantError::InvalidMobile);
    }
    Ok(())
}

/// Check that a username is present.
pub fn validate_username(username: &str) -> Result<(), MerchantError> {
    if is_blank(Some(username)) {
        return Err(MerchantError::MissingUsername);
    }
    Ok(())
}

/// Check that a password is present.
pub fn validate_password(password: &str) -> Result<(), MerchantError> {
    if is_blank(Some(password)) {
        return Err(MerchantError::MissingPassword);
    }
    Ok(())
}
