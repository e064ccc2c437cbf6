use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_COUNTRY_CODE: &str = "+55";
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

/// Dialing prefix prepended to numbers written without a leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > 3 || !digits.chars().all(|ch| ch.is_ascii_digit())
        {
            return Err(CoreError::InvalidCountryCode(raw.to_string()));
        }
        Ok(Self(format!("+{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self(DEFAULT_COUNTRY_CODE.to_string())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

/// Canonical form of a phone number: an optional leading `+` followed by
/// digits only. Never fails; use [`is_valid_phone`] to check the result.
pub fn normalize_phone(raw: &str, country_code: &CountryCode) -> String {
    let mut out = String::with_capacity(raw.len() + country_code.as_str().len());
    for ch in raw.chars() {
        // Only a `+` ahead of every digit survives.
        if ch.is_ascii_digit() || (ch == '+' && out.is_empty()) {
            out.push(ch);
        }
    }

    if out.starts_with('+') {
        out
    } else {
        format!("{}{}", country_code.as_str(), out)
    }
}

pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(|ch| ch.is_ascii_digit()).count()
}

pub fn is_valid_phone(phone: &str) -> bool {
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&phone_digit_count(phone))
}

/// Normalizes and validates in one step, returning the canonical form.
pub fn canonical_phone(raw: &str, country_code: &CountryCode) -> Result<String, CoreError> {
    if raw.trim().is_empty() {
        return Err(CoreError::EmptyPhone);
    }
    let normalized = normalize_phone(raw, country_code);
    if !is_valid_phone(&normalized) {
        return Err(CoreError::InvalidPhone(normalized));
    }
    Ok(normalized)
}
