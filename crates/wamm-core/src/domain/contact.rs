use crate::domain::phone::{canonical_phone, normalize_phone, CountryCode};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Rewrites `phone` into canonical form in place.
    pub fn normalize(&mut self, country_code: &CountryCode) {
        self.phone = normalize_phone(&self.phone, country_code);
    }

    /// Checks the name and returns the canonical phone without mutating.
    pub fn validate(&self, country_code: &CountryCode) -> Result<String, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        canonical_phone(&self.phone, country_code)
    }
}
