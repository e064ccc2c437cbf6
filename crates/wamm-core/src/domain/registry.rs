use crate::domain::contact::Contact;
use crate::domain::ids::ContactId;
use crate::domain::phone::{canonical_phone, CountryCode};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: ContactId,
    pub name: String,
    pub phone: String,
}

/// Ordered set of contacts keyed by canonical phone.
#[derive(Debug, Clone, Default)]
pub struct ContactRegistry {
    country_code: CountryCode,
    entries: Vec<RegistryEntry>,
}

impl ContactRegistry {
    pub fn new(country_code: CountryCode) -> Self {
        Self {
            country_code,
            entries: Vec::new(),
        }
    }

    pub fn country_code(&self) -> &CountryCode {
        &self.country_code
    }

    /// Appends a contact unless its fields are empty, its phone is invalid,
    /// or its canonical phone is already registered. The registry is left
    /// untouched on error.
    pub fn add_contact(&mut self, name: &str, phone: &str) -> Result<ContactId, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        let phone = canonical_phone(phone, &self.country_code)?;
        if self.contains_phone(&phone) {
            return Err(CoreError::DuplicatePhone(phone));
        }

        let id = ContactId::new();
        self.entries.push(RegistryEntry {
            id,
            name: name.to_string(),
            phone,
        });
        Ok(id)
    }

    /// Returns the removed entry, or `None` when the id is unknown.
    pub fn remove_contact(&mut self, id: ContactId) -> Option<RegistryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn contains_phone(&self, canonical: &str) -> bool {
        self.entries.iter().any(|entry| entry.phone == canonical)
    }

    pub fn get(&self, id: ContactId) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn contacts(&self) -> Vec<Contact> {
        self.entries
            .iter()
            .map(|entry| Contact::new(entry.name.clone(), entry.phone.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
