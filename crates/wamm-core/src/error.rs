use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("contact name is required")]
    EmptyName,
    #[error("phone number is required")]
    EmptyPhone,
    #[error("message is required")]
    EmptyMessage,
    #[error("at least one contact is required")]
    NoContacts,
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("duplicate phone number: {0}")]
    DuplicatePhone(String),
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),
}
