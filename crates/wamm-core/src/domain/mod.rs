pub mod contact;
pub mod ids;
pub mod phone;
pub mod registry;

pub use contact::Contact;
pub use ids::ContactId;
pub use phone::{
    canonical_phone, is_valid_phone, normalize_phone, phone_digit_count, CountryCode,
    DEFAULT_COUNTRY_CODE, MAX_PHONE_DIGITS, MIN_PHONE_DIGITS,
};
pub use registry::{ContactRegistry, RegistryEntry};
