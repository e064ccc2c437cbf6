pub mod dispatch;
pub mod domain;
pub mod error;

pub use dispatch::*;
pub use domain::*;
pub use error::CoreError;
