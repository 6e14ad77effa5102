//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP adapter can
//! serialize/deserialize without tying the wire shape to the domain model.

pub mod expression;
pub mod message;
pub mod settings;

pub use expression::*;
pub use message::*;
pub use settings::*;
