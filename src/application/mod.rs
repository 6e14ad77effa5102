//! Application layer - Use cases over the attribution core
//!
//! Services here coordinate ports (settings storage, the host chat log) with
//! the pure domain services. DTOs shape what the HTTP adapter exchanges.

pub mod dto;
pub mod ports;
pub mod services;
