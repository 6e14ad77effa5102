//! Expression Embeds - speaker attribution and inline expression images
//!
//! Given an assistant message and the expression images registered for the
//! open character, the engine works out who is speaking or acting, picks the
//! matching images and places `{{img::name}}` placeholders next to the
//! paragraphs they belong to.

pub mod application;
pub mod domain;
pub mod infrastructure;
