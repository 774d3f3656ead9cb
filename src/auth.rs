//! Credential models for authenticated clients.

pub mod credential;

pub use credential::*;
