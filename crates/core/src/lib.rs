//! Domain logic for the chatwarden moderation data layer.
//!
//! Pure types and functions shared across the persistence crates. No
//! database access here -- everything is testable in-memory.

pub mod actor;
pub mod audit;
pub mod error;
pub mod fingerprint;
pub mod impersonation;
pub mod types;
