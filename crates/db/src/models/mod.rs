//! Row structs and create DTOs, one module per table.

pub mod audit_event;
pub mod impersonation_alert;
pub mod media_fingerprint;
pub mod versioned_document;
