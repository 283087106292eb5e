//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod audit_event_repo;
pub mod impersonation_alert_repo;
pub mod media_fingerprint_repo;
pub mod versioned_document_repo;

pub use audit_event_repo::AuditEventRepo;
pub use impersonation_alert_repo::ImpersonationAlertRepo;
pub use media_fingerprint_repo::MediaFingerprintRepo;
pub use versioned_document_repo::VersionedDocumentRepo;
