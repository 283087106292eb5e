#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid actor reference: {0}")]
    InvalidActor(String),

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
