//! Impersonation alert entity models and DTOs.
//!
//! The core row stays free of joined display fields; [`ImpersonationAlertDetails`]
//! is the read model produced by outer-joining user/chat/reviewer records,
//! so a missing chat or reviewer never fails a read.

use chatwarden_core::impersonation::RiskLevel;
use chatwarden_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An impersonation alert row.
///
/// `verdict` is null while the alert is pending review; once set the alert
/// is resolved and never transitions back.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImpersonationAlert {
    pub id: DbId,
    pub suspected_user_id: DbId,
    pub target_user_id: DbId,
    pub chat_id: DbId,
    pub total_score: i32,
    pub risk_level: i16,
    pub detected_at: Timestamp,
    pub auto_banned: bool,
    pub verdict: Option<String>,
    pub reviewed_by_user_id: Option<String>,
    pub reviewed_at: Option<Timestamp>,
}

impl ImpersonationAlert {
    /// The stored rank decoded back into a bucket.
    pub fn risk(&self) -> Option<RiskLevel> {
        RiskLevel::from_rank(self.risk_level)
    }

    pub fn is_pending(&self) -> bool {
        self.verdict.is_none()
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for registering a newly detected alert.
///
/// `auto_banned` is decided by the detector before the alert is stored; the
/// repository records it and never changes it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImpersonationAlert {
    pub suspected_user_id: DbId,
    pub target_user_id: DbId,
    pub chat_id: DbId,
    pub total_score: i32,
    pub auto_banned: bool,
}

// ---------------------------------------------------------------------------
// Read model
// ---------------------------------------------------------------------------

/// An alert enriched with denormalized display fields.
///
/// All joined fields are nullable: the suspected or impersonated user may
/// never have been seen, the chat may have been removed, and pending alerts
/// have no reviewer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImpersonationAlertDetails {
    pub id: DbId,
    pub suspected_user_id: DbId,
    pub target_user_id: DbId,
    pub chat_id: DbId,
    pub total_score: i32,
    pub risk_level: i16,
    pub detected_at: Timestamp,
    pub auto_banned: bool,
    pub verdict: Option<String>,
    pub reviewed_by_user_id: Option<String>,
    pub reviewed_at: Option<Timestamp>,
    pub suspected_username: Option<String>,
    pub suspected_photo_path: Option<String>,
    pub target_username: Option<String>,
    pub target_photo_path: Option<String>,
    pub chat_name: Option<String>,
    pub reviewed_by_email: Option<String>,
}
