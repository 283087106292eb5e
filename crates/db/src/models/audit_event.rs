//! Audit event entity model and query DTOs.
//!
//! Audit events are append-only: there is no update DTO and no `updated_at`
//! column. The actor and optional target are each stored as an exclusive arc
//! of three nullable columns, validated through
//! [`ActorRef`](chatwarden_core::actor::ActorRef) at write time.

use chatwarden_core::actor::{self, MISSING_ACTOR, MISSING_TARGET};
use chatwarden_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A single audit event row. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditEvent {
    pub id: DbId,
    pub event_type: String,
    pub actor_web_user_id: Option<String>,
    pub actor_telegram_user_id: Option<DbId>,
    pub actor_system: Option<String>,
    pub target_web_user_id: Option<String>,
    pub target_telegram_user_id: Option<DbId>,
    pub target_system: Option<String>,
    pub value: Option<String>,
    pub timestamp: Timestamp,
}

impl AuditEvent {
    /// Human-readable actor, `UNKNOWN` if every actor column is null.
    pub fn actor_display(&self) -> String {
        actor::display_parts(
            self.actor_web_user_id.as_deref(),
            self.actor_telegram_user_id,
            self.actor_system.as_deref(),
            MISSING_ACTOR,
        )
    }

    /// Human-readable target, `N/A` if the event has no target.
    pub fn target_display(&self) -> String {
        actor::display_parts(
            self.target_web_user_id.as_deref(),
            self.target_telegram_user_id,
            self.target_system.as_deref(),
            MISSING_TARGET,
        )
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Filter parameters for paged audit queries.
///
/// `actor` accepts the reserved value
/// [`SYSTEM_ACTOR_FILTER`](chatwarden_core::audit::SYSTEM_ACTOR_FILTER),
/// which matches system-originated events instead of a literal id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditPageQuery {
    pub event_type: Option<String>,
    pub actor: Option<String>,
    pub target: Option<String>,
    pub skip: i64,
    pub take: i64,
}

/// A page of audit events plus the filtered total before pagination.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
    pub events: Vec<AuditEvent>,
    pub total_count: i64,
}
