//! Versioned document entity model and DTOs.
//!
//! Documents (chat prompt configurations and the like) are versioned per
//! scope: version numbers are gapless and monotonic within a scope, and at
//! most one document per scope carries `is_active = true`. "Current" is
//! derived from that flag alone -- there is deliberately no separate
//! pointer table to drift out of sync.

use chatwarden_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A versioned document row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VersionedDocument {
    pub id: DbId,
    pub scope_id: DbId,
    pub version: i32,
    pub content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub created_by: Option<String>,
    pub metadata: Option<String>,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for publishing a new document version.
///
/// The version number is minted inside the publish transaction and never
/// supplied by callers.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishDocument {
    pub scope_id: DbId,
    pub content: String,
    pub created_by: Option<String>,
    pub metadata: Option<String>,
}
