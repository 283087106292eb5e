//! Media fingerprint entity model.

use chatwarden_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A perceptual hash for a stored media asset.
///
/// `photo_hash` is null until the asynchronous hash computation completes;
/// when present it is exactly
/// [`HASH_BYTES`](chatwarden_core::fingerprint::HASH_BYTES) long.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaFingerprint {
    pub asset_id: DbId,
    pub photo_hash: Option<Vec<u8>>,
}
