//! Repository for the `media_fingerprints` table.
//!
//! Duplicate-asset detection: before persisting a new media asset, ingestion
//! asks for the first stored fingerprint within a Hamming-distance threshold
//! of the candidate's hash. The scan order is ascending asset id, so the
//! reported duplicate is stable for a given data set.

use chatwarden_core::error::CoreError;
use chatwarden_core::fingerprint;
use chatwarden_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::media_fingerprint::MediaFingerprint;

/// Provides perceptual-hash storage and similarity lookup.
pub struct MediaFingerprintRepo;

impl MediaFingerprintRepo {
    /// First asset whose stored hash is within `max_distance` of `hash`,
    /// scanning in ascending asset id order.
    ///
    /// Assets without a computed hash are skipped. Any width mismatch
    /// (query hash or stored row) fails with
    /// [`CoreError::InvalidFingerprint`] -- that is an upstream data bug,
    /// never something to paper over by truncating.
    pub async fn find_similar(
        pool: &PgPool,
        hash: &[u8],
        max_distance: u32,
    ) -> RepoResult<Option<MediaFingerprint>> {
        if hash.len() != fingerprint::HASH_BYTES {
            let err = CoreError::InvalidFingerprint(format!(
                "query hash is {} bytes, expected {}",
                hash.len(),
                fingerprint::HASH_BYTES
            ));
            tracing::error!(error = %err, "rejected similarity lookup");
            return Err(err.into());
        }

        let rows = sqlx::query_as::<_, MediaFingerprint>(
            "SELECT asset_id, photo_hash FROM media_fingerprints \
             WHERE photo_hash IS NOT NULL \
             ORDER BY asset_id ASC",
        )
        .fetch_all(pool)
        .await?;

        for row in rows {
            let Some(stored) = row.photo_hash.as_deref() else {
                continue;
            };
            let distance = fingerprint::hamming_distance(hash, stored).inspect_err(|err| {
                tracing::error!(
                    asset_id = row.asset_id,
                    error = %err,
                    "stored fingerprint has wrong width"
                );
            })?;
            if distance <= max_distance {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Store or replace the fingerprint for an asset, e.g. once an
    /// asynchronous hash computation completes.
    pub async fn update(pool: &PgPool, asset_id: DbId, hash: &[u8]) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO media_fingerprints (asset_id, photo_hash)
             VALUES ($1, $2)
             ON CONFLICT (asset_id) DO UPDATE SET photo_hash = EXCLUDED.photo_hash",
        )
        .bind(asset_id)
        .bind(hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Find the fingerprint stored for an asset.
    pub async fn find_by_asset(
        pool: &PgPool,
        asset_id: DbId,
    ) -> RepoResult<Option<MediaFingerprint>> {
        let row = sqlx::query_as::<_, MediaFingerprint>(
            "SELECT asset_id, photo_hash FROM media_fingerprints WHERE asset_id = $1",
        )
        .bind(asset_id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}
