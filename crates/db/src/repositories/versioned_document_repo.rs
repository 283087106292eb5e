//! Repository for the `versioned_documents` table.
//!
//! Invariant: per scope, version numbers are gapless and monotonic, and at
//! most one document is active (exactly one once any exist). Every
//! multi-row write runs inside a single transaction; a failure at any step
//! rolls the whole operation back, leaving the previous active document in
//! place.

use chatwarden_core::types::DbId;
use sqlx::PgPool;

use crate::error::{is_unique_violation, RepoError, RepoResult};
use crate::models::versioned_document::{PublishDocument, VersionedDocument};

/// Column list for `versioned_documents` SELECT queries.
const COLUMNS: &str = "\
    id, scope_id, version, content, is_active, created_at, created_by, metadata";

/// Unique constraint backing the publish retry loop.
const UQ_SCOPE_VERSION: &str = "uq_versioned_documents_scope_version";

/// Partial unique index guarding the one-active-per-scope invariant. A
/// racing publisher can trip either constraint depending on which index
/// Postgres checks first, so both count as a retryable publish conflict.
const UQ_SCOPE_ACTIVE: &str = "uq_versioned_documents_scope_active";

fn is_publish_conflict(err: &sqlx::Error) -> bool {
    is_unique_violation(err, UQ_SCOPE_VERSION) || is_unique_violation(err, UQ_SCOPE_ACTIVE)
}

/// Bounded retries for the read-max-then-insert race between concurrent
/// publishers of the same scope.
const PUBLISH_MAX_ATTEMPTS: u32 = 3;

/// Provides transactional version management for scoped documents.
pub struct VersionedDocumentRepo;

impl VersionedDocumentRepo {
    /// Publish a new version: deactivate the scope's current active document
    /// and insert the new content as `max(version) + 1`, active.
    ///
    /// Two publishers racing on the same scope both compute the same next
    /// version; the loser hits the `(scope_id, version)` unique constraint,
    /// its transaction rolls back, and the sequence is retried a bounded
    /// number of times before surfacing [`RepoError::Conflict`].
    pub async fn publish(
        pool: &PgPool,
        input: &PublishDocument,
    ) -> RepoResult<VersionedDocument> {
        for attempt in 1..=PUBLISH_MAX_ATTEMPTS {
            match Self::try_publish(pool, input).await {
                Ok(doc) => {
                    tracing::info!(
                        scope_id = doc.scope_id,
                        version = doc.version,
                        "published document version"
                    );
                    return Ok(doc);
                }
                Err(RepoError::Database(err)) if is_publish_conflict(&err) => {
                    tracing::warn!(
                        scope_id = input.scope_id,
                        attempt,
                        "version number conflict on publish, retrying"
                    );
                }
                Err(other) => return Err(other),
            }
        }
        Err(RepoError::Conflict(format!(
            "publish for scope {} still conflicting after {PUBLISH_MAX_ATTEMPTS} attempts",
            input.scope_id
        )))
    }

    /// One publish attempt inside its own transaction.
    async fn try_publish(
        pool: &PgPool,
        input: &PublishDocument,
    ) -> RepoResult<VersionedDocument> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE versioned_documents SET is_active = false \
             WHERE scope_id = $1 AND is_active",
        )
        .bind(input.scope_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO versioned_documents
                (scope_id, version, content, is_active, created_by, metadata)
             VALUES ($1,
                     COALESCE((SELECT MAX(version) FROM versioned_documents WHERE scope_id = $1), 0) + 1,
                     $2, true, $3, $4)
             RETURNING {COLUMNS}"
        );
        let doc = sqlx::query_as::<_, VersionedDocument>(&query)
            .bind(input.scope_id)
            .bind(&input.content)
            .bind(&input.created_by)
            .bind(&input.metadata)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(doc)
    }

    /// Reactivate an older version, deactivating the scope's current active
    /// document in the same transaction. Version numbers are never minted or
    /// changed here.
    ///
    /// Fails with [`RepoError::NotFound`] if `document_id` does not exist.
    pub async fn restore(pool: &PgPool, document_id: DbId) -> RepoResult<VersionedDocument> {
        let mut tx = pool.begin().await?;

        let scope: Option<(DbId,)> = sqlx::query_as(
            "SELECT scope_id FROM versioned_documents WHERE id = $1 FOR UPDATE",
        )
        .bind(document_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((scope_id,)) = scope else {
            return Err(RepoError::NotFound {
                entity: "versioned_document",
                id: document_id,
            });
        };

        sqlx::query(
            "UPDATE versioned_documents SET is_active = false \
             WHERE scope_id = $1 AND is_active",
        )
        .bind(scope_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE versioned_documents SET is_active = true \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let doc = sqlx::query_as::<_, VersionedDocument>(&query)
            .bind(document_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(
            scope_id = doc.scope_id,
            version = doc.version,
            "restored document version"
        );
        Ok(doc)
    }

    /// Delete an inactive version.
    ///
    /// Fails with [`RepoError::InvalidOperation`] if the target is the
    /// scope's active document; returns `Ok(false)` if the id does not
    /// exist.
    pub async fn delete(pool: &PgPool, document_id: DbId) -> RepoResult<bool> {
        let mut tx = pool.begin().await?;

        let row: Option<(bool,)> = sqlx::query_as(
            "SELECT is_active FROM versioned_documents WHERE id = $1 FOR UPDATE",
        )
        .bind(document_id)
        .fetch_optional(&mut *tx)
        .await?;
        match row {
            None => Ok(false),
            Some((true,)) => Err(RepoError::InvalidOperation(
                "cannot delete active version".to_string(),
            )),
            Some((false,)) => {
                sqlx::query("DELETE FROM versioned_documents WHERE id = $1")
                    .bind(document_id)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                Ok(true)
            }
        }
    }

    /// The scope's current active document, if any.
    pub async fn active_for(
        pool: &PgPool,
        scope_id: DbId,
    ) -> RepoResult<Option<VersionedDocument>> {
        let query = format!(
            "SELECT {COLUMNS} FROM versioned_documents \
             WHERE scope_id = $1 AND is_active"
        );
        let doc = sqlx::query_as::<_, VersionedDocument>(&query)
            .bind(scope_id)
            .fetch_optional(pool)
            .await?;
        Ok(doc)
    }

    /// All versions for a scope, highest version first.
    pub async fn history(pool: &PgPool, scope_id: DbId) -> RepoResult<Vec<VersionedDocument>> {
        let query = format!(
            "SELECT {COLUMNS} FROM versioned_documents \
             WHERE scope_id = $1 \
             ORDER BY version DESC"
        );
        let docs = sqlx::query_as::<_, VersionedDocument>(&query)
            .bind(scope_id)
            .fetch_all(pool)
            .await?;
        Ok(docs)
    }

    /// Find a document by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        document_id: DbId,
    ) -> RepoResult<Option<VersionedDocument>> {
        let query = format!("SELECT {COLUMNS} FROM versioned_documents WHERE id = $1");
        let doc = sqlx::query_as::<_, VersionedDocument>(&query)
            .bind(document_id)
            .fetch_optional(pool)
            .await?;
        Ok(doc)
    }

    /// Count the versions stored for a scope.
    pub async fn count_for_scope(pool: &PgPool, scope_id: DbId) -> RepoResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM versioned_documents WHERE scope_id = $1")
                .bind(scope_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
