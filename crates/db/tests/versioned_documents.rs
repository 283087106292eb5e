//! Integration tests for the versioned document store.
//!
//! Exercises the single-active-version invariant against a real database:
//! publish/restore/delete sequences, version monotonicity, and the
//! delete-active guard.

use assert_matches::assert_matches;
use sqlx::PgPool;

use chatwarden_db::error::RepoError;
use chatwarden_db::models::versioned_document::PublishDocument;
use chatwarden_db::repositories::VersionedDocumentRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_document(scope_id: i64, content: &str) -> PublishDocument {
    PublishDocument {
        scope_id,
        content: content.to_string(),
        created_by: Some("admin-1".to_string()),
        metadata: None,
    }
}

/// Count active documents for a scope directly, bypassing the repository.
async fn active_count(pool: &PgPool, scope_id: i64) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM versioned_documents WHERE scope_id = $1 AND is_active",
    )
    .bind(scope_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_assigns_monotonic_versions(pool: PgPool) {
    let v1 = VersionedDocumentRepo::publish(&pool, &new_document(1, "a"))
        .await
        .unwrap();
    let v2 = VersionedDocumentRepo::publish(&pool, &new_document(1, "b"))
        .await
        .unwrap();
    let v3 = VersionedDocumentRepo::publish(&pool, &new_document(1, "c"))
        .await
        .unwrap();

    assert_eq!(v1.version, 1);
    assert_eq!(v2.version, 2);
    assert_eq!(v3.version, 3);

    // Versions are scoped: another scope starts back at 1.
    let other = VersionedDocumentRepo::publish(&pool, &new_document(2, "x"))
        .await
        .unwrap();
    assert_eq!(other.version, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_keeps_exactly_one_active(pool: PgPool) {
    for content in ["a", "b", "c", "d"] {
        VersionedDocumentRepo::publish(&pool, &new_document(7, content))
            .await
            .unwrap();
    }
    assert_eq!(active_count(&pool, 7).await, 1);

    let active = VersionedDocumentRepo::active_for(&pool, 7)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.content, "d");
    assert_eq!(active.version, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_reactivates_without_renumbering(pool: PgPool) {
    // The concrete rollback scenario: publish drafts A and B for scope 42,
    // then restore draft A.
    let v1 = VersionedDocumentRepo::publish(&pool, &new_document(42, "draft A"))
        .await
        .unwrap();
    let v2 = VersionedDocumentRepo::publish(&pool, &new_document(42, "draft B"))
        .await
        .unwrap();

    let active = VersionedDocumentRepo::active_for(&pool, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, v2.id);

    let restored = VersionedDocumentRepo::restore(&pool, v1.id).await.unwrap();
    assert_eq!(restored.id, v1.id);
    assert_eq!(restored.version, 1);
    assert!(restored.is_active);

    let active = VersionedDocumentRepo::active_for(&pool, 42)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, v1.id);
    assert_eq!(active.version, 1);
    assert_eq!(active_count(&pool, 42).await, 1);

    // History stays highest-version-first and no version number changed.
    let history = VersionedDocumentRepo::history(&pool, 42).await.unwrap();
    let versions: Vec<i32> = history.iter().map(|d| d.version).collect();
    assert_eq!(versions, vec![2, 1]);
    assert_eq!(history[0].id, v2.id);
    assert_eq!(history[1].id, v1.id);

    // A publish after a restore still continues from the max version.
    let v3 = VersionedDocumentRepo::publish(&pool, &new_document(42, "draft C"))
        .await
        .unwrap();
    assert_eq!(v3.version, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_missing_id_is_not_found(pool: PgPool) {
    let err = VersionedDocumentRepo::restore(&pool, 999_999).await.unwrap_err();
    assert_matches!(err, RepoError::NotFound { id: 999_999, .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_guards_the_active_version(pool: PgPool) {
    let v1 = VersionedDocumentRepo::publish(&pool, &new_document(5, "a"))
        .await
        .unwrap();
    let v2 = VersionedDocumentRepo::publish(&pool, &new_document(5, "b"))
        .await
        .unwrap();

    // The active version cannot be deleted.
    let err = VersionedDocumentRepo::delete(&pool, v2.id).await.unwrap_err();
    assert_matches!(err, RepoError::InvalidOperation(_));
    assert!(VersionedDocumentRepo::find_by_id(&pool, v2.id)
        .await
        .unwrap()
        .is_some());

    // An inactive version can.
    assert!(VersionedDocumentRepo::delete(&pool, v1.id).await.unwrap());
    assert!(VersionedDocumentRepo::find_by_id(&pool, v1.id)
        .await
        .unwrap()
        .is_none());

    // A missing id is false, not an error.
    assert!(!VersionedDocumentRepo::delete(&pool, 999_999).await.unwrap());

    // The invariant held throughout.
    assert_eq!(active_count(&pool, 5).await, 1);
    assert_eq!(VersionedDocumentRepo::count_for_scope(&pool, 5).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_for_empty_scope_is_none(pool: PgPool) {
    assert!(VersionedDocumentRepo::active_for(&pool, 1234)
        .await
        .unwrap()
        .is_none());
    assert!(VersionedDocumentRepo::history(&pool, 1234)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_publishers_never_double_activate(pool: PgPool) {
    // Hammer one scope from several tasks; every publish must either succeed
    // with a unique version or surface Conflict after retries.
    let mut handles = Vec::new();
    for i in 0..8 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            VersionedDocumentRepo::publish(&pool, &new_document(99, &format!("c{i}"))).await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(RepoError::Conflict(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(succeeded >= 1);

    assert_eq!(active_count(&pool, 99).await, 1);

    // No duplicate and no gapless-violation in minted versions.
    let history = VersionedDocumentRepo::history(&pool, 99).await.unwrap();
    let mut versions: Vec<i32> = history.iter().map(|d| d.version).collect();
    versions.sort_unstable();
    let expected: Vec<i32> = (1..=succeeded).collect();
    assert_eq!(versions, expected);
}
