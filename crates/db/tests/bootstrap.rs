use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    chatwarden_db::health_check(&pool).await.unwrap();

    let tables = [
        "audit_events",
        "versioned_documents",
        "impersonation_alerts",
        "media_fingerprints",
        "telegram_users",
        "managed_chats",
        "web_users",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The partial unique index is the backstop for the one-active-per-scope
/// invariant: a second active row for the same scope must be impossible
/// even for raw SQL that bypasses the repository.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_active_uniqueness_enforced_at_schema_level(pool: PgPool) {
    sqlx::query(
        "INSERT INTO versioned_documents (scope_id, version, content, is_active) \
         VALUES (1, 1, 'a', true)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let err = sqlx::query(
        "INSERT INTO versioned_documents (scope_id, version, content, is_active) \
         VALUES (1, 2, 'b', true)",
    )
    .execute(&pool)
    .await
    .unwrap_err();
    assert!(err.to_string().contains("uq_versioned_documents_scope_active"));
}
