//! Repository for the `audit_events` table.
//!
//! The table is append-only: no updates, no per-row deletes. The only
//! destructive operation is the retention sweep `delete_older_than`, which
//! is an explicit maintenance call exempt from the "audit logs are
//! permanent" guarantee.

use chatwarden_core::actor::ActorRef;
use chatwarden_core::audit::SYSTEM_ACTOR_FILTER;
use chatwarden_core::types::Timestamp;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::audit_event::{AuditEvent, AuditPage, AuditPageQuery};

/// Column list for `audit_events` SELECT queries.
const COLUMNS: &str = "\
    id, event_type, actor_web_user_id, actor_telegram_user_id, actor_system, \
    target_web_user_id, target_telegram_user_id, target_system, value, timestamp";

/// Hard cap on page size, matching the admin panel's largest view.
const MAX_PAGE_SIZE: i64 = 500;

/// Provides append and query operations for audit events.
pub struct AuditEventRepo;

impl AuditEventRepo {
    /// Append a new audit event with a server-generated UTC timestamp.
    ///
    /// The actor and optional target are decomposed into their exclusive-arc
    /// columns; the row is written in one statement, so the append either
    /// fully succeeds or has no effect.
    pub async fn append(
        pool: &PgPool,
        event_type: &str,
        actor: &ActorRef,
        target: Option<&ActorRef>,
        value: Option<&str>,
    ) -> RepoResult<AuditEvent> {
        let (actor_web, actor_tg, actor_system) = actor.to_parts();
        let (target_web, target_tg, target_system) = match target {
            Some(t) => t.to_parts(),
            None => (None, None, None),
        };

        let query = format!(
            "INSERT INTO audit_events
                (event_type, actor_web_user_id, actor_telegram_user_id, actor_system,
                 target_web_user_id, target_telegram_user_id, target_system, value)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(event_type)
            .bind(actor_web)
            .bind(actor_tg)
            .bind(actor_system)
            .bind(target_web)
            .bind(target_tg)
            .bind(target_system)
            .bind(value)
            .fetch_one(pool)
            .await?;

        tracing::info!(
            event_type,
            actor = %event.actor_display(),
            target = %event.target_display(),
            "audit event recorded"
        );
        Ok(event)
    }

    /// Most recent events, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> RepoResult<Vec<AuditEvent>> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events ORDER BY timestamp DESC, id DESC LIMIT $1"
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(events)
    }

    /// Events performed by a given web user, newest first.
    pub async fn by_actor(
        pool: &PgPool,
        actor_user_id: &str,
        limit: i64,
    ) -> RepoResult<Vec<AuditEvent>> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events
             WHERE actor_web_user_id = $1
             ORDER BY timestamp DESC, id DESC
             LIMIT $2"
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(actor_user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(events)
    }

    /// Events aimed at a given web user, newest first.
    pub async fn by_target(
        pool: &PgPool,
        target_user_id: &str,
        limit: i64,
    ) -> RepoResult<Vec<AuditEvent>> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events
             WHERE target_web_user_id = $1
             ORDER BY timestamp DESC, id DESC
             LIMIT $2"
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(target_user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(events)
    }

    /// Events of a given type, newest first.
    pub async fn by_type(
        pool: &PgPool,
        event_type: &str,
        limit: i64,
    ) -> RepoResult<Vec<AuditEvent>> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_events
             WHERE event_type = $1
             ORDER BY timestamp DESC, id DESC
             LIMIT $2"
        );
        let events = sqlx::query_as::<_, AuditEvent>(&query)
            .bind(event_type)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(events)
    }

    /// Filtered, paged query plus the total count before pagination.
    ///
    /// The count runs against the same WHERE clause as the page query, so
    /// `total_count` is consistent with the filters for any skip/take.
    pub async fn page(pool: &PgPool, params: &AuditPageQuery) -> RepoResult<AuditPage> {
        let take = params.take.clamp(1, MAX_PAGE_SIZE);
        let skip = params.skip.max(0);

        let (where_clause, bind_values, bind_idx) = build_page_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_events {where_clause} \
             ORDER BY timestamp DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let mut q = sqlx::query_as::<_, AuditEvent>(&query);
        for val in &bind_values {
            q = q.bind(val.as_str());
        }
        let events = q.bind(take).bind(skip).fetch_all(pool).await?;

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM audit_events {where_clause}");
        let mut cq = sqlx::query_scalar::<_, i64>(&count_query);
        for val in &bind_values {
            cq = cq.bind(val.as_str());
        }
        let total_count = cq.fetch_one(pool).await?;

        Ok(AuditPage {
            events,
            total_count,
        })
    }

    /// Retention sweep: delete all events older than `cutoff`.
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM audit_events WHERE timestamp < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        let deleted = result.rows_affected();
        tracing::info!(cutoff = %cutoff, deleted, "audit retention sweep");
        Ok(deleted)
    }
}

/// Build a WHERE clause and bind values from page filter parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The reserved
/// actor value `"SYSTEM"` becomes an IS NULL predicate (system-originated
/// events have no web or Telegram actor identity) and binds nothing.
fn build_page_filter(params: &AuditPageQuery) -> (String, Vec<String>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(ref event_type) = params.event_type {
        conditions.push(format!("event_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(event_type.clone());
    }

    if let Some(ref actor) = params.actor {
        if actor == SYSTEM_ACTOR_FILTER {
            conditions.push(
                "actor_web_user_id IS NULL AND actor_telegram_user_id IS NULL".to_string(),
            );
        } else {
            conditions.push(format!("actor_web_user_id = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(actor.clone());
        }
    }

    if let Some(ref target) = params.target {
        conditions.push(format!("target_web_user_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(target.clone());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}
