//! Repository for the `impersonation_alerts` table.
//!
//! Alert lifecycle: created pending (null verdict), resolved exactly once.
//! `has_pending` is advisory -- nothing in the schema stops two pending
//! alerts for the same suspect, so detectors must consult it before
//! creating. Read models join user/chat/reviewer records with outer joins;
//! a missing relation never fails the read.

use chatwarden_core::impersonation::RiskLevel;
use chatwarden_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::impersonation_alert::{
    CreateImpersonationAlert, ImpersonationAlert, ImpersonationAlertDetails,
};

/// Column list for `impersonation_alerts` SELECT queries.
const COLUMNS: &str = "\
    id, suspected_user_id, target_user_id, chat_id, total_score, risk_level, \
    detected_at, auto_banned, verdict, reviewed_by_user_id, reviewed_at";

/// Column list for the enriched detail read model (alias `a`).
const DETAIL_COLUMNS: &str = "\
    a.id, a.suspected_user_id, a.target_user_id, a.chat_id, a.total_score, \
    a.risk_level, a.detected_at, a.auto_banned, a.verdict, \
    a.reviewed_by_user_id, a.reviewed_at, \
    su.username AS suspected_username, su.photo_path AS suspected_photo_path, \
    tu.username AS target_username, tu.photo_path AS target_photo_path, \
    c.title AS chat_name, r.email AS reviewed_by_email";

/// Outer joins shared by `get` and `history`.
const DETAIL_JOINS: &str = "\
    LEFT JOIN telegram_users su ON su.user_id = a.suspected_user_id \
    LEFT JOIN telegram_users tu ON tu.user_id = a.target_user_id \
    LEFT JOIN managed_chats c ON c.chat_id = a.chat_id \
    LEFT JOIN web_users r ON r.id = a.reviewed_by_user_id";

/// Provides the impersonation alert review workflow.
pub struct ImpersonationAlertRepo;

impl ImpersonationAlertRepo {
    /// Register a newly detected alert as pending.
    ///
    /// The risk bucket is derived from the detector's total score and stored
    /// as its rank so triage ordering is a plain ORDER BY.
    pub async fn create(
        pool: &PgPool,
        input: &CreateImpersonationAlert,
    ) -> RepoResult<ImpersonationAlert> {
        let risk = RiskLevel::from_score(input.total_score);
        let query = format!(
            "INSERT INTO impersonation_alerts
                (suspected_user_id, target_user_id, chat_id, total_score,
                 risk_level, auto_banned)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let alert = sqlx::query_as::<_, ImpersonationAlert>(&query)
            .bind(input.suspected_user_id)
            .bind(input.target_user_id)
            .bind(input.chat_id)
            .bind(input.total_score)
            .bind(risk.rank())
            .bind(input.auto_banned)
            .fetch_one(pool)
            .await?;

        tracing::info!(
            alert_id = alert.id,
            suspected_user_id = alert.suspected_user_id,
            chat_id = alert.chat_id,
            total_score = alert.total_score,
            risk = risk.as_str(),
            auto_banned = alert.auto_banned,
            "impersonation alert created"
        );
        Ok(alert)
    }

    /// Whether the suspect already has a pending alert.
    ///
    /// Detectors must check this before `create`; the table itself carries
    /// no uniqueness constraint on pending alerts.
    pub async fn has_pending(pool: &PgPool, suspected_user_id: DbId) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM impersonation_alerts \
             WHERE suspected_user_id = $1 AND verdict IS NULL)",
        )
        .bind(suspected_user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Pending alerts for triage: most severe first, newest first within a
    /// severity.
    pub async fn list_pending(
        pool: &PgPool,
        chat_id: Option<DbId>,
    ) -> RepoResult<Vec<ImpersonationAlert>> {
        let alerts = match chat_id {
            Some(chat_id) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM impersonation_alerts \
                     WHERE verdict IS NULL AND chat_id = $1 \
                     ORDER BY risk_level DESC, detected_at DESC"
                );
                sqlx::query_as::<_, ImpersonationAlert>(&query)
                    .bind(chat_id)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM impersonation_alerts \
                     WHERE verdict IS NULL \
                     ORDER BY risk_level DESC, detected_at DESC"
                );
                sqlx::query_as::<_, ImpersonationAlert>(&query)
                    .fetch_all(pool)
                    .await?
            }
        };
        Ok(alerts)
    }

    /// Fetch one alert enriched with display fields.
    pub async fn get(
        pool: &PgPool,
        id: DbId,
    ) -> RepoResult<Option<ImpersonationAlertDetails>> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM impersonation_alerts a {DETAIL_JOINS} \
             WHERE a.id = $1"
        );
        let alert = sqlx::query_as::<_, ImpersonationAlertDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(alert)
    }

    /// Record the review verdict, reviewer, and review time.
    ///
    /// Last write wins on an already-resolved alert. A missing id is a
    /// deliberate no-op rather than an error; the `false` return (and the
    /// warning log) is the caller's signal to surface it.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        verdict: &str,
        reviewed_by_user_id: &str,
    ) -> RepoResult<bool> {
        chatwarden_core::impersonation::validate_verdict(verdict)?;

        let result = sqlx::query(
            "UPDATE impersonation_alerts SET
                verdict = $1,
                reviewed_by_user_id = $2,
                reviewed_at = NOW()
             WHERE id = $3",
        )
        .bind(verdict)
        .bind(reviewed_by_user_id)
        .bind(id)
        .execute(pool)
        .await?;

        let updated = result.rows_affected() > 0;
        if updated {
            tracing::info!(alert_id = id, verdict, "impersonation alert resolved");
        } else {
            tracing::warn!(alert_id = id, "resolve on nonexistent alert, no row updated");
        }
        Ok(updated)
    }

    /// All alerts ever raised against a suspect, newest first, enriched the
    /// same way as [`Self::get`].
    pub async fn history(
        pool: &PgPool,
        suspected_user_id: DbId,
    ) -> RepoResult<Vec<ImpersonationAlertDetails>> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM impersonation_alerts a {DETAIL_JOINS} \
             WHERE a.suspected_user_id = $1 \
             ORDER BY a.detected_at DESC"
        );
        let alerts = sqlx::query_as::<_, ImpersonationAlertDetails>(&query)
            .bind(suspected_user_id)
            .fetch_all(pool)
            .await?;
        Ok(alerts)
    }
}
