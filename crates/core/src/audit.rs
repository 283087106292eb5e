//! Audit event vocabulary.
//!
//! Event types are stored as plain text so operators can grep the table;
//! the constants here are the canonical spellings used by the bot and the
//! admin panel.

pub const EVENT_USER_BANNED: &str = "user_banned";
pub const EVENT_USER_UNBANNED: &str = "user_unbanned";
pub const EVENT_USER_WARNED: &str = "user_warned";
pub const EVENT_MESSAGE_DELETED: &str = "message_deleted";
pub const EVENT_REPORT_RESOLVED: &str = "report_resolved";
pub const EVENT_PROMPT_PUBLISHED: &str = "prompt_published";
pub const EVENT_PROMPT_RESTORED: &str = "prompt_restored";
pub const EVENT_ALERT_RESOLVED: &str = "impersonation_alert_resolved";

/// Reserved actor filter value meaning "system-originated events".
///
/// When a paged audit query filters by this value it must match rows whose
/// web and Telegram actor ids are both null, not rows whose actor id is the
/// literal string `SYSTEM`.
pub const SYSTEM_ACTOR_FILTER: &str = "SYSTEM";
