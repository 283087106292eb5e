//! Actor references for audit attribution.
//!
//! Every moderation action is attributed to exactly one of: a web panel
//! user, a Telegram user, or an internal system component. The storage
//! layer keeps these as three nullable columns; this module makes the
//! "exactly one populated" rule unrepresentable in memory and validates
//! it at the row boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Placeholder shown when an event has no resolvable actor.
pub const MISSING_ACTOR: &str = "UNKNOWN";

/// Placeholder shown when an event has no target at all.
pub const MISSING_TARGET: &str = "N/A";

/// A reference to exactly one of the three actor kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ActorRef {
    /// A web panel user (identity provider id).
    WebUser(String),
    /// A Telegram user.
    TelegramUser(DbId),
    /// An internal component, e.g. `"spam-detector"`.
    System(String),
}

/// Discriminant for [`ActorRef`], used in logs and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    WebUser,
    TelegramUser,
    System,
}

impl ActorRef {
    pub fn web(id: impl Into<String>) -> Self {
        ActorRef::WebUser(id.into())
    }

    pub fn telegram(id: DbId) -> Self {
        ActorRef::TelegramUser(id)
    }

    pub fn system(identifier: impl Into<String>) -> Self {
        ActorRef::System(identifier.into())
    }

    /// Build an actor from the three nullable storage columns.
    ///
    /// Fails with [`CoreError::InvalidActor`] unless exactly one part is
    /// populated. This is the write-time guard for the exclusive arc.
    pub fn from_parts(
        web_user_id: Option<String>,
        telegram_user_id: Option<DbId>,
        system_identifier: Option<String>,
    ) -> Result<Self, CoreError> {
        match (web_user_id, telegram_user_id, system_identifier) {
            (Some(id), None, None) => Ok(ActorRef::WebUser(id)),
            (None, Some(id), None) => Ok(ActorRef::TelegramUser(id)),
            (None, None, Some(ident)) => Ok(ActorRef::System(ident)),
            (web, tg, system) => {
                let populated = usize::from(web.is_some())
                    + usize::from(tg.is_some())
                    + usize::from(system.is_some());
                Err(CoreError::InvalidActor(format!(
                    "expected exactly one populated field, got {populated}"
                )))
            }
        }
    }

    /// Decompose into the three nullable storage columns.
    pub fn to_parts(&self) -> (Option<&str>, Option<DbId>, Option<&str>) {
        match self {
            ActorRef::WebUser(id) => (Some(id), None, None),
            ActorRef::TelegramUser(id) => (None, Some(*id), None),
            ActorRef::System(ident) => (None, None, Some(ident)),
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            ActorRef::WebUser(_) => ActorKind::WebUser,
            ActorRef::TelegramUser(_) => ActorKind::TelegramUser,
            ActorRef::System(_) => ActorKind::System,
        }
    }

    pub fn web_user_id(&self) -> Option<&str> {
        match self {
            ActorRef::WebUser(id) => Some(id),
            _ => None,
        }
    }

    pub fn telegram_user_id(&self) -> Option<DbId> {
        match self {
            ActorRef::TelegramUser(id) => Some(*id),
            _ => None,
        }
    }

    pub fn system_identifier(&self) -> Option<&str> {
        match self {
            ActorRef::System(ident) => Some(ident),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActorRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorRef::WebUser(id) => write!(f, "{id}"),
            ActorRef::TelegramUser(id) => write!(f, "{id}"),
            ActorRef::System(ident) => write!(f, "{ident}"),
        }
    }
}

/// Display form for raw actor columns as read back from storage.
///
/// Preference order: system identifier, then web user id, then the string
/// form of the Telegram id, then `missing` when every column is null. Kept
/// as a column-level function (rather than going through [`ActorRef`]) so a
/// historically malformed row still renders instead of failing the read.
pub fn display_parts(
    web_user_id: Option<&str>,
    telegram_user_id: Option<DbId>,
    system_identifier: Option<&str>,
    missing: &str,
) -> String {
    if let Some(ident) = system_identifier {
        return ident.to_string();
    }
    if let Some(id) = web_user_id {
        return id.to_string();
    }
    if let Some(id) = telegram_user_id {
        return id.to_string();
    }
    missing.to_string()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn from_parts_accepts_exactly_one_field() {
        let actor = ActorRef::from_parts(Some("u-1".into()), None, None).unwrap();
        assert_eq!(actor, ActorRef::web("u-1"));
        assert_eq!(actor.kind(), ActorKind::WebUser);

        let actor = ActorRef::from_parts(None, Some(42), None).unwrap();
        assert_eq!(actor.telegram_user_id(), Some(42));

        let actor = ActorRef::from_parts(None, None, Some("spam-detector".into())).unwrap();
        assert_eq!(actor.system_identifier(), Some("spam-detector"));
    }

    #[test]
    fn from_parts_rejects_zero_fields() {
        let err = ActorRef::from_parts(None, None, None).unwrap_err();
        assert_matches!(err, CoreError::InvalidActor(_));
    }

    #[test]
    fn from_parts_rejects_multiple_fields() {
        let err = ActorRef::from_parts(Some("u-1".into()), Some(42), None).unwrap_err();
        assert_matches!(err, CoreError::InvalidActor(_));

        let err = ActorRef::from_parts(
            Some("u-1".into()),
            Some(42),
            Some("spam-detector".into()),
        )
        .unwrap_err();
        assert_matches!(err, CoreError::InvalidActor(_));
    }

    #[test]
    fn to_parts_round_trips() {
        let actor = ActorRef::telegram(1234);
        let (web, tg, system) = actor.to_parts();
        assert_eq!((web, tg, system), (None, Some(1234), None));
        let rebuilt =
            ActorRef::from_parts(web.map(String::from), tg, system.map(String::from)).unwrap();
        assert_eq!(rebuilt, actor);
    }

    #[test]
    fn display_prefers_system_then_web_then_telegram() {
        assert_eq!(
            display_parts(Some("u-1"), Some(42), Some("janitor"), MISSING_ACTOR),
            "janitor"
        );
        assert_eq!(
            display_parts(Some("u-1"), Some(42), None, MISSING_ACTOR),
            "u-1"
        );
        assert_eq!(display_parts(None, Some(42), None, MISSING_ACTOR), "42");
    }

    #[test]
    fn display_falls_back_to_sentinels() {
        assert_eq!(display_parts(None, None, None, MISSING_ACTOR), "UNKNOWN");
        assert_eq!(display_parts(None, None, None, MISSING_TARGET), "N/A");
    }
}
