//! The session object exposed to handlers and to `/api/auth/session`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User portion of a session.
///
/// `id` is the stable user identifier, so downstream code can key queries by
/// user rather than by transient session data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Stable user ID.
    pub id: Uuid,
    /// Display name, if the provider supplied one.
    pub name: Option<String>,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub image: Option<String>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user.
    pub user: SessionUser,
    /// When the session stops being valid.
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Returns the user ID of the session.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Returns true once `now` has passed the expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}
