//! Role-based screen access and user records.
//!
//! Roles live in the realtime store at `users/<uid>` as `{email, role}`.
//! Every new account is a `user`; promotion to `admin` happens out of band.

use core::fmt;

use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::ports::{RealtimeStore, StoreError};

/// Message shown when a tab press is refused.
pub const ACCESS_DENIED_MESSAGE: &str = "You do not have permission to access this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tabs of the app shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    IrrigationControl,
    Graph,
    Settings,
}

impl Screen {
    pub const fn allowed_roles(self) -> &'static [Role] {
        match self {
            Self::IrrigationControl => &[Role::Admin],
            Self::Dashboard | Self::Graph | Self::Settings => &[Role::Admin, Role::User],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(&'static str),
}

/// Gate a navigation attempt.
pub fn check_access(allowed: &[Role], role: Role) -> Access {
    if allowed.contains(&role) {
        Access::Allow
    } else {
        Access::Deny(ACCESS_DENIED_MESSAGE)
    }
}

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub role: Role,
}

/// Look up a user's role.  Missing, unknown or unreadable roles resolve to
/// [`Role::User`].
pub fn resolve_role(store: &impl RealtimeStore, users_root: &str, uid: &str) -> Role {
    let path = format!("{users_root}/{uid}/role");
    match store.read(&path) {
        Ok(Some(Value::String(s))) => Role::parse(&s).unwrap_or_default(),
        Ok(_) => Role::User,
        Err(e) => {
            error!("Error fetching user role for {uid}: {e}");
            Role::User
        }
    }
}

/// Create the record for a freshly registered account.
pub fn register_user(
    store: &mut impl RealtimeStore,
    users_root: &str,
    uid: &str,
    email: &str,
) -> Result<UserRecord, StoreError> {
    let record = UserRecord { email: email.to_owned(), role: Role::User };
    let value = serde_json::to_value(&record).map_err(|_| StoreError::Encoding)?;
    store.write(&format!("{users_root}/{uid}"), value)?;
    info!("Registered {uid} as {}", record.role);
    Ok(record)
}
