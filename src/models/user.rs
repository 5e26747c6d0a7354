//! User model

use serde::{Deserialize, Serialize};

/// Account details of a signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Result of `GET /auth`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AuthUserWire", into = "AuthUserWire")]
pub enum AuthUser {
    SignedOut,
    SignedIn(User),
}

impl AuthUser {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthUser::SignedIn(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthUser::SignedIn(user) => Some(user),
            AuthUser::SignedOut => None,
        }
    }
}

impl Default for AuthUser {
    fn default() -> Self {
        AuthUser::SignedOut
    }
}

/// `{ "auth": false }` or `{ "auth": true, "user": {...} }`
#[derive(Serialize, Deserialize)]
struct AuthUserWire {
    auth: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl From<AuthUserWire> for AuthUser {
    fn from(wire: AuthUserWire) -> Self {
        match (wire.auth, wire.user) {
            (true, Some(user)) => AuthUser::SignedIn(user),
            _ => AuthUser::SignedOut,
        }
    }
}

impl From<AuthUser> for AuthUserWire {
    fn from(auth: AuthUser) -> Self {
        match auth {
            AuthUser::SignedIn(user) => AuthUserWire {
                auth: true,
                user: Some(user),
            },
            AuthUser::SignedOut => AuthUserWire {
                auth: false,
                user: None,
            },
        }
    }
}
