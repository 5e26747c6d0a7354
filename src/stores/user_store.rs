//! User store - the authenticated user of the current session

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AuthUser;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserAction {
    SetUser { user: AuthUser },
    ClearUser,
}

pub fn reduce_user(_state: &AuthUser, action: UserAction) -> AuthUser {
    match action {
        UserAction::SetUser { user } => user,
        UserAction::ClearUser => AuthUser::SignedOut,
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    state: Arc<RwLock<AuthUser>>,
}

impl UserStore {
    pub fn new(initial: AuthUser) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn reader(&self) -> UserReader {
        UserReader {
            state: Arc::clone(&self.state),
        }
    }

    pub fn dispatcher(&self) -> UserDispatch {
        UserDispatch {
            state: Arc::clone(&self.state),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserReader {
    state: Arc<RwLock<AuthUser>>,
}

impl UserReader {
    pub fn current(&self) -> AuthUser {
        self.state.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.read().is_signed_in()
    }
}

#[derive(Debug, Clone)]
pub struct UserDispatch {
    state: Arc<RwLock<AuthUser>>,
}

impl UserDispatch {
    pub fn dispatch(&self, action: UserAction) {
        let tag = match &action {
            UserAction::SetUser { .. } => "SET_USER",
            UserAction::ClearUser => "CLEAR_USER",
        };
        debug!("dispatch {}", tag);
        let mut state = self.state.write();
        *state = reduce_user(&state, action);
    }
}
