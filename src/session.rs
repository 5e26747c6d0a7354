//! Session bootstrap
//!
//! Builds the list and user stores once at the root of the application and
//! hands out the read and dispatch handles everything else depends on.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::client::{ApiError, ListsApi};
use crate::error::StoreError;
use crate::models::{AuthUser, List};
use crate::stores::{
    ListAction, ListDispatch, ListReader, ListState, ListStore, UserDispatch, UserReader,
    UserStore,
};
use crate::workflow::{ListModal, ModalSettings, Notification};

/// Stores for one signed-in (or signed-out) user
pub struct Session {
    api: Arc<dyn ListsApi>,
    lists: ListStore,
    user: UserStore,
}

impl Session {
    /// Fetch the auth user and, when signed in, their lists
    ///
    /// Failing to reach `/auth` is an error. Failing to load the lists is not:
    /// the store starts unloaded and the dialog shows its loading state.
    pub async fn bootstrap(api: Arc<dyn ListsApi>) -> Result<Self> {
        let user = api
            .auth_user()
            .await
            .context("Failed to fetch the signed-in user")?;

        let lists = match &user {
            AuthUser::SignedIn(u) => match api.get_all_lists().await {
                Ok(lists) => {
                    info!("Loaded {} lists for {}", lists.len(), u.name);
                    Some(lists)
                }
                Err(e) => {
                    warn!("Failed to load lists: {}", e);
                    None
                }
            },
            AuthUser::SignedOut => {
                info!("Not signed in");
                None
            }
        };

        Ok(Self::from_parts(api, user, lists))
    }

    /// Build a session from values already at hand
    pub fn from_parts(api: Arc<dyn ListsApi>, user: AuthUser, lists: Option<Vec<List>>) -> Self {
        Self {
            api,
            lists: ListStore::new(ListState::new(lists)),
            user: UserStore::new(user),
        }
    }

    pub fn api(&self) -> Arc<dyn ListsApi> {
        self.api.clone()
    }

    pub fn lists(&self) -> ListReader {
        self.lists.reader()
    }

    pub fn list_dispatch(&self) -> ListDispatch {
        self.lists.dispatcher()
    }

    pub fn user(&self) -> UserReader {
        self.user.reader()
    }

    pub fn user_dispatch(&self) -> UserDispatch {
        self.user.dispatcher()
    }

    /// Create an empty list and add it to the store
    pub async fn create_list(&self, name: &str) -> Result<Notification, StoreError> {
        match self.api.add_list(name).await {
            Ok(list) => {
                let title = format!("Created {} ({})", list.name, list.slug);
                self.lists.dispatcher().dispatch(ListAction::AddList { list })?;
                Ok(Notification::success(title))
            }
            Err(e) => Ok(failed("List not created", e)),
        }
    }

    /// Rename a list; its slug stays the same
    pub async fn rename_list(&self, slug: &str, name: &str) -> Result<Notification, StoreError> {
        match self.api.update_list(slug, name).await {
            Ok(list) => {
                let title = format!("Renamed {} to {}", list.slug, list.name);
                self.lists.dispatcher().dispatch(ListAction::UpdateList {
                    slug: slug.to_string(),
                    list,
                })?;
                Ok(Notification::success(title))
            }
            Err(e) => Ok(failed("List not renamed", e)),
        }
    }

    pub async fn delete_list(&self, slug: &str) -> Result<Notification, StoreError> {
        match self.api.delete_list(slug).await {
            Ok(list) => {
                self.lists.dispatcher().dispatch(ListAction::RemoveList {
                    slug: slug.to_string(),
                })?;
                Ok(Notification::success(format!("Deleted {}", list.name)))
            }
            Err(e) => Ok(failed("List not deleted", e)),
        }
    }

    /// Dialog controller wired to this session's stores
    pub fn list_modal(&self, settings: ModalSettings) -> ListModal {
        ListModal::new(
            self.api.clone(),
            self.lists.reader(),
            self.lists.dispatcher(),
            self.user.reader(),
            settings,
        )
    }
}

fn failed(title: &str, err: ApiError) -> Notification {
    warn!("{}: {}", title, err);
    Notification::error(title, err.to_string())
}
