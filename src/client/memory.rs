//! In-process implementation of the lists API
//!
//! Mirrors the validation and error messages of the remote service closely
//! enough for the dev server and the workflow tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use super::{ApiError, ApiResult, ListsApi};
use crate::models::{sort_items, sort_lists, AuthUser, List, ListItem, NewListItem, User};
use crate::utils::collate::sort_key;
use crate::utils::slug::unique_slug;

#[derive(Debug)]
struct MemoryState {
    user: AuthUser,
    lists: Vec<List>,
    next_item_id: u64,
}

/// Lists held in memory for a single user
#[derive(Debug)]
pub struct MemoryLists {
    state: Mutex<MemoryState>,
}

impl MemoryLists {
    pub fn new(user: AuthUser) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                user,
                lists: Vec::new(),
                next_item_id: 1,
            }),
        }
    }

    /// Signed in as a fixed local user
    pub fn signed_in() -> Self {
        Self::new(AuthUser::SignedIn(User {
            id: "local".to_string(),
            name: "Local user".to_string(),
            email: "local@localhost".to_string(),
        }))
    }

    pub fn with_lists(self, lists: Vec<List>) -> Self {
        {
            let mut state = self.state.lock();
            let max_id = lists
                .iter()
                .flat_map(|l| l.items.iter())
                .filter_map(|i| i.id.parse::<u64>().ok())
                .max()
                .unwrap_or(0);
            state.next_item_id = state.next_item_id.max(max_id + 1);
            state.lists = lists;
            sort_lists(&mut state.lists);
        }
        self
    }

    pub fn set_user(&self, user: AuthUser) {
        self.state.lock().user = user;
    }

    /// Copy of every list currently held
    pub fn lists(&self) -> Vec<List> {
        self.state.lock().lists.clone()
    }

    fn with_user<T>(&self, f: impl FnOnce(&mut MemoryState) -> ApiResult<T>) -> ApiResult<T> {
        let mut state = self.state.lock();
        if !state.user.is_signed_in() {
            return Err(ApiError::remote(401, "You must be signed in"));
        }
        f(&mut state)
    }
}

fn list_not_found() -> ApiError {
    ApiError::remote(404, "List not found")
}

fn validate_name(name: &str) -> ApiResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::remote(400, "List name not supplied"));
    }
    Ok(name)
}

fn name_taken(lists: &[List], name: &str, except_slug: Option<&str>) -> bool {
    let key = sort_key(name);
    lists
        .iter()
        .filter(|l| Some(l.slug.as_str()) != except_slug)
        .any(|l| sort_key(&l.name) == key)
}

#[async_trait]
impl ListsApi for MemoryLists {
    async fn auth_user(&self) -> ApiResult<AuthUser> {
        Ok(self.state.lock().user.clone())
    }

    async fn get_all_lists(&self) -> ApiResult<Vec<List>> {
        self.with_user(|state| Ok(state.lists.clone()))
    }

    async fn get_list(&self, slug: &str) -> ApiResult<List> {
        self.with_user(|state| {
            state
                .lists
                .iter()
                .find(|l| l.slug == slug)
                .cloned()
                .ok_or_else(list_not_found)
        })
    }

    async fn add_list(&self, name: &str) -> ApiResult<List> {
        self.with_user(|state| {
            let name = validate_name(name)?;
            if name_taken(&state.lists, name, None) {
                return Err(ApiError::remote(400, "List name already exists"));
            }

            let slug = unique_slug(name, |s| state.lists.iter().any(|l| l.slug == s));
            let list = List::new(uuid::Uuid::new_v4().to_string(), slug, name);
            info!("Created list '{}' ({})", list.name, list.slug);

            state.lists.push(list.clone());
            sort_lists(&mut state.lists);
            Ok(list)
        })
    }

    async fn update_list(&self, slug: &str, name: &str) -> ApiResult<List> {
        self.with_user(|state| {
            let name = validate_name(name)?;
            if name_taken(&state.lists, name, Some(slug)) {
                return Err(ApiError::remote(400, "List name already exists"));
            }

            let list = state
                .lists
                .iter_mut()
                .find(|l| l.slug == slug)
                .ok_or_else(list_not_found)?;
            // the slug is the list's public address and survives renames
            list.name = name.to_string();
            let updated = list.clone();

            sort_lists(&mut state.lists);
            Ok(updated)
        })
    }

    async fn delete_list(&self, slug: &str) -> ApiResult<List> {
        self.with_user(|state| {
            let index = state
                .lists
                .iter()
                .position(|l| l.slug == slug)
                .ok_or_else(list_not_found)?;
            Ok(state.lists.remove(index))
        })
    }

    async fn get_list_item(&self, slug: &str, item_id: &str) -> ApiResult<ListItem> {
        self.with_user(|state| {
            let list = state
                .lists
                .iter()
                .find(|l| l.slug == slug)
                .ok_or_else(list_not_found)?;
            list.item(item_id)
                .cloned()
                .ok_or_else(|| ApiError::remote(404, "List item not found"))
        })
    }

    async fn add_list_item(&self, slug: &str, item: &NewListItem) -> ApiResult<ListItem> {
        self.with_user(|state| {
            if item.title.trim().is_empty() {
                return Err(ApiError::remote(400, "Item title not supplied"));
            }

            let id = state.next_item_id.to_string();
            let list = state
                .lists
                .iter_mut()
                .find(|l| l.slug == slug)
                .ok_or_else(list_not_found)?;
            if list.contains_media(item.media_type, item.tmdb_id) {
                return Err(ApiError::remote(400, "Item is already in this list"));
            }

            let created = ListItem {
                id,
                media_type: item.media_type,
                tmdb_id: item.tmdb_id,
                title: item.title.clone(),
                subtitle: item.subtitle.clone(),
                poster_url: item.poster_url.clone(),
            };
            list.items.push(created.clone());
            sort_items(&mut list.items);

            state.next_item_id += 1;
            Ok(created)
        })
    }

    async fn delete_list_item(&self, slug: &str, item_id: &str) -> ApiResult<()> {
        self.with_user(|state| {
            let list = state
                .lists
                .iter_mut()
                .find(|l| l.slug == slug)
                .ok_or_else(list_not_found)?;
            let before = list.items.len();
            list.items.retain(|i| i.id != item_id);
            if list.items.len() == before {
                return Err(ApiError::remote(404, "List item not found"));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use tokio_test::{assert_err, assert_ok};

    fn dune() -> NewListItem {
        NewListItem {
            media_type: MediaType::Movie,
            tmdb_id: 42,
            title: "Dune".into(),
            subtitle: None,
            poster_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_list_and_add_item() {
        let api = MemoryLists::signed_in();
        let list = api.add_list("Watch later").await.unwrap();
        assert_eq!(list.slug, "watch-later");

        let item = api.add_list_item(&list.slug, &dune()).await.unwrap();
        assert_eq!(item.id, "1");
        assert_eq!(item.title, "Dune");

        let fetched = api.get_list("watch-later").await.unwrap();
        assert_eq!(fetched.items, vec![item.clone()]);
        assert_eq!(api.get_list_item("watch-later", "1").await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_duplicate_names_and_items_rejected() {
        let api = MemoryLists::signed_in();
        assert_ok!(api.add_list("Faves").await);
        assert_eq!(
            api.add_list("faves").await.unwrap_err(),
            ApiError::remote(400, "List name already exists")
        );
        assert_err!(api.add_list("   ").await);

        assert_ok!(api.add_list_item("faves", &dune()).await);
        assert_eq!(api.add_list_item("faves", &dune()).await.unwrap_err().status(), 400);
    }

    #[tokio::test]
    async fn test_rename_keeps_slug() {
        let api = MemoryLists::signed_in();
        assert_ok!(api.add_list("Faves").await);
        let renamed = api.update_list("faves", "Favourites").await.unwrap();
        assert_eq!(renamed.slug, "faves");
        assert_eq!(renamed.name, "Favourites");
        assert_eq!(
            api.update_list("missing", "X").await.unwrap_err().status(),
            404
        );
    }

    #[tokio::test]
    async fn test_delete_list_and_item() {
        let api = MemoryLists::signed_in();
        assert_ok!(api.add_list("Faves").await);
        let item = api.add_list_item("faves", &dune()).await.unwrap();

        assert_ok!(api.delete_list_item("faves", &item.id).await);
        assert_eq!(
            api.delete_list_item("faves", &item.id).await.unwrap_err().status(),
            404
        );

        let removed = api.delete_list("faves").await.unwrap();
        assert_eq!(removed.slug, "faves");
        assert!(api.get_all_lists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_is_rejected() {
        let api = MemoryLists::new(AuthUser::SignedOut);
        assert_eq!(api.auth_user().await.unwrap(), AuthUser::SignedOut);
        assert_eq!(api.get_all_lists().await.unwrap_err().status(), 401);
    }

    #[tokio::test]
    async fn test_seeded_item_ids_continue() {
        let mut list = List::new("l1", "faves", "Faves");
        list.items.push(ListItem {
            id: "7".into(),
            media_type: MediaType::Tv,
            tmdb_id: 1,
            title: "Dark".into(),
            subtitle: None,
            poster_url: None,
        });
        let api = MemoryLists::signed_in().with_lists(vec![list]);
        let item = api.add_list_item("faves", &dune()).await.unwrap();
        assert_eq!(item.id, "8");
    }
}
