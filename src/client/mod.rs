//! Client side of the remote lists API
//!
//! [`ListsApi`] is the seam the workflow and session talk to. [`HttpClient`]
//! speaks to the real service over HTTP; [`MemoryLists`] keeps everything in
//! process and backs the dev server and tests.

mod error;
mod http;
mod memory;

pub use error::{ApiError, ApiResult};
pub use http::HttpClient;
pub use memory::MemoryLists;

use async_trait::async_trait;

use crate::models::{AuthUser, List, ListItem, NewListItem};

/// Logical operations of the lists API
#[async_trait]
pub trait ListsApi: Send + Sync {
    /// `GET /auth`
    async fn auth_user(&self) -> ApiResult<AuthUser>;

    /// `GET /list`
    async fn get_all_lists(&self) -> ApiResult<Vec<List>>;

    /// `GET /list/{slug}`
    async fn get_list(&self, slug: &str) -> ApiResult<List>;

    /// `POST /list`
    async fn add_list(&self, name: &str) -> ApiResult<List>;

    /// `POST /list/{slug}`
    async fn update_list(&self, slug: &str, name: &str) -> ApiResult<List>;

    /// `POST /list/delete/{slug}`
    async fn delete_list(&self, slug: &str) -> ApiResult<List>;

    /// `GET /list-item/{slug}/{item_id}`
    async fn get_list_item(&self, slug: &str, item_id: &str) -> ApiResult<ListItem>;

    /// `POST /list-item/{slug}`
    async fn add_list_item(&self, slug: &str, item: &NewListItem) -> ApiResult<ListItem>;

    /// `POST /list-item/{slug}/delete/{item_id}`
    async fn delete_list_item(&self, slug: &str, item_id: &str) -> ApiResult<()>;
}
