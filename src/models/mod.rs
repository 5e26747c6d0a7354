//! Data models for cinelist
//!
//! Lists, list items, catalog descriptors and the authenticated user, in the
//! JSON shapes the remote API exchanges.

mod list;
mod media;
mod user;

pub use list::{sort_items, sort_lists, List, ListItem, NewListItem};
pub use media::{MediaItem, MediaType, UnknownMediaType};
pub use user::{AuthUser, User};
