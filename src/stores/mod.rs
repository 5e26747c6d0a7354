//! In-memory stores for lists and the signed-in user

mod list_store;
mod user_store;

pub use list_store::{reduce, ListAction, ListDispatch, ListReader, ListState, ListStore};
pub use user_store::{reduce_user, UserAction, UserDispatch, UserReader, UserStore};
