//! cinelist - personal movie, TV and people lists
//!
//! Client-side core of a media browser with user accounts: the list store,
//! the add/remove list dialog workflow, a REST client for the lists API and
//! an in-memory development server.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod stores;
pub mod utils;
pub mod workflow;

pub use client::{ApiError, HttpClient, ListsApi, MemoryLists};
pub use error::StoreError;
pub use session::Session;
pub use stores::{ListAction, ListState, ListStore};
pub use workflow::{ListModal, ModalSettings, Submission, SubmitOutcome};
