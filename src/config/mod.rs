//! Configuration module for cinelist
//!
//! This module contains the client configuration and path management.

mod client_config;
mod paths;

pub use client_config::{poster_url, ClientConfig, ENV_API_URL, ENV_SESSION_COOKIE};
pub use paths::Paths;
