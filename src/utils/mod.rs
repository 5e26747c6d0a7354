//! Utility modules for cinelist

pub mod collate;
pub mod slug;
