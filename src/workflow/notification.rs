//! Transient user-facing notifications

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A banner raised when a list operation completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    pub visible: bool,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            message: None,
            visible: true,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            message: Some(message.into()),
            visible: true,
        }
    }

    /// Hide the banner, keeping its contents for a closing animation
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.title, message),
            None => f.write_str(&self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_keeps_contents() {
        let mut n = Notification::success("Added to list");
        assert!(n.visible);
        n.dismiss();
        assert!(!n.visible);
        assert_eq!(n.title, "Added to list");
        assert_eq!(n.kind, NotificationKind::Success);
    }

    #[test]
    fn test_error_carries_message() {
        let n = Notification::error("List not removed", "List not found");
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.message.as_deref(), Some("List not found"));
    }
}
