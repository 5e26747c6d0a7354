//! Render-ready description of the list dialog

use serde::Serialize;

/// Label shown on the active submit control while a request is in flight
pub const PLEASE_WAIT: &str = "Please wait...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

impl SubmitButton {
    pub(crate) fn new(idle_label: &'static str, submitting: bool) -> Self {
        Self {
            label: if submitting { PLEASE_WAIT } else { idle_label },
            enabled: !submitting,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOption {
    pub slug: String,
    pub name: String,
}

/// Body of the dialog below the item header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalBody {
    /// Signed out: nothing can be submitted
    SignInPrompt { message: String, link: String },
    /// Lists have not been loaded yet
    LoadingLists,
    ChooseList {
        options: Vec<ListOption>,
        selected: Option<String>,
        button: SubmitButton,
    },
    CreateList {
        name: String,
        button: SubmitButton,
    },
    ConfirmRemove {
        list_name: String,
        button: SubmitButton,
        cancel_enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalContent {
    pub title: String,
    /// "Movie", "TV Show" or "Person"
    pub badge: &'static str,
    pub subtitle: Option<String>,
    pub poster_url: Option<String>,
    /// Inline, dismissable error
    pub error: Option<String>,
    pub body: ModalBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalView {
    Hidden,
    Open(ModalContent),
}

impl ModalView {
    pub fn content(&self) -> Option<&ModalContent> {
        match self {
            ModalView::Open(content) => Some(content),
            ModalView::Hidden => None,
        }
    }

    pub fn body(&self) -> Option<&ModalBody> {
        self.content().map(|c| &c.body)
    }

    /// The active submit control, if the body has one
    pub fn button(&self) -> Option<&SubmitButton> {
        match self.body()? {
            ModalBody::ChooseList { button, .. }
            | ModalBody::CreateList { button, .. }
            | ModalBody::ConfirmRemove { button, .. } => Some(button),
            ModalBody::SignInPrompt { .. } | ModalBody::LoadingLists => None,
        }
    }
}
