//! Modal state machine: which item the dialog shows and for what operation

use serde::{Deserialize, Serialize};

use crate::models::{List, MediaItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
        }
    }
}

/// What the list dialog currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalState {
    pub visible: bool,
    pub item: Option<MediaItem>,
    pub operation: Option<Operation>,
    /// Owning list for a remove, preferred list for an add
    pub list: Option<List>,
}

impl ModalState {
    pub fn is_open(&self, operation: Operation) -> bool {
        self.visible && self.item.is_some() && self.operation == Some(operation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModalAction {
    ShowAddModal {
        item: MediaItem,
        #[serde(default)]
        list: Option<List>,
    },
    ShowRemoveModal {
        item: MediaItem,
        list: List,
    },
    HideModal,
}

pub fn reduce_modal(_state: &ModalState, action: ModalAction) -> ModalState {
    match action {
        ModalAction::ShowAddModal { item, list } => ModalState {
            visible: true,
            item: Some(item),
            operation: Some(Operation::Add),
            list,
        },
        ModalAction::ShowRemoveModal { item, list } => ModalState {
            visible: true,
            item: Some(item),
            operation: Some(Operation::Remove),
            list: Some(list),
        },
        ModalAction::HideModal => ModalState::default(),
    }
}
