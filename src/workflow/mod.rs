//! List modal workflow
//!
//! Mediates between a user's intent to add an item to a list (creating the
//! list if needed) or remove it from one, the remote lists API, and the list
//! store. Remote failures never escape: they become the dialog's inline
//! error. Store errors are caller bugs and are returned as-is.

mod modal;
mod notification;
mod view;

pub use modal::{reduce_modal, ModalAction, ModalState, Operation};
pub use notification::{Notification, NotificationKind};
pub use view::{ListOption, ModalBody, ModalContent, ModalView, SubmitButton, PLEASE_WAIT};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::client::{ApiError, ApiResult, ListsApi};
use crate::config::{poster_url, ClientConfig};
use crate::error::StoreError;
use crate::models::{List, ListItem, MediaItem, NewListItem};
use crate::stores::{ListAction, ListDispatch, ListReader, UserReader};

pub const ADDED_TO_LIST: &str = "Added to list";
pub const REMOVED_FROM_LIST: &str = "Removed from list";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong!";
pub const LIST_NAME_MISSING: &str = "List name not supplied";
pub const REQUEST_TIMED_OUT: &str = "The request timed out";

/// Submission phase of the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Done,
}

/// What the user submitted from the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Attach the item to an existing list
    AddToList { slug: String },
    /// Create a list with this name and attach the item to it
    CreateList { name: String },
    /// Detach the item from the list the dialog was opened with
    Remove,
}

impl Submission {
    fn operation(&self) -> Operation {
        match self {
            Submission::AddToList { .. } | Submission::CreateList { .. } => Operation::Add,
            Submission::Remove => Operation::Remove,
        }
    }
}

/// Store change applied by a completed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange {
    ItemAdded { list: List, item: ListItem },
    ListCreated { list: List, item: ListItem },
    ItemRemoved { slug: String, item_id: String },
}

impl ListChange {
    /// Store actions for this change, in dispatch order
    pub fn actions(&self) -> Vec<ListAction> {
        match self {
            ListChange::ItemAdded { list, item } => vec![ListAction::AddListItem {
                slug: list.slug.clone(),
                item: item.clone(),
            }],
            ListChange::ListCreated { list, item } => {
                let mut created = list.clone();
                created.items.retain(|i| i.id != item.id);
                vec![
                    ListAction::AddList { list: created },
                    ListAction::AddListItem {
                        slug: list.slug.clone(),
                        item: item.clone(),
                    },
                ]
            }
            ListChange::ItemRemoved { slug, item_id } => vec![ListAction::RemoveListItem {
                slug: slug.clone(),
                item_id: item_id.clone(),
            }],
        }
    }

    fn notification_title(&self) -> &'static str {
        match self {
            ListChange::ItemAdded { .. } | ListChange::ListCreated { .. } => ADDED_TO_LIST,
            ListChange::ItemRemoved { .. } => REMOVED_FROM_LIST,
        }
    }
}

/// Why a submission was refused without calling the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// The dialog is not open
    Hidden,
    /// A submission from this dialog is already in flight
    Busy,
    /// The user must sign in first
    SignedOut,
    /// The user's lists have not loaded yet, so there is no form to submit
    Loading,
    /// The submission does not match the dialog's operation
    WrongOperation,
}

/// Result of [`ListModal::submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The store was updated and the dialog closed
    Completed(ListChange),
    /// The dialog stays open showing `message`
    Failed { message: String },
    Blocked(Blocked),
    /// The dialog was closed or reopened before the response arrived
    Stale,
}

/// Settings the workflow reads from the client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSettings {
    pub submit_timeout: Option<Duration>,
    pub sign_in_path: String,
    pub poster_base_url: String,
}

impl Default for ModalSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for ModalSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            submit_timeout: config.submit_timeout(),
            sign_in_path: config.sign_in_path.clone(),
            poster_base_url: config.poster_base_url.clone(),
        }
    }
}

/// Values typed or chosen in the dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub list_slug: Option<String>,
    pub list_name: String,
}

#[derive(Debug)]
struct Inner {
    modal: ModalState,
    phase: Phase,
    error: Option<String>,
    fields: FormFields,
    notification: Option<Notification>,
    /// Bumped on every show/hide; responses from an older epoch are dropped
    epoch: u64,
}

/// Request captured when a submission starts
struct Pending {
    epoch: u64,
    request: Request,
}

enum Request {
    AddToList { slug: String, item: NewListItem },
    CreateList { name: String, item: NewListItem },
    Remove { slug: String, item_id: String },
}

/// Controller behind the "add to list" / "remove from list" dialog
pub struct ListModal {
    api: Arc<dyn ListsApi>,
    lists: ListReader,
    dispatch: ListDispatch,
    user: UserReader,
    settings: ModalSettings,
    inner: Mutex<Inner>,
}

impl ListModal {
    pub fn new(
        api: Arc<dyn ListsApi>,
        lists: ListReader,
        dispatch: ListDispatch,
        user: UserReader,
        settings: ModalSettings,
    ) -> Self {
        Self {
            api,
            lists,
            dispatch,
            user,
            settings,
            inner: Mutex::new(Inner {
                modal: ModalState::default(),
                phase: Phase::Idle,
                error: None,
                fields: FormFields::default(),
                notification: None,
                epoch: 0,
            }),
        }
    }

    /// Open the dialog to add `item` to a list
    pub fn show_add_modal(&self, item: MediaItem) {
        self.show(ModalAction::ShowAddModal { item, list: None });
    }

    /// Open the dialog to remove `item` from `list`
    pub fn show_remove_modal(&self, item: MediaItem, list: List) {
        self.show(ModalAction::ShowRemoveModal { item, list });
    }

    /// Close the dialog; a response still in flight will be ignored
    pub fn hide_modal(&self) {
        let mut inner = self.inner.lock();
        inner.modal = reduce_modal(&inner.modal, ModalAction::HideModal);
        inner.epoch += 1;
        inner.phase = Phase::Idle;
        inner.error = None;
        inner.fields = FormFields::default();
    }

    pub fn cancel(&self) {
        self.hide_modal();
    }

    fn show(&self, action: ModalAction) {
        let preferred = match &action {
            ModalAction::ShowAddModal { list, .. } => list.as_ref().map(|l| l.slug.clone()),
            _ => None,
        };
        let default_slug = preferred
            .or_else(|| self.lists.selected().map(|l| l.slug))
            .or_else(|| {
                self.lists
                    .lists()
                    .and_then(|lists| lists.first().map(|l| l.slug.clone()))
            });

        let mut inner = self.inner.lock();
        inner.modal = reduce_modal(&inner.modal, action);
        inner.epoch += 1;
        inner.phase = Phase::Idle;
        inner.error = None;
        inner.fields = FormFields {
            list_slug: default_slug,
            list_name: String::new(),
        };
        if let Some(notification) = inner.notification.as_mut() {
            notification.dismiss();
        }
        debug!(
            "list modal opened for {:?}",
            inner.modal.operation.map(|o| o.as_str())
        );
    }

    pub fn select_list(&self, slug: impl Into<String>) {
        self.inner.lock().fields.list_slug = Some(slug.into());
    }

    pub fn set_list_name(&self, name: impl Into<String>) {
        self.inner.lock().fields.list_name = name.into();
    }

    pub fn dismiss_error(&self) {
        self.inner.lock().error = None;
    }

    pub fn dismiss_notification(&self) {
        if let Some(notification) = self.inner.lock().notification.as_mut() {
            notification.dismiss();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().modal.visible
    }

    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    pub fn error(&self) -> Option<String> {
        self.inner.lock().error.clone()
    }

    pub fn fields(&self) -> FormFields {
        self.inner.lock().fields.clone()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.inner.lock().notification.clone()
    }

    /// Deep link to sign-in that returns to the item's detail page
    pub fn sign_in_link(&self) -> String {
        let item = self.inner.lock().modal.item.clone();
        self.sign_in_link_for(item.as_ref())
    }

    fn sign_in_link_for(&self, item: Option<&MediaItem>) -> String {
        let return_to = match item {
            Some(item) => format!("/{}/{}", item.media_type.as_str(), item.tmdb_id),
            None => "/".to_string(),
        };
        format!(
            "{}?redirectTo={}",
            self.settings.sign_in_path,
            return_to.replace('/', "%2F")
        )
    }

    /// Follow the sign-in prompt: closes the dialog and returns the link
    ///
    /// `None` when the dialog is not showing the prompt.
    pub fn follow_sign_in_link(&self) -> Option<String> {
        if !self.is_visible() || self.user.is_signed_in() {
            return None;
        }
        let link = self.sign_in_link();
        self.hide_modal();
        Some(link)
    }

    /// Describe what the host should render
    pub fn view(&self) -> ModalView {
        let signed_in = self.user.is_signed_in();
        let lists = self.lists.lists();
        let inner = self.inner.lock();

        let (item, operation) = match (&inner.modal.item, inner.modal.operation) {
            (Some(item), Some(op)) if inner.modal.visible => (item, op),
            _ => return ModalView::Hidden,
        };
        let submitting = inner.phase == Phase::Submitting;

        let body = if !signed_in {
            let verb = match operation {
                Operation::Add => "add to",
                Operation::Remove => "remove from",
            };
            ModalBody::SignInPrompt {
                message: format!("You must be signed in to {} a list.", verb),
                link: self.sign_in_link_for(Some(item)),
            }
        } else {
            match operation {
                Operation::Add => match lists {
                    None => ModalBody::LoadingLists,
                    Some(lists) if !lists.is_empty() => ModalBody::ChooseList {
                        options: lists
                            .iter()
                            .map(|l| ListOption {
                                slug: l.slug.clone(),
                                name: l.name.clone(),
                            })
                            .collect(),
                        selected: inner.fields.list_slug.clone(),
                        button: SubmitButton::new("Add to list", submitting),
                    },
                    Some(_) => ModalBody::CreateList {
                        name: inner.fields.list_name.clone(),
                        button: SubmitButton::new("Create list", submitting),
                    },
                },
                Operation::Remove => ModalBody::ConfirmRemove {
                    list_name: inner
                        .modal
                        .list
                        .as_ref()
                        .map(|l| l.name.clone())
                        .unwrap_or_default(),
                    button: SubmitButton::new("Remove", submitting),
                    cancel_enabled: !submitting,
                },
            }
        };

        ModalView::Open(ModalContent {
            title: item.title.clone(),
            badge: item.media_type.label(),
            subtitle: item.sub_title.clone(),
            poster_url: item
                .poster
                .as_deref()
                .and_then(|p| poster_url(&self.settings.poster_base_url, p)),
            error: inner.error.clone(),
            body,
        })
    }

    /// Submit the dialog
    ///
    /// Remote failures come back as [`SubmitOutcome::Failed`] with the dialog
    /// left open; only store misuse is returned as an error.
    pub async fn submit(&self, submission: Submission) -> Result<SubmitOutcome, StoreError> {
        let pending = match self.begin(submission) {
            Ok(pending) => pending,
            Err(outcome) => return Ok(outcome),
        };

        let result = match self.settings.submit_timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.perform(&pending.request))
                .await
                .unwrap_or_else(|_| Err(ApiError::Transport(REQUEST_TIMED_OUT.to_string()))),
            None => self.perform(&pending.request).await,
        };

        self.finish(pending.epoch, result)
    }

    /// Validate and move into `Submitting`, or explain why not
    fn begin(&self, submission: Submission) -> Result<Pending, SubmitOutcome> {
        let signed_in = self.user.is_signed_in();
        let loaded = self.lists.is_loaded();
        let mut inner = self.inner.lock();

        let item = match (&inner.modal.item, inner.modal.visible) {
            (Some(item), true) => item.clone(),
            _ => return Err(SubmitOutcome::Blocked(Blocked::Hidden)),
        };
        if !signed_in {
            return Err(SubmitOutcome::Blocked(Blocked::SignedOut));
        }
        if inner.phase == Phase::Submitting {
            return Err(SubmitOutcome::Blocked(Blocked::Busy));
        }
        if inner.modal.operation != Some(submission.operation()) {
            return Err(SubmitOutcome::Blocked(Blocked::WrongOperation));
        }
        if submission.operation() == Operation::Add && !loaded {
            return Err(SubmitOutcome::Blocked(Blocked::Loading));
        }

        let request = match submission {
            Submission::AddToList { slug } => {
                inner.fields.list_slug = Some(slug.clone());
                Request::AddToList {
                    slug,
                    item: NewListItem::from(&item),
                }
            }
            Submission::CreateList { name } => {
                inner.fields.list_name = name.clone();
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    inner.error = Some(LIST_NAME_MISSING.to_string());
                    return Err(SubmitOutcome::Failed {
                        message: LIST_NAME_MISSING.to_string(),
                    });
                }
                Request::CreateList {
                    name: trimmed.to_string(),
                    item: NewListItem::from(&item),
                }
            }
            Submission::Remove => {
                let slug = inner.modal.list.as_ref().map(|l| l.slug.clone());
                match (slug, item.db_id.clone()) {
                    (Some(slug), Some(item_id)) => Request::Remove { slug, item_id },
                    _ => {
                        inner.error = Some(SOMETHING_WENT_WRONG.to_string());
                        return Err(SubmitOutcome::Failed {
                            message: SOMETHING_WENT_WRONG.to_string(),
                        });
                    }
                }
            }
        };

        inner.phase = Phase::Submitting;
        inner.error = None;

        Ok(Pending {
            epoch: inner.epoch,
            request,
        })
    }

    async fn perform(&self, request: &Request) -> ApiResult<ListChange> {
        match request {
            Request::AddToList { slug, item } => {
                let list = self.api.get_list(slug).await?;
                let added = self.api.add_list_item(&list.slug, item).await?;
                ensure_complete(&list, &added)?;
                Ok(ListChange::ItemAdded { list, item: added })
            }
            Request::CreateList { name, item } => {
                let list = self.api.add_list(name).await?;
                if list.slug.is_empty() {
                    return Err(ApiError::Incomplete("list"));
                }
                let added = self.api.add_list_item(&list.slug, item).await.map_err(|e| {
                    warn!(
                        "List '{}' was created but the item could not be added: {}",
                        list.slug, e
                    );
                    e
                })?;
                ensure_complete(&list, &added)?;
                Ok(ListChange::ListCreated { list, item: added })
            }
            Request::Remove { slug, item_id } => {
                self.api.delete_list_item(slug, item_id).await?;
                Ok(ListChange::ItemRemoved {
                    slug: slug.clone(),
                    item_id: item_id.clone(),
                })
            }
        }
    }

    /// Reconcile a response into the store and dialog state
    fn finish(
        &self,
        epoch: u64,
        result: ApiResult<ListChange>,
    ) -> Result<SubmitOutcome, StoreError> {
        let mut inner = self.inner.lock();

        if inner.epoch != epoch {
            warn!("Discarding list response for a dialog that is no longer open");
            return Ok(SubmitOutcome::Stale);
        }

        match result {
            Ok(change) => {
                for action in change.actions() {
                    if let Err(e) = self.dispatch.dispatch(action) {
                        inner.phase = Phase::Idle;
                        return Err(e);
                    }
                }

                let title = change.notification_title();
                info!("{}: {:?}", title, change_summary(&change));

                inner.modal = reduce_modal(&inner.modal, ModalAction::HideModal);
                inner.epoch += 1;
                inner.phase = Phase::Done;
                inner.error = None;
                inner.fields = FormFields::default();
                inner.notification = Some(Notification::success(title));

                Ok(SubmitOutcome::Completed(change))
            }
            Err(e) => {
                let message = match &e {
                    ApiError::Incomplete(_) => SOMETHING_WENT_WRONG.to_string(),
                    other => other.to_string(),
                };
                warn!("List request failed ({}): {}", e.status(), message);

                inner.phase = Phase::Idle;
                inner.error = Some(message.clone());

                Ok(SubmitOutcome::Failed { message })
            }
        }
    }
}

fn ensure_complete(list: &List, item: &ListItem) -> ApiResult<()> {
    if list.slug.is_empty() {
        return Err(ApiError::Incomplete("list"));
    }
    if item.id.is_empty() {
        return Err(ApiError::Incomplete("list item"));
    }
    Ok(())
}

fn change_summary(change: &ListChange) -> (String, String) {
    match change {
        ListChange::ItemAdded { list, item } | ListChange::ListCreated { list, item } => {
            (list.slug.clone(), item.title.clone())
        }
        ListChange::ItemRemoved { slug, item_id } => (slug.clone(), item_id.clone()),
    }
}
