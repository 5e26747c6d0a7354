//! List store - reducer-managed lists and list items for the signed-in user

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{sort_items, sort_lists, List, ListItem};

/// Lists of the current session plus the selected list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListState {
    /// `None` until lists are loaded (or when signed out)
    pub lists: Option<Vec<List>>,
    /// Slug of the selected list
    #[serde(default)]
    pub selected: Option<String>,
}

impl ListState {
    pub fn new(lists: Option<Vec<List>>) -> Self {
        Self {
            lists: lists.map(sorted_lists),
            selected: None,
        }
    }

    pub fn get(&self, slug: &str) -> Option<&List> {
        self.lists.as_ref()?.iter().find(|l| l.slug == slug)
    }

    pub fn selected_list(&self) -> Option<&List> {
        self.get(self.selected.as_deref()?)
    }
}

fn sorted_lists(mut lists: Vec<List>) -> Vec<List> {
    for list in lists.iter_mut() {
        list.sort_items();
    }
    sort_lists(&mut lists);
    lists
}

/// Transitions accepted by [`reduce`]
///
/// The JSON form is tagged the same way the web client tags its actions,
/// e.g. `{"type":"ADD_LIST_ITEM","slug":"faves","item":{...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListAction {
    SetLists {
        lists: Vec<List>,
    },
    AddList {
        list: List,
    },
    UpdateList {
        slug: String,
        list: List,
    },
    RemoveList {
        slug: String,
    },
    AddListItem {
        slug: String,
        item: ListItem,
    },
    RemoveListItem {
        slug: String,
        #[serde(rename = "itemId")]
        item_id: String,
    },
    SetSelectedList {
        slug: String,
    },
    ClearSelectedList,
    /// Any tag outside the set above
    #[serde(other)]
    Unhandled,
}

impl ListAction {
    pub fn tag(&self) -> &'static str {
        match self {
            ListAction::SetLists { .. } => "SET_LISTS",
            ListAction::AddList { .. } => "ADD_LIST",
            ListAction::UpdateList { .. } => "UPDATE_LIST",
            ListAction::RemoveList { .. } => "REMOVE_LIST",
            ListAction::AddListItem { .. } => "ADD_LIST_ITEM",
            ListAction::RemoveListItem { .. } => "REMOVE_LIST_ITEM",
            ListAction::SetSelectedList { .. } => "SET_SELECTED_LIST",
            ListAction::ClearSelectedList => "CLEAR_SELECTED_LIST",
            ListAction::Unhandled => "UNHANDLED",
        }
    }
}

/// Apply one action, returning the next state
///
/// The previous state is never modified. Item-level transitions fail with
/// [`StoreError::NotFound`] before lists are loaded and silently ignore an
/// unknown slug or item id afterwards.
pub fn reduce(state: &ListState, action: ListAction) -> Result<ListState, StoreError> {
    let mut next = state.clone();

    match action {
        ListAction::SetLists { lists } => {
            next.lists = Some(sorted_lists(lists));
        }
        ListAction::AddList { mut list } => {
            let mut lists = next.lists.take().unwrap_or_default();
            list.sort_items();
            // slugs stay unique: a list re-added under a known slug replaces it
            lists.retain(|l| l.slug != list.slug);
            lists.push(list);
            sort_lists(&mut lists);
            next.lists = Some(lists);
        }
        ListAction::UpdateList { slug, mut list } => {
            let lists = next.lists.as_mut().ok_or(StoreError::NotFound)?;
            if let Some(index) = lists.iter().position(|l| l.slug == slug) {
                lists.remove(index);
                list.sort_items();
                lists.retain(|l| l.slug != list.slug);
                lists.push(list);
                sort_lists(lists);
            }
        }
        ListAction::RemoveList { slug } => {
            let lists = next.lists.as_mut().ok_or(StoreError::NotFound)?;
            lists.retain(|l| l.slug != slug);
        }
        ListAction::AddListItem { slug, item } => {
            let lists = next.lists.as_mut().ok_or(StoreError::NotFound)?;
            if let Some(list) = lists.iter_mut().find(|l| l.slug == slug) {
                list.items.push(item);
                sort_items(&mut list.items);
            }
        }
        ListAction::RemoveListItem { slug, item_id } => {
            let lists = next.lists.as_mut().ok_or(StoreError::NotFound)?;
            if let Some(list) = lists.iter_mut().find(|l| l.slug == slug) {
                list.items.retain(|i| i.id != item_id);
            }
        }
        ListAction::SetSelectedList { slug } => {
            next.selected = Some(slug);
        }
        ListAction::ClearSelectedList => {
            next.selected = None;
        }
        ListAction::Unhandled => {
            return Err(StoreError::UnhandledAction(action.tag().to_string()));
        }
    }

    Ok(next)
}

/// Owner of the list state for one session
///
/// Built once at the session root; everything else gets a [`ListReader`] or
/// a [`ListDispatch`].
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    state: Arc<RwLock<ListState>>,
}

impl ListStore {
    pub fn new(initial: ListState) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
        }
    }

    pub fn reader(&self) -> ListReader {
        ListReader {
            state: Arc::clone(&self.state),
        }
    }

    pub fn dispatcher(&self) -> ListDispatch {
        ListDispatch {
            state: Arc::clone(&self.state),
        }
    }
}

/// Read access to the list state
#[derive(Debug, Clone)]
pub struct ListReader {
    state: Arc<RwLock<ListState>>,
}

impl ListReader {
    pub fn snapshot(&self) -> ListState {
        self.state.read().clone()
    }

    pub fn lists(&self) -> Option<Vec<List>> {
        self.state.read().lists.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().lists.is_some()
    }

    pub fn get(&self, slug: &str) -> Option<List> {
        self.state.read().get(slug).cloned()
    }

    pub fn selected(&self) -> Option<List> {
        self.state.read().selected_list().cloned()
    }
}

/// The single write path into the list state
#[derive(Debug, Clone)]
pub struct ListDispatch {
    state: Arc<RwLock<ListState>>,
}

impl ListDispatch {
    pub fn dispatch(&self, action: ListAction) -> Result<(), StoreError> {
        debug!("dispatch {}", action.tag());
        let mut state = self.state.write();
        *state = reduce(&state, action)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn list(slug: &str, name: &str) -> List {
        List::new(format!("id-{}", slug), slug, name)
    }

    fn item(id: &str, title: &str) -> ListItem {
        ListItem {
            id: id.to_string(),
            media_type: MediaType::Movie,
            tmdb_id: 100,
            title: title.to_string(),
            subtitle: None,
            poster_url: None,
        }
    }

    fn faves() -> ListState {
        ListState::new(Some(vec![list("faves", "Faves")]))
    }

    fn titles(state: &ListState, slug: &str) -> Vec<String> {
        state
            .get(slug)
            .map(|l| l.items.iter().map(|i| i.title.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_set_lists_replaces_collection() {
        let state = faves();
        let next = reduce(
            &state,
            ListAction::SetLists {
                lists: vec![list("b", "B")],
            },
        )
        .unwrap();
        assert_eq!(next.lists.as_ref().unwrap().len(), 1);
        assert!(next.get("faves").is_none());
        // input untouched
        assert!(state.get("faves").is_some());
    }

    #[test]
    fn test_add_list_keeps_name_order() {
        let mut state = ListState::default();
        for (slug, name) in [("z", "zombies"), ("a", "Action"), ("m", "musicals"), ("b", "Baking")] {
            state = reduce(&state, ListAction::AddList { list: list(slug, name) }).unwrap();
            let names: Vec<_> = state
                .lists
                .as_ref()
                .unwrap()
                .iter()
                .map(|l| l.name.to_lowercase())
                .collect();
            let mut sorted = names.clone();
            sorted.sort();
            assert_eq!(names, sorted);
        }
        assert_eq!(state.lists.unwrap().len(), 4);
    }

    #[test]
    fn test_add_list_with_known_slug_replaces() {
        let state = reduce(&faves(), ListAction::AddList { list: list("faves", "Faves!") }).unwrap();
        let lists = state.lists.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].name, "Faves!");
    }

    fn names(state: &ListState) -> Vec<String> {
        state
            .lists
            .as_ref()
            .map(|lists| lists.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_set_lists_sorts_lists_and_items() {
        let mut zulu = list("zulu", "Zulu");
        zulu.items = vec![item("1", "Vertigo"), item("2", "alien")];
        let state = reduce(
            &ListState::default(),
            ListAction::SetLists {
                lists: vec![zulu, list("alpha", "Alpha")],
            },
        )
        .unwrap();

        assert_eq!(names(&state), vec!["Alpha", "Zulu"]);
        assert_eq!(titles(&state, "zulu"), vec!["alien", "Vertigo"]);
    }

    #[test]
    fn test_rename_resorts_lists() {
        let state = ListState::new(Some(vec![list("alpha", "Alpha"), list("beta", "Beta")]));
        let mut renamed = list("alpha", "Zulu");
        renamed.items = vec![item("2", "Zodiac"), item("1", "Heat")];

        let state = reduce(
            &state,
            ListAction::UpdateList {
                slug: "alpha".into(),
                list: renamed,
            },
        )
        .unwrap();

        assert_eq!(names(&state), vec!["Beta", "Zulu"]);
        assert_eq!(titles(&state, "alpha"), vec!["Heat", "Zodiac"]);
    }

    #[test]
    fn test_update_list_keeps_slugs_unique() {
        let state = ListState::new(Some(vec![list("alpha", "Alpha"), list("beta", "Beta")]));
        let state = reduce(
            &state,
            ListAction::UpdateList {
                slug: "alpha".into(),
                list: list("beta", "Beta again"),
            },
        )
        .unwrap();

        let lists = state.lists.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].slug, "beta");
        assert_eq!(lists[0].name, "Beta again");
    }

    #[test]
    fn test_add_list_sorts_its_items() {
        let mut later = list("later", "Later");
        later.items = vec![item("1", "Zodiac"), item("2", "Amélie")];
        let state = reduce(&ListState::default(), ListAction::AddList { list: later }).unwrap();
        assert_eq!(titles(&state, "later"), vec!["Amélie", "Zodiac"]);
    }

    #[test]
    fn test_add_list_item_scenario() {
        let state = faves();
        let state = reduce(
            &state,
            ListAction::AddListItem {
                slug: "faves".into(),
                item: item("1", "Zeta"),
            },
        )
        .unwrap();
        let state = reduce(
            &state,
            ListAction::AddListItem {
                slug: "faves".into(),
                item: item("2", "Alpha"),
            },
        )
        .unwrap();
        assert_eq!(titles(&state, "faves"), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_add_list_item_keeps_title_order() {
        let mut state = faves();
        for (i, title) in ["delta", "Bravo", "echo", "alpha", "Charlie"].iter().enumerate() {
            state = reduce(
                &state,
                ListAction::AddListItem {
                    slug: "faves".into(),
                    item: item(&i.to_string(), title),
                },
            )
            .unwrap();
            let lower: Vec<_> = titles(&state, "faves").iter().map(|t| t.to_lowercase()).collect();
            let mut sorted = lower.clone();
            sorted.sort();
            assert_eq!(lower, sorted);
        }
    }

    #[test]
    fn test_remove_then_add_restores_items() {
        let mut state = faves();
        for (id, title) in [("1", "Heat"), ("2", "Alien"), ("3", "Ran")] {
            state = reduce(
                &state,
                ListAction::AddListItem {
                    slug: "faves".into(),
                    item: item(id, title),
                },
            )
            .unwrap();
        }
        let before = state.get("faves").unwrap().items.clone();

        let removed = reduce(
            &state,
            ListAction::RemoveListItem {
                slug: "faves".into(),
                item_id: "2".into(),
            },
        )
        .unwrap();
        assert_eq!(titles(&removed, "faves"), vec!["Heat", "Ran"]);

        let restored = reduce(
            &removed,
            ListAction::AddListItem {
                slug: "faves".into(),
                item: item("2", "Alien"),
            },
        )
        .unwrap();
        assert_eq!(restored.get("faves").unwrap().items, before);
    }

    #[test]
    fn test_not_found_before_lists_load() {
        let empty = ListState::default();
        let actions = vec![
            ListAction::UpdateList {
                slug: "x".into(),
                list: list("x", "X"),
            },
            ListAction::RemoveList { slug: "x".into() },
            ListAction::AddListItem {
                slug: "x".into(),
                item: item("1", "A"),
            },
            ListAction::RemoveListItem {
                slug: "x".into(),
                item_id: "1".into(),
            },
        ];
        for action in actions {
            assert_eq!(reduce(&empty, action), Err(StoreError::NotFound));
        }
    }

    #[test]
    fn test_unknown_slug_is_noop() {
        let state = faves();
        let actions = vec![
            ListAction::UpdateList {
                slug: "nope".into(),
                list: list("nope", "Nope"),
            },
            ListAction::RemoveList { slug: "nope".into() },
            ListAction::AddListItem {
                slug: "nope".into(),
                item: item("1", "A"),
            },
            ListAction::RemoveListItem {
                slug: "faves".into(),
                item_id: "missing".into(),
            },
        ];
        for action in actions {
            assert_eq!(reduce(&state, action).unwrap(), state);
        }
    }

    #[test]
    fn test_update_and_remove_list() {
        let state = ListState::new(Some(vec![list("faves", "Faves"), list("later", "Later")]));
        let renamed = reduce(
            &state,
            ListAction::UpdateList {
                slug: "faves".into(),
                list: list("faves", "Favourites"),
            },
        )
        .unwrap();
        assert_eq!(renamed.get("faves").unwrap().name, "Favourites");
        assert_eq!(renamed.get("later").unwrap().name, "Later");

        let removed = reduce(&renamed, ListAction::RemoveList { slug: "later".into() }).unwrap();
        assert!(removed.get("later").is_none());
        assert_eq!(removed.lists.unwrap().len(), 1);
    }

    #[test]
    fn test_selection() {
        let state = reduce(&faves(), ListAction::SetSelectedList { slug: "faves".into() }).unwrap();
        assert_eq!(state.selected_list().map(|l| l.name.as_str()), Some("Faves"));
        let state = reduce(&state, ListAction::ClearSelectedList).unwrap();
        assert!(state.selected.is_none());
    }

    #[test]
    fn test_unhandled_action_from_json() {
        let action: ListAction = serde_json::from_str(r#"{"type":"RENAME_EVERYTHING"}"#).unwrap();
        assert_eq!(action, ListAction::Unhandled);
        assert!(matches!(
            reduce(&faves(), action),
            Err(StoreError::UnhandledAction(_))
        ));
    }

    #[test]
    fn test_action_json_shape() {
        let json = r#"{"type":"REMOVE_LIST_ITEM","slug":"faves","itemId":"1"}"#;
        let action: ListAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ListAction::RemoveListItem {
                slug: "faves".into(),
                item_id: "1".into()
            }
        );
        let clear: ListAction = serde_json::from_str(r#"{"type":"CLEAR_SELECTED_LIST"}"#).unwrap();
        assert_eq!(clear, ListAction::ClearSelectedList);
    }

    #[test]
    fn test_store_handles_share_state() {
        let store = ListStore::new(faves());
        let reader = store.reader();
        let dispatch = store.dispatcher();

        dispatch
            .dispatch(ListAction::AddListItem {
                slug: "faves".into(),
                item: item("1", "Heat"),
            })
            .unwrap();
        assert_eq!(reader.get("faves").unwrap().items.len(), 1);

        let err = store
            .dispatcher()
            .dispatch(ListAction::Unhandled)
            .unwrap_err();
        assert!(matches!(err, StoreError::UnhandledAction(_)));
        // failed dispatch leaves state alone
        assert_eq!(reader.get("faves").unwrap().items.len(), 1);
    }
}
