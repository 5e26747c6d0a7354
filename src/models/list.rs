//! List and list item models

use serde::{Deserialize, Serialize};

use super::{MediaItem, MediaType};
use crate::utils::collate;

/// One media reference attached to a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Unique within the parent list only
    pub id: String,
    pub media_type: MediaType,
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl ListItem {
    /// Descriptor for opening the remove modal on this item
    pub fn to_media_item(&self) -> MediaItem {
        MediaItem {
            media_type: self.media_type,
            tmdb_id: self.tmdb_id,
            title: self.title.clone(),
            sub_title: self.subtitle.clone(),
            poster: self.poster_url.clone(),
            db_id: Some(self.id.clone()),
        }
    }
}

/// A named, user-owned collection of media references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    /// Internal identifier
    pub id: String,
    /// Unique user-facing identifier derived from the name
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<ListItem>,
}

impl List {
    pub fn new(id: impl Into<String>, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&ListItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Whether the list already holds this catalog entry
    pub fn contains_media(&self, media_type: MediaType, tmdb_id: u64) -> bool {
        self.items
            .iter()
            .any(|i| i.media_type == media_type && i.tmdb_id == tmdb_id)
    }

    pub fn sort_items(&mut self) {
        sort_items(&mut self.items);
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug && self.name == other.name && self.items == other.items
    }
}

impl Eq for List {}

/// Sort lists by name (stable, case-insensitive)
pub fn sort_lists(lists: &mut [List]) {
    lists.sort_by(|a, b| collate::compare(&a.name, &b.name));
}

/// Sort items by title (stable, case-insensitive)
pub fn sort_items(items: &mut [ListItem]) {
    items.sort_by(|a, b| collate::compare(&a.title, &b.title));
}

/// Body for `POST /list-item/{slug}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListItem {
    pub media_type: MediaType,
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl From<&MediaItem> for NewListItem {
    fn from(item: &MediaItem) -> Self {
        Self {
            media_type: item.media_type,
            tmdb_id: item.tmdb_id,
            title: item.title.clone(),
            subtitle: item.sub_title.clone().filter(|s| !s.is_empty()),
            poster_url: item.poster.clone().filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str) -> ListItem {
        ListItem {
            id: id.to_string(),
            media_type: MediaType::Movie,
            tmdb_id: 1,
            title: title.to_string(),
            subtitle: None,
            poster_url: None,
        }
    }

    #[test]
    fn test_list_without_items_field() {
        let json = r#"{"id":"a1","slug":"faves","name":"Faves"}"#;
        let list: List = serde_json::from_str(json).unwrap();
        assert_eq!(list.slug, "faves");
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_list_item_wire_format() {
        let json = r#"{"id":"9","mediaType":"MOVIE","tmdbId":42,"title":"Dune","posterUrl":"/d.jpg"}"#;
        let parsed: ListItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.tmdb_id, 42);
        assert_eq!(parsed.poster_url.as_deref(), Some("/d.jpg"));

        let out = serde_json::to_value(&parsed).unwrap();
        assert_eq!(out["mediaType"], "MOVIE");
        assert!(out.get("subtitle").is_none());
    }

    #[test]
    fn test_sort_items_case_insensitive() {
        let mut items = vec![item("1", "zeta"), item("2", "Alpha"), item("3", "beta")];
        sort_items(&mut items);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_new_list_item_drops_empty_fields() {
        let media = MediaItem::new(MediaType::Tv, 7, "Dark")
            .with_subtitle("")
            .with_poster("/p.jpg");
        let body = NewListItem::from(&media);
        assert!(body.subtitle.is_none());
        assert_eq!(body.poster_url.as_deref(), Some("/p.jpg"));
    }

    #[test]
    fn test_to_media_item_carries_db_id() {
        let media = item("5", "Heat").to_media_item();
        assert_eq!(media.db_id.as_deref(), Some("5"));
        assert_eq!(media.title, "Heat");
    }
}
