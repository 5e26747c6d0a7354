//! Media item model

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of external catalog entity a list item points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    #[serde(alias = "movie")]
    Movie,
    #[serde(alias = "tv")]
    Tv,
    #[serde(alias = "person")]
    Person,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
        }
    }

    /// Badge label shown next to the item title
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "TV Show",
            MediaType::Person => "Person",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown media type '{0}'")]
pub struct UnknownMediaType(pub String);

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            "person" => Ok(MediaType::Person),
            _ => Err(UnknownMediaType(s.to_string())),
        }
    }
}

/// Descriptor handed to the list modal by a detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub tmdb_id: u64,
    pub title: String,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    /// Id of the stored list item, set when the descriptor comes from a list
    #[serde(default)]
    pub db_id: Option<String>,
}

impl MediaItem {
    pub fn new(media_type: MediaType, tmdb_id: u64, title: impl Into<String>) -> Self {
        Self {
            media_type,
            tmdb_id,
            title: title.into(),
            sub_title: None,
            poster: None,
            db_id: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.sub_title = Some(subtitle.into());
        self
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    pub fn with_db_id(mut self, id: impl Into<String>) -> Self {
        self.db_id = Some(id.into());
        self
    }
}
