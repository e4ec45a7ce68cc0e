//! Wire shapes of the two TVMaze endpoints the widget calls.
//!
//! Only the fields the widget displays are modelled; serde skips the rest.
//! Anything TVMaze may send as null is optional or defaults to `Value::Null`.

use serde::Deserialize;

/// One entry of the `search/shows` response.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show
    pub show: TvMazeShow,
}

/// A show as embedded in a search result.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    pub name: String,
    /// Summary in HTML format (may be null)
    #[serde(default)]
    pub summary: Option<String>,
    /// Poster images (null when the show has none)
    #[serde(default)]
    pub image: Option<TvMazeImage>,
    /// Broadcasting network (null for web-only shows)
    #[serde(default)]
    pub network: Option<TvMazeNetwork>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    #[serde(default)]
    pub medium: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvMazeNetwork {
    pub name: String,
}

/// A single episode from the `shows/{id}/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    #[serde(default)]
    pub name: Option<String>,
    /// Season number (0 for specials), kept untyped
    #[serde(default)]
    pub season: serde_json::Value,
    /// Episode number within the season (null for specials), kept untyped
    #[serde(default)]
    pub number: serde_json::Value,
}
