//! Data structures and traits for TV show lookup.
//!
//! This module provides the normalized show and episode records the widget
//! displays, as well as the trait for services that can search shows and
//! fetch their episodes.

mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{DEFAULT_BASE_URL, MISSING_IMAGE_URL, TvMazeClient};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the show database.
#[derive(Debug, Error)]
pub enum TvMazeError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("HTTP {status} {reason} for {url}")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    /// Failed to parse the API's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

impl TvMazeError {
    /// Returns true when the API reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TvMazeError::HttpStatus { status: 404, .. })
    }
}

/// A TV show as displayed in the show list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// TVMaze show identifier
    pub id: u64,
    /// The name of the show
    pub name: String,
    /// Summary, may contain HTML markup
    pub summary: String,
    /// URL of the poster image, or the placeholder when the show has none
    pub image: String,
    /// Name of the broadcasting network, or "Unknown"
    pub network: String,
}

/// A single episode as displayed in the episode list.
///
/// Season and number are kept exactly as the API returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// TVMaze episode identifier
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season value as received
    pub season: serde_json::Value,
    /// The episode number as received
    pub number: serde_json::Value,
}

/// Trait for services that can search shows and list their episodes.
///
/// The widget only talks to this trait, so hosts and tests can swap the
/// network-backed client for something else.
pub trait ShowLookup {
    /// Searches shows matching the given term.
    ///
    /// An empty result is not an error and yields an empty vector.
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, TvMazeError>;

    /// Fetches all episodes of the show with the given identifier.
    ///
    /// # Errors
    ///
    /// Unknown identifiers surface as `TvMazeError::HttpStatus` with status 404.
    fn episodes_of_show(&self, show_id: u64) -> Result<Vec<Episode>, TvMazeError>;
}

impl<T: ShowLookup + ?Sized> ShowLookup for &T {
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, TvMazeError> {
        (**self).search_shows(term)
    }

    fn episodes_of_show(&self, show_id: u64) -> Result<Vec<Episode>, TvMazeError> {
        (**self).episodes_of_show(show_id)
    }
}
