//! tvmaze_widget - Search TV shows and browse their episodes
//!
//! This library provides the pieces of a small show-search widget backed by
//! the public TVMaze API: a lookup service for shows and episodes, rendering
//! of both into display regions, and the event handlers tying them together.
//!
//! # Examples
//!
//! ```no_run
//! use tvmaze_widget::{
//!     ClickEvent, DisplayRegion, SearchForm, SearchWidget, SubmitEvent, TvMazeClient,
//!     WidgetRegions,
//! };
//!
//! let widget = SearchWidget::new(TvMazeClient::new(), WidgetRegions::new());
//!
//! // The user searches for a show...
//! let mut submit = SubmitEvent::new();
//! widget.on_search_submit(&SearchForm::new("House"), &mut submit)?;
//!
//! // ...and asks for the episodes of one of the results
//! widget.on_shows_list_click(&ClickEvent::on_episodes_control(118))?;
//!
//! println!("{}", widget.regions().episodes_list.inner_html());
//! # Ok::<(), tvmaze_widget::WidgetError>(())
//! ```

mod rendering;
mod show_lookup;
mod widget;

pub use rendering::{
    DisplayRegion, HtmlRegion, ScrollBehavior, WidgetRegions, display_value,
    generate_episode_html, generate_show_html, populate_episodes, populate_shows,
    render_document,
};
pub use show_lookup::{
    DEFAULT_BASE_URL, Episode, MISSING_IMAGE_URL, Show, ShowLookup, TvMazeClient, TvMazeError,
};
pub use widget::{
    ClickEvent, EPISODES_CONTROL_SELECTOR, HandlerOutcome, SearchForm, SearchWidget, SubmitEvent,
};

use thiserror::Error;

/// Top-level error type for widget operations
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Error while searching shows or fetching episodes
    #[error("Show lookup error: {0}")]
    Lookup(#[from] TvMazeError),

    /// A fragment or page template failed to render
    #[error("Rendering error: {0}")]
    Render(#[from] askama::Error),

    /// A click target could not be parsed as a CSS selector
    #[error("Invalid click target '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The clicked control is not inside a show carrying an identifier
    #[error("Clicked control has no enclosing show with an identifier")]
    MissingShowId,

    /// The show identifier attached to the markup is not a number
    #[error("Invalid show identifier: {0}")]
    InvalidShowId(String),
}
