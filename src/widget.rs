//! Event wiring for the search widget
//!
//! The widget has two handlers: a form submission that searches shows and
//! repopulates the show list, and a click handler delegated from the show list
//! that fetches the clicked show's episodes. Overlapping requests are ordered
//! per region group: a response is only rendered if no newer request for the
//! same group has started in the meantime.

use crate::WidgetError;
use crate::rendering::{DisplayRegion, WidgetRegions, populate_episodes, populate_shows};
use crate::show_lookup::ShowLookup;
use scraper::{ElementRef, Html, Selector};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Selector of the control that requests a show's episodes
pub const EPISODES_CONTROL_SELECTOR: &str = ".Show-getEpisodes";

/// Class of the container that carries a show's identifier
const SHOW_CONTAINER_CLASS: &str = "Show";

/// Attribute holding the show identifier on the container
const SHOW_ID_ATTRIBUTE: &str = "data-show-id";

/// The search form's current field values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    /// Contents of the search term input
    pub term: String,
}

impl SearchForm {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}

/// A form submission
///
/// Handlers call `prevent_default` to keep the host from navigating away.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A click inside the show list
///
/// The clicked element is identified by a CSS selector evaluated against the
/// show list's current markup; the first match is the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: String,
}

impl ClickEvent {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// A click on the "Episodes" control of the given show
    pub fn on_episodes_control(show_id: u64) -> Self {
        Self::new(format!(
            r#"[{SHOW_ID_ATTRIBUTE}="{show_id}"] {EPISODES_CONTROL_SELECTOR}"#
        ))
    }
}

/// What a handler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// The response was rendered; `count` records were displayed
    Rendered { count: usize },
    /// A newer request for the same regions started before this one finished
    Superseded,
    /// The event did not concern this handler
    Ignored,
}

/// Hands out tickets and remembers which one is the latest
#[derive(Debug, Default)]
struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    /// Invalidates every ticket handed out so far
    fn supersede(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

/// The show search widget
///
/// Owns the lookup service and the display regions it renders into. All
/// handlers take `&self`, so a widget can be shared between threads when its
/// lookup and regions allow it.
pub struct SearchWidget<L, R> {
    lookup: L,
    regions: Mutex<WidgetRegions<R>>,
    searches: RequestSequence,
    episode_fetches: RequestSequence,
}

impl<L, R> SearchWidget<L, R>
where
    L: ShowLookup,
    R: DisplayRegion,
{
    /// Creates a widget rendering into the given regions
    pub fn new(lookup: L, regions: WidgetRegions<R>) -> Self {
        Self {
            lookup,
            regions: Mutex::new(regions),
            searches: RequestSequence::default(),
            episode_fetches: RequestSequence::default(),
        }
    }

    /// Locks and returns the display regions
    pub fn regions(&self) -> MutexGuard<'_, WidgetRegions<R>> {
        self.regions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consumes the widget and returns its display regions
    pub fn into_regions(self) -> WidgetRegions<R> {
        self.regions
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Handles a submission of the search form
    ///
    /// Prevents the default navigation and runs exactly one search with the
    /// form's term.
    pub fn on_search_submit(
        &self,
        form: &SearchForm,
        event: &mut SubmitEvent,
    ) -> Result<HandlerOutcome, WidgetError> {
        event.prevent_default();
        self.search_for_show_and_display(&form.term)
    }

    /// Searches shows, hides the episode area and displays the results
    ///
    /// On error nothing is rendered and the regions keep their prior state.
    pub fn search_for_show_and_display(&self, term: &str) -> Result<HandlerOutcome, WidgetError> {
        let ticket = self.searches.begin();
        let shows = self.lookup.search_shows(term)?;

        let mut regions = self.regions();
        if !self.searches.is_latest(ticket) {
            debug!(term, ticket, "discarding superseded search result");
            return Ok(HandlerOutcome::Superseded);
        }

        // Episodes still in flight belong to the show list being replaced.
        self.episode_fetches.supersede();
        populate_shows(&mut regions.shows_list, &shows)?;
        regions.episodes_area.hide();

        info!(term, count = shows.len(), "displayed search results");
        Ok(HandlerOutcome::Rendered { count: shows.len() })
    }

    /// Handles a click delegated from the show list
    ///
    /// Clicks on anything other than an "Episodes" control are ignored. For the
    /// control, the show identifier is read from the nearest enclosing show
    /// container and that show's episodes are displayed.
    pub fn on_shows_list_click(&self, event: &ClickEvent) -> Result<HandlerOutcome, WidgetError> {
        let markup = self.regions().shows_list.inner_html();

        match show_id_for_click(&markup, &event.target)? {
            Some(show_id) => self.get_episodes_and_display(show_id),
            None => {
                debug!(selector = %event.target, "click outside an episodes control");
                Ok(HandlerOutcome::Ignored)
            }
        }
    }

    /// Fetches a show's episodes, displays them and scrolls them into view
    pub fn get_episodes_and_display(&self, show_id: u64) -> Result<HandlerOutcome, WidgetError> {
        let ticket = self.episode_fetches.begin();
        let episodes = self.lookup.episodes_of_show(show_id)?;

        let mut regions = self.regions();
        if !self.episode_fetches.is_latest(ticket) {
            debug!(show_id, ticket, "discarding superseded episode list");
            return Ok(HandlerOutcome::Superseded);
        }

        let WidgetRegions {
            episodes_list,
            episodes_area,
            ..
        } = &mut *regions;
        populate_episodes(episodes_list, episodes_area, &episodes)?;

        info!(show_id, count = episodes.len(), "displayed episodes");
        Ok(HandlerOutcome::Rendered {
            count: episodes.len(),
        })
    }
}

/// Resolves the show identifier for a click on the element matching `target`
///
/// Returns `None` when no element matches or the element is not an episodes
/// control.
fn show_id_for_click(markup: &str, target: &str) -> Result<Option<u64>, WidgetError> {
    let target_selector = parse_selector(target)?;
    let control_selector = parse_selector(EPISODES_CONTROL_SELECTOR)?;

    let fragment = Html::parse_fragment(markup);
    let Some(clicked) = fragment.select(&target_selector).next() else {
        return Ok(None);
    };

    // The click may land on a child of the control, like the real event target.
    let Some(control) = std::iter::once(clicked)
        .chain(clicked.ancestors().filter_map(ElementRef::wrap))
        .find(|element| control_selector.matches(element))
    else {
        return Ok(None);
    };

    let container = control
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().classes().any(|c| c == SHOW_CONTAINER_CLASS))
        .ok_or(WidgetError::MissingShowId)?;

    let raw_id = container
        .value()
        .attr(SHOW_ID_ATTRIBUTE)
        .ok_or(WidgetError::MissingShowId)?;

    raw_id
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| WidgetError::InvalidShowId(raw_id.to_string()))
}

fn parse_selector(selector: &str) -> Result<Selector, WidgetError> {
    Selector::parse(selector).map_err(|e| WidgetError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
