//! Rendering of shows and episodes into display regions
//!
//! A display region is a container whose contents are fully replaced on every
//! render call. The render functions never look regions up themselves; the
//! caller passes the target region in.

use crate::show_lookup::{Episode, Show};
use askama::Template;
use std::borrow::Cow;
use tracing::debug;

/// How a region should be scrolled into the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Jump immediately
    Instant,
    /// Animate the scroll
    Smooth,
}

/// A container on the page whose contents can be replaced
pub trait DisplayRegion {
    /// Removes all contents
    fn empty(&mut self);

    /// Appends a markup fragment after the current contents
    fn append(&mut self, html: &str);

    /// Replaces the contents with the given markup in one pass
    fn set_html(&mut self, html: &str);

    /// Returns the current markup
    fn inner_html(&self) -> String;

    fn show(&mut self);

    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    /// Requests that the region is scrolled into the viewport
    fn scroll_into_view(&mut self, behavior: ScrollBehavior);
}

/// In-memory display region holding its markup as a string
///
/// Used by the CLI to produce static pages and by tests to observe what the
/// widget rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRegion {
    id: String,
    html: String,
    visible: bool,
    scroll_requests: Vec<ScrollBehavior>,
}

impl HtmlRegion {
    /// Creates an empty, visible region with the given element id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: String::new(),
            visible: true,
            scroll_requests: Vec::new(),
        }
    }

    /// Creates an empty region that starts out hidden
    pub fn hidden(id: impl Into<String>) -> Self {
        Self {
            visible: false,
            ..Self::new(id)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// All scroll requests received so far, oldest first
    pub fn scroll_requests(&self) -> &[ScrollBehavior] {
        &self.scroll_requests
    }
}

impl DisplayRegion for HtmlRegion {
    fn empty(&mut self) {
        self.html.clear();
    }

    fn append(&mut self, html: &str) {
        self.html.push_str(html);
    }

    fn set_html(&mut self, html: &str) {
        self.html.clear();
        self.html.push_str(html);
    }

    fn inner_html(&self) -> String {
        self.html.clone()
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn scroll_into_view(&mut self, behavior: ScrollBehavior) {
        self.scroll_requests.push(behavior);
    }
}

/// The regions the widget renders into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRegions<R> {
    /// Receives one fragment per show
    pub shows_list: R,
    /// Receives one list entry per episode
    pub episodes_list: R,
    /// Wraps the episode list; hidden until episodes are shown
    pub episodes_area: R,
}

impl WidgetRegions<HtmlRegion> {
    /// The default page layout: empty show list, hidden episode area
    pub fn new() -> Self {
        Self {
            shows_list: HtmlRegion::new("showsList"),
            episodes_list: HtmlRegion::new("episodesList"),
            episodes_area: HtmlRegion::hidden("episodesArea"),
        }
    }
}

impl Default for WidgetRegions<HtmlRegion> {
    fn default() -> Self {
        Self::new()
    }
}

/// Markup of a single show, including its "Episodes" button
#[derive(Template)]
#[template(path = "partials/show.html")]
struct ShowTemplate<'a> {
    show: &'a Show,
}

/// List entry of a single episode
#[derive(Template)]
#[template(path = "partials/episode.html")]
struct EpisodeTemplate<'a> {
    name: &'a str,
    season: Cow<'a, str>,
    number: Cow<'a, str>,
}

/// The whole widget page
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    term: &'a str,
    shows_id: &'a str,
    shows: String,
    area_id: &'a str,
    episodes_visible: bool,
    list_id: &'a str,
    episodes: String,
}

/// Generates the markup for a single show, including its "Episodes" button
///
/// The show identifier is attached as `data-show-id` on the outer `.Show`
/// container, which is where the click handler looks it up. The summary is
/// inserted as markup; every other field is escaped.
pub fn generate_show_html(show: &Show) -> Result<String, askama::Error> {
    ShowTemplate { show }.render()
}

/// Generates the list entry for a single episode
///
/// The entry's class encodes season and number, e.g. `episode-1-2`.
pub fn generate_episode_html(episode: &Episode) -> Result<String, askama::Error> {
    EpisodeTemplate {
        name: &episode.name,
        season: display_value(&episode.season),
        number: display_value(&episode.number),
    }
    .render()
}

/// Clears the region and appends one fragment per show
///
/// All fragments are rendered before the region is touched, so a failed
/// render leaves the previous contents in place.
pub fn populate_shows<R: DisplayRegion + ?Sized>(
    shows_list: &mut R,
    shows: &[Show],
) -> Result<(), askama::Error> {
    let fragments = shows
        .iter()
        .map(generate_show_html)
        .collect::<Result<Vec<_>, _>>()?;

    shows_list.empty();
    for fragment in &fragments {
        shows_list.append(fragment);
    }

    debug!(count = shows.len(), "rendered show list");
    Ok(())
}

/// Replaces the episode list, reveals the episode area and scrolls to the list
pub fn populate_episodes<R: DisplayRegion + ?Sized>(
    episodes_list: &mut R,
    episodes_area: &mut R,
    episodes: &[Episode],
) -> Result<(), askama::Error> {
    let episodes_html = episodes
        .iter()
        .map(generate_episode_html)
        .collect::<Result<String, _>>()?;

    episodes_list.empty();
    episodes_list.set_html(&episodes_html);
    episodes_area.show();

    episodes_list.scroll_into_view(ScrollBehavior::Smooth);

    debug!(count = episodes.len(), "rendered episode list");
    Ok(())
}

/// Renders the complete widget page around the given regions
///
/// The search term is placed in the form's input so the snapshot shows what
/// was searched for.
pub fn render_document(
    term: &str,
    regions: &WidgetRegions<HtmlRegion>,
) -> Result<String, askama::Error> {
    PageTemplate {
        term,
        shows_id: regions.shows_list.id(),
        shows: regions.shows_list.inner_html(),
        area_id: regions.episodes_area.id(),
        episodes_visible: regions.episodes_area.is_visible(),
        list_id: regions.episodes_list.id(),
        episodes: regions.episodes_list.inner_html(),
    }
    .render()
}

/// Formats an untyped API value the way it reads on the page
///
/// Strings appear without their JSON quotes; everything else uses its JSON
/// text, so a missing number shows up as `null`.
pub fn display_value(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}
