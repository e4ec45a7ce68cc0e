//! TVMaze show lookup implementation.

use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult, TvMazeShow};
use super::{Episode, Show, ShowLookup, TvMazeError};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Base URL of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Image shown for shows the API has no poster for.
pub const MISSING_IMAGE_URL: &str = "https://tinyurl.com/missing-tv";

/// Network name used when the API provides none.
const UNKNOWN_NETWORK: &str = "Unknown";

/// Title used for episodes the API has no name for.
const UNKNOWN_EPISODE_NAME: &str = "Unknown";

/// Show lookup backed by the TVMaze API.
///
/// Every call issues exactly one GET request below the configured base URL.
/// There is no caching, retrying or paging.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    client: reqwest::blocking::Client,
    base_url: String,
    missing_image_url: String,
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TvMazeClient {
    /// Creates a client talking to the public TVMaze API.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            missing_image_url: MISSING_IMAGE_URL.to_string(),
        }
    }

    /// Points the client at another API root (a mirror or a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the placeholder used for shows without an image.
    pub fn with_missing_image_url(mut self, url: impl Into<String>) -> Self {
        self.missing_image_url = url.into();
        self
    }

    /// Returns the API root this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues a GET request for `path` below the base URL and parses the JSON body.
    ///
    /// Non-success statuses are reported as `TvMazeError::HttpStatus`; the body
    /// of such responses is not inspected.
    pub fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, TvMazeError>
    where
        T: DeserializeOwned,
    {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        debug!(%url, ?query, "GET");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TvMazeError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url,
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| TvMazeError::Parse(e.to_string()))
    }

    /// Converts a TVMaze show to our display record, filling in defaults.
    fn convert_show(&self, show: TvMazeShow) -> Show {
        Show {
            id: show.id,
            name: show.name,
            summary: show.summary.unwrap_or_default(),
            image: show
                .image
                .and_then(|image| image.medium)
                .unwrap_or_else(|| self.missing_image_url.clone()),
            network: show
                .network
                .map(|network| network.name)
                .unwrap_or_else(|| UNKNOWN_NETWORK.to_string()),
        }
    }

    fn convert_episode(episode: TvMazeEpisode) -> Episode {
        Episode {
            id: episode.id,
            name: episode
                .name
                .unwrap_or_else(|| UNKNOWN_EPISODE_NAME.to_string()),
            season: episode.season,
            number: episode.number,
        }
    }
}

impl ShowLookup for TvMazeClient {
    fn search_shows(&self, term: &str) -> Result<Vec<Show>, TvMazeError> {
        let results: Vec<TvMazeSearchResult> = self.get_json("search/shows", &[("q", term)])?;

        Ok(results
            .into_iter()
            .map(|result| self.convert_show(result.show))
            .collect())
    }

    fn episodes_of_show(&self, show_id: u64) -> Result<Vec<Episode>, TvMazeError> {
        let episodes: Vec<TvMazeEpisode> =
            self.get_json(&format!("shows/{show_id}/episodes"), &[])?;

        Ok(episodes.into_iter().map(Self::convert_episode).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Starts a mock server on its own runtime so the blocking client can be
    /// used from the test thread.
    fn start_server(mocks: Vec<Mock>) -> (tokio::runtime::Runtime, MockServer) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for mock in mocks {
                mock.mount(&server).await;
            }
            server
        });
        (runtime, server)
    }

    #[test]
    fn test_episode_values_are_not_coerced() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/shows/1000/episodes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "id": 1, "name": "A", "season": "B", "number": 10 }
                ]))),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let episodes = client.episodes_of_show(1000).unwrap();

        assert_eq!(
            episodes,
            vec![Episode {
                id: 1,
                name: "A".to_string(),
                season: json!("B"),
                number: json!(10),
            }]
        );
    }

    #[test]
    fn test_untitled_episode_keeps_the_list() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/shows/5/episodes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "id": 1, "name": "Pilot", "season": 1, "number": 1 },
                    { "id": 2, "name": null, "season": 1, "number": 2 }
                ]))),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let episodes = client.episodes_of_show(5).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].name, "Pilot");
        assert_eq!(episodes[1].name, "Unknown");
        assert_eq!(episodes[1].number, json!(2));
    }

    #[test]
    fn test_empty_term_is_sent_as_is() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/search/shows"))
                .and(query_param("q", ""))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "score": 0.1, "show": { "id": 3, "name": "Blank", "summary": "<p>Blank</p>" } }
                ])))
                .expect(1),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let shows = client.search_shows("").unwrap();

        assert_eq!(
            shows,
            vec![Show {
                id: 3,
                name: "Blank".to_string(),
                summary: "<p>Blank</p>".to_string(),
                image: MISSING_IMAGE_URL.to_string(),
                network: "Unknown".to_string(),
            }]
        );
    }

    #[test]
    fn test_search_substitutes_defaults() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/search/shows"))
                .and(query_param("q", "House"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {
                        "score": 0.9,
                        "show": {
                            "id": 118,
                            "name": "House",
                            "summary": "<p>A <b>medical</b> drama.</p>",
                            "image": { "medium": "https://static.tvmaze.com/house.jpg" },
                            "network": { "id": 4, "name": "FOX" }
                        }
                    },
                    {
                        "score": 0.5,
                        "show": {
                            "id": 23583,
                            "name": "House Hunters",
                            "summary": null,
                            "image": null,
                            "network": null
                        }
                    }
                ]))),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let shows = client.search_shows("House").unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].id, 118);
        assert_eq!(shows[0].summary, "<p>A <b>medical</b> drama.</p>");
        assert_eq!(shows[0].image, "https://static.tvmaze.com/house.jpg");
        assert_eq!(shows[0].network, "FOX");

        assert_eq!(shows[1].id, 23583);
        assert_eq!(shows[1].summary, "");
        assert_eq!(shows[1].image, MISSING_IMAGE_URL);
        assert_eq!(shows[1].network, "Unknown");
    }

    #[test]
    fn test_custom_missing_image_url() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/search/shows"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "show": { "id": 7, "name": "Seven", "image": { "medium": null } } }
                ]))),
        ]);
        let client = TvMazeClient::new()
            .with_base_url(format!("{}/", server.uri()))
            .with_missing_image_url("https://example.org/none.png");

        let shows = client.search_shows("seven").unwrap();

        assert_eq!(shows[0].image, "https://example.org/none.png");
        assert_eq!(shows[0].network, "Unknown");
    }

    #[test]
    fn test_search_without_matches_is_empty() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/search/shows"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([]))),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let shows = client.search_shows("squeamish ossifrage").unwrap();

        assert!(shows.is_empty());
    }

    #[test]
    fn test_unknown_show_is_not_found() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/shows/0/episodes"))
                .respond_with(ResponseTemplate::new(404)),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let error = client.episodes_of_show(0).unwrap_err();

        assert!(error.is_not_found());
        assert!(error.to_string().contains("404"));
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/search/shows"))
                .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>")),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let error = client.search_shows("oops").unwrap_err();

        assert!(matches!(error, TvMazeError::Parse(_)));
    }

    #[test]
    fn test_parse_error_names_the_failing_field() {
        let (_runtime, server) = start_server(vec![
            Mock::given(method("GET"))
                .and(path("/shows/9/episodes"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "name": "No id", "season": 1, "number": 1 }
                ]))),
        ]);
        let client = TvMazeClient::new().with_base_url(server.uri());

        let error = client.episodes_of_show(9).unwrap_err();

        match error {
            TvMazeError::Parse(message) => assert!(message.contains("missing field `id`")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
