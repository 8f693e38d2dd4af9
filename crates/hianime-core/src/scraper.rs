//! Main scraper API for hianime
//!
//! The `try_*` methods run the resolution pipeline and report failures as
//! [`HianimeError`]. The plain methods are the query surface handed to host
//! applications: they log the failure and return an empty collection.

use std::collections::BTreeMap;

use futures_util::future::join_all;

use crate::client::{ClientConfig, HianimeClient, PLAYBACK_USER_AGENT};
use crate::error::{HianimeError, Result};
use crate::parser::{
    infer_stream_type, parse_anime_data_id, parse_episodes, parse_search_results,
    parse_server_items, parse_subtitle_tracks, quality_label, resolve_video_url, EpisodePages,
};
use crate::text::decode_html;
use crate::types::{
    Episode, EpisodeListResponse, EpisodeSourcesResponse, SearchResult, ServerItem,
    StreamQuality, StreamingSource, SubtitleTrack,
};
use crate::url::{
    build_episode_list_url, build_episode_sources_url, build_search_url, build_watch_url,
    resolve_url,
};

/// Main scraper API for hianime
///
/// Holds no mutable state, so one instance can serve concurrent calls.
pub struct HianimeScraper {
    client: HianimeClient,
}

impl HianimeScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        let client = HianimeClient::new()?;
        Ok(Self { client })
    }

    /// Create a new scraper with custom client configuration
    ///
    /// # Errors
    /// Returns error if the base URL is not absolute or the HTTP client
    /// cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = HianimeClient::with_config(config)?;
        Ok(Self { client })
    }

    /// Create a scraper around an existing client
    pub fn with_client(client: HianimeClient) -> Self {
        Self { client }
    }

    /// Site origin this scraper talks to
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Search for titles by query
    ///
    /// Never fails: any error is logged and an empty vector returned.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> hianime_core::Result<()> {
    /// use hianime_core::HianimeScraper;
    /// let scraper = HianimeScraper::new()?;
    /// for anime in scraper.search("naruto").await {
    ///     println!("{}: {}", anime.id, anime.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.try_search(query).await.unwrap_or_else(|e| {
            tracing::warn!("Search for {:?} failed: {}", query, e);
            Vec::new()
        })
    }

    /// List the episodes of a title, sorted ascending by number
    ///
    /// Never fails: any error is logged and an empty vector returned.
    pub async fn fetch_episodes(&self, anime_id: &str) -> Vec<Episode> {
        self.try_fetch_episodes(anime_id).await.unwrap_or_else(|e| {
            tracing::warn!("Fetching episodes of {:?} failed: {}", anime_id, e);
            Vec::new()
        })
    }

    /// Resolve the playable sources of an episode
    ///
    /// Never fails: any error is logged and an empty vector returned.
    /// Servers that cannot be resolved are left out.
    pub async fn fetch_sources(&self, episode_id: &str) -> Vec<StreamingSource> {
        self.try_fetch_sources(episode_id).await.unwrap_or_else(|e| {
            tracing::warn!("Fetching sources of {:?} failed: {}", episode_id, e);
            Vec::new()
        })
    }

    /// Search for titles, reporting failures
    ///
    /// # Errors
    /// - `InvalidQuery` if query is empty or whitespace only
    /// - `HttpError`, `NotFound`, `Status` if the search page cannot be fetched
    pub async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(HianimeError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = build_search_url(self.base_url(), trimmed);
        let html = self.client.fetch_url(&url).await?;
        let results = parse_search_results(&html, self.base_url());
        tracing::debug!("Search for {:?} found {} titles", trimmed, results.len());
        Ok(results)
    }

    /// List episodes, reporting failures
    ///
    /// Only the watch page is mandatory. A failing AJAX episode list is
    /// logged and treated as an empty first tier.
    ///
    /// # Errors
    /// - `InvalidId` if anime_id is empty
    /// - `HttpError`, `NotFound`, `Status` if the watch page cannot be fetched
    pub async fn try_fetch_episodes(&self, anime_id: &str) -> Result<Vec<Episode>> {
        let anime_id = anime_id.trim();
        if anime_id.is_empty() {
            return Err(HianimeError::InvalidId(
                "Anime ID cannot be empty".to_string(),
            ));
        }

        let page = self
            .client
            .fetch_url(&build_watch_url(self.base_url(), anime_id))
            .await?;

        let fragment = match parse_anime_data_id(&page, anime_id) {
            Some(data_id) => match self.fetch_episode_fragment(&data_id).await {
                Ok(html) => Some(html),
                Err(e) => {
                    tracing::debug!("Episode list for data-id {} unavailable: {}", data_id, e);
                    None
                }
            },
            None => {
                tracing::debug!("No data-id on watch page of {:?}", anime_id);
                None
            }
        };

        let pages = EpisodePages {
            anime_id,
            page: &page,
            ajax_fragment: fragment.as_deref(),
        };
        Ok(parse_episodes(&pages))
    }

    /// Resolve sources, reporting failures of the episode page
    ///
    /// Per-server failures are not errors: the server is dropped and the
    /// others are still returned, in the order the page lists them.
    ///
    /// # Errors
    /// - `InvalidId` if episode_id is empty
    /// - `HttpError`, `NotFound`, `Status` if the episode page cannot be fetched
    pub async fn try_fetch_sources(&self, episode_id: &str) -> Result<Vec<StreamingSource>> {
        let episode_id = episode_id.trim();
        if episode_id.is_empty() {
            return Err(HianimeError::InvalidId(
                "Episode ID cannot be empty".to_string(),
            ));
        }

        let page = self
            .client
            .fetch_url(&build_watch_url(self.base_url(), episode_id))
            .await?;

        let subtitles = parse_subtitle_tracks(&page, self.base_url());
        let servers = parse_server_items(&page);
        tracing::debug!(
            "Episode {:?}: {} servers, {} subtitle tracks",
            episode_id,
            servers.len(),
            subtitles.len()
        );

        let results = join_all(
            servers
                .iter()
                .map(|server| self.resolve_server(server, &subtitles)),
        )
        .await;

        let sources = servers
            .iter()
            .zip(results)
            .filter_map(|(server, result)| match result {
                Ok(source) => Some(source),
                Err(e) => {
                    tracing::debug!("Server {} ({}) skipped: {}", server.id, server.label, e);
                    None
                }
            })
            .collect();

        Ok(sources)
    }

    async fn fetch_episode_fragment(&self, data_id: &str) -> Result<String> {
        let url = build_episode_list_url(self.base_url(), data_id);
        let response: EpisodeListResponse = self.client.fetch_json(&url).await?;
        Ok(response.html)
    }

    async fn resolve_server(
        &self,
        server: &ServerItem,
        subtitles: &[SubtitleTrack],
    ) -> Result<StreamingSource> {
        let url = build_episode_sources_url(self.base_url(), &server.id);
        let response: EpisodeSourcesResponse = self.client.fetch_json(&url).await?;

        let link = decode_html(response.link.trim());
        if link.is_empty() {
            return Err(HianimeError::ParseError(format!(
                "empty embed link for server {}",
                server.id
            )));
        }
        let embed_url = resolve_url(self.base_url(), &link);

        let content = self.client.fetch_embed(&embed_url).await?;
        let raw = resolve_video_url(&content)
            .ok_or_else(|| HianimeError::NoVideoUrl(embed_url.clone()))?;
        let video_url = resolve_url(&embed_url, &raw);

        let stream_type = infer_stream_type(&video_url);
        Ok(StreamingSource {
            label: server.label.clone(),
            stream_type,
            qualities: vec![StreamQuality {
                quality: quality_label(&video_url, stream_type),
                url: video_url,
                headers: self.playback_headers(),
            }],
            subtitles: subtitles.to_vec(),
        })
    }

    /// Headers media hosts expect from the player
    fn playback_headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Referer".to_string(), self.base_url().to_string()),
            ("Origin".to_string(), self.base_url().to_string()),
            ("User-Agent".to_string(), PLAYBACK_USER_AGENT.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SiteDomain;
    use crate::types::StreamType;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scraper_for(server: &MockServer) -> HianimeScraper {
        HianimeScraper::with_config(ClientConfig::with_base_url(server.uri())).unwrap()
    }

    async fn mount_html(server: &MockServer, at: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn test_scraper_creation() {
        let scraper = HianimeScraper::new();
        assert!(scraper.is_ok());
        assert_eq!(scraper.unwrap().base_url(), "https://hianime.to");
    }

    #[test]
    fn test_scraper_for_alternate_domain() {
        let scraper =
            HianimeScraper::with_config(ClientConfig::for_domain(SiteDomain::Aniwatch)).unwrap();
        assert_eq!(scraper.base_url(), "https://aniwatchtv.to");
    }

    #[test]
    fn test_playback_headers() {
        let scraper = HianimeScraper::new().unwrap();
        let headers = scraper.playback_headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers["Referer"], "https://hianime.to");
        assert_eq!(headers["Origin"], "https://hianime.to");
        assert_eq!(headers["User-Agent"], PLAYBACK_USER_AGENT);
    }

    // -----------------------------------------------------------------------
    // search
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_search_end_to_end() {
        let server = MockServer::start().await;
        let html = r#"
        <div class="film_list-wrap">
            <div class="flw-item">
                <div class="film-poster">
                    <img data-src="https://img.example/naruto.jpg" alt="Naruto">
                    <a href="/naruto-123" class="film-poster-ahref"></a>
                </div>
            </div>
            <div class="flw-item">
                <div class="film-poster">
                    <img data-src="https://img.example/shippuden.jpg" alt="Naruto Shippuden">
                    <a href="/naruto-shippuden-456" class="film-poster-ahref"></a>
                </div>
            </div>
        </div>
        "#;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("keyword", "naruto"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let scraper = scraper_for(&server);
        let results = scraper.search("naruto").await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "naruto-123");
        assert_eq!(results[0].title, "Naruto");
        assert_eq!(results[0].url, format!("{}/naruto-123", server.uri()));
        assert_eq!(results[1].id, "naruto-shippuden-456");
        assert_eq!(results[1].title, "Naruto Shippuden");
    }

    #[tokio::test]
    async fn test_search_uses_link_fallback() {
        let server = MockServer::start().await;
        let html = r#"
            <a href="/watch/bleach-806" title="Bleach">Bleach</a>
            <a href="/watch/bleach-tybw-19322" title="Bleach: TYBW">Bleach: TYBW</a>
            <a href="/watch/bleach-movie-1" title="Bleach Movie">Bleach Movie</a>
        "#;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;

        let results = scraper_for(&server).search("bleach").await;
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].id, "bleach-movie-1");
    }

    #[tokio::test]
    async fn test_search_server_error_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let scraper = scraper_for(&server);
        assert!(scraper.search("naruto").await.is_empty());
        assert!(matches!(
            scraper.try_search("naruto").await,
            Err(HianimeError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let scraper = HianimeScraper::new().unwrap();
        assert!(scraper.search("   ").await.is_empty());
        match scraper.try_search("").await {
            Err(HianimeError::InvalidQuery(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidQuery error"),
        }
    }

    // -----------------------------------------------------------------------
    // fetch_episodes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_episodes_from_ajax_sorted() {
        let server = MockServer::start().await;
        mount_html(&server, "/watch/naruto-677", r#"<div id="wrapper" data-id="677"></div>"#).await;
        Mock::given(method("GET"))
            .and(path("/ajax/v2/episode/list/677"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "html": r#"
                    <a class="ssl-item ep-item" data-number="2" data-id="12353" href="/watch/naruto-677?ep=12353"></a>
                    <a class="ssl-item ep-item" data-number="1" data-id="12352" href="/watch/naruto-677?ep=12352"></a>
                "#
            })))
            .mount(&server)
            .await;

        let episodes = scraper_for(&server).fetch_episodes("naruto-677").await;
        assert_eq!(
            episodes,
            vec![
                Episode { id: "12352".to_string(), number: 1 },
                Episode { id: "12353".to_string(), number: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_episodes_ajax_failure_falls_back_to_page() {
        let server = MockServer::start().await;
        let page = r#"
            <div id="wrapper" data-id="677"></div>
            <a class="ep-item" data-number="2" href="/watch/naruto-677?ep=12353"></a>
            <a class="ep-item" data-number="1" href="/watch/naruto-677?ep=12352"></a>
        "#;
        mount_html(&server, "/watch/naruto-677", page).await;
        Mock::given(method("GET"))
            .and(path("/ajax/v2/episode/list/677"))
            .respond_with(ResponseTemplate::new(502))
            .expect(1)
            .mount(&server)
            .await;

        let episodes = scraper_for(&server).fetch_episodes("naruto-677").await;
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].id, "naruto-677?ep=12352");
        assert_eq!(episodes[0].number, 1);
    }

    #[tokio::test]
    async fn test_fetch_episodes_malformed_json_falls_back() {
        let server = MockServer::start().await;
        let page = r#"
            <div id="wrapper" data-id="677"></div>
            <a href="/watch/naruto-677?ep=3">3</a>
            <a href="/watch/naruto-677?ep=1">1</a>
        "#;
        mount_html(&server, "/watch/naruto-677", page).await;
        mount_html(&server, "/ajax/v2/episode/list/677", "<html>Just a moment...</html>").await;

        let episodes = scraper_for(&server).fetch_episodes("naruto-677").await;
        assert_eq!(
            episodes,
            vec![
                Episode { id: "naruto-677?ep=1".to_string(), number: 1 },
                Episode { id: "naruto-677?ep=3".to_string(), number: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_episodes_missing_page_degrades_to_empty() {
        let server = MockServer::start().await;
        let scraper = scraper_for(&server);

        assert!(scraper.fetch_episodes("does-not-exist").await.is_empty());
        assert!(matches!(
            scraper.try_fetch_episodes("does-not-exist").await,
            Err(HianimeError::NotFound(_))
        ));
    }

    // -----------------------------------------------------------------------
    // fetch_sources
    // -----------------------------------------------------------------------

    fn episode_page() -> &'static str {
        r#"
        <video>
            <track kind="captions" src="/subs/en.vtt" label="English" srclang="en">
            <track kind="captions" src="https://cc.example/es.vtt" label="Spanish" srclang="es">
        </video>
        <div class="servers-sub">
            <div class="item server-item" data-type="sub" data-id="1"><a class="btn">HD-1</a></div>
            <div class="item server-item" data-type="sub" data-id="2"><a class="btn">HD-2</a></div>
            <div class="item server-item" data-type="sub" data-id="3"><a class="btn">StreamSB</a></div>
        </div>
        "#
    }

    async fn mount_server_link(server: &MockServer, id: &str, link: &str) {
        Mock::given(method("GET"))
            .and(path("/ajax/v2/episode/sources"))
            .and(query_param("id", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "iframe",
                "link": link,
                "server": 4
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_sources_skips_failing_server() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_html(&server, "/watch/12352", episode_page()).await;

        mount_server_link(&server, "1", &format!("{}/embed-2/e-1/aaa?k=1", base)).await;
        Mock::given(method("GET"))
            .and(path("/ajax/v2/episode/sources"))
            .and(query_param("id", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_server_link(&server, "3", &format!("{}/e/ccc", base)).await;

        Mock::given(method("GET"))
            .and(path("/embed-2/e-1/aaa"))
            .and(header("Referer", base.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<script>var src = "https://hls.example/aaa/master.m3u8";</script>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/e/ccc"))
            .and(header("Origin", base.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<script>player.setup({ sources: [{ file: "/media/ccc_720p.mp4" }] });</script>"#,
            ))
            .mount(&server)
            .await;

        let sources = scraper_for(&server).fetch_sources("12352").await;
        assert_eq!(sources.len(), 2);

        assert_eq!(sources[0].label, "HD-1");
        assert_eq!(sources[0].stream_type, StreamType::Hls);
        assert_eq!(sources[0].qualities[0].quality, "auto");
        assert_eq!(sources[0].qualities[0].url, "https://hls.example/aaa/master.m3u8");
        assert_eq!(sources[0].qualities[0].headers["Referer"], base);
        assert_eq!(sources[0].qualities[0].headers["Origin"], base);

        assert_eq!(sources[1].label, "StreamSB");
        assert_eq!(sources[1].stream_type, StreamType::Mp4);
        assert_eq!(sources[1].qualities[0].quality, "720p");
        assert_eq!(sources[1].qualities[0].url, format!("{}/media/ccc_720p.mp4", base));

        for source in &sources {
            assert_eq!(source.subtitles.len(), 2);
            assert_eq!(source.subtitles[0].url, format!("{}/subs/en.vtt", base));
            assert_eq!(source.subtitles[1].language, "es");
        }
        assert_eq!(sources[0].subtitles, sources[1].subtitles);
    }

    #[tokio::test]
    async fn test_fetch_sources_embed_without_video_is_skipped() {
        let server = MockServer::start().await;
        let base = server.uri();
        mount_html(
            &server,
            "/watch/555",
            r#"<div class="server-item" data-id="9"><a>HD-1</a></div>"#,
        )
        .await;
        mount_server_link(&server, "9", &format!("{}/embed/removed", base)).await;
        mount_html(&server, "/embed/removed", "<p>This video has been removed</p>").await;

        let scraper = scraper_for(&server);
        assert!(scraper.fetch_sources("555").await.is_empty());
        // The page itself was fine, so the pipeline reports success with no sources
        assert!(scraper.try_fetch_sources("555").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sources_composite_episode_id_is_fetched_verbatim() {
        // Episode ids synthesized from `?ep=N` links are not special-cased:
        // they map onto /watch/{anime}?ep={N} as-is
        let server = MockServer::start().await;
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path("/watch/naruto-677"))
            .and(query_param("ep", "12"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="server-item" data-id="4"><a>HD-1</a></div>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;
        mount_server_link(&server, "4", &format!("{}/embed/ok", base)).await;
        mount_html(&server, "/embed/ok", r#"file: "https://hls.example/ok.m3u8""#).await;

        let sources = scraper_for(&server).fetch_sources("naruto-677?ep=12").await;
        assert_eq!(sources.len(), 1);
        assert!(sources[0].subtitles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sources_page_error_degrades_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let scraper = scraper_for(&server);
        assert!(scraper.fetch_sources("12352").await.is_empty());
        assert!(scraper.try_fetch_sources("12352").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_sources_empty_id() {
        let scraper = HianimeScraper::new().unwrap();
        assert!(scraper.fetch_sources("").await.is_empty());
        assert!(matches!(
            scraper.try_fetch_sources(" ").await,
            Err(HianimeError::InvalidId(_))
        ));
    }
}
