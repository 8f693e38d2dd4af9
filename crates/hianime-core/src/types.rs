//! Core data types for hianime scraper
//!
//! Contains the records returned by the query surface and the JSON
//! payloads of the site's AJAX endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A title found by a search
///
/// All fields implement Serialize and Deserialize for Tauri compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Site-internal slug (e.g., "naruto-677")
    pub id: String,

    /// Decoded display title
    pub title: String,

    /// Absolute poster URL, empty if the markup had none
    pub image: String,

    /// Absolute URL of the title's page
    pub url: String,
}

/// A single episode of a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Opaque id accepted by `fetch_sources`
    ///
    /// Depending on which markup produced it this is a numeric episode id
    /// ("12352"), a slug, or a composite "naruto-677?ep=12" string.
    pub id: String,

    /// 1-based episode number
    pub number: u32,
}

/// Stream container kind, inferred from the URL shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    /// Adaptive stream (`.m3u8` manifest)
    Hls,
    /// Progressive download
    Mp4,
}

/// One playable URL of a source together with the headers needed to play it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamQuality {
    /// Quality label ("auto" for HLS, "720p" or "default" for MP4)
    pub quality: String,

    /// Playable media URL
    pub url: String,

    /// Referer, Origin and User-Agent required by the media host
    pub headers: BTreeMap<String, String>,
}

/// A subtitle track attached to every source of an episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrack {
    /// Absolute URL of the caption file
    pub url: String,

    /// Human-readable label (e.g., "English")
    pub label: String,

    /// Language code (e.g., "en")
    pub language: String,

    /// Caption format, always "vtt"
    pub format: String,
}

/// A resolved video source from one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingSource {
    /// Server/provider name (e.g., "HD-1")
    pub label: String,

    #[serde(rename = "type")]
    pub stream_type: StreamType,

    pub qualities: Vec<StreamQuality>,

    /// Subtitles of the episode, identical on every source
    pub subtitles: Vec<SubtitleTrack>,
}

/// A server listed on the episode page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerItem {
    /// Numeric server id used by the sources endpoint
    pub id: String,

    /// Provider name shown on the page
    pub label: String,
}

/// Body of `/ajax/v2/episode/list/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeListResponse {
    /// HTML fragment with the episode anchors
    pub html: String,
}

/// Body of `/ajax/v2/episode/sources?id={id}`
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeSourcesResponse {
    /// Embed page URL
    pub link: String,
}
