//! Subtitle track parser for hianime episode pages
//!
//! Unlike the other extractors this one walks a real HTML tree: `<track>`
//! elements are well-formed void elements and the `scraper` selector engine
//! handles attribute quoting and ordering for us.

use scraper::{Html, Selector};

use crate::types::SubtitleTrack;
use crate::url::resolve_url;

const DEFAULT_LABEL: &str = "English";
const DEFAULT_LANGUAGE: &str = "en";
const CAPTION_FORMAT: &str = "vtt";

/// Parses `<track>` elements and returns the caption tracks
///
/// Tracks whose `kind` is something other than captions or subtitles
/// (thumbnails, chapters) are skipped. Relative `src` values are resolved
/// against `base_url`.
///
/// # Returns
/// Vector of [`SubtitleTrack`]. Empty vec if no tracks found.
pub fn parse_subtitle_tracks(html: &str, base_url: &str) -> Vec<SubtitleTrack> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("track[src]") else {
        return Vec::new();
    };

    let mut tracks = Vec::new();

    for element in document.select(&selector) {
        let el = element.value();

        if let Some(kind) = el.attr("kind")
            && !is_caption_kind(kind)
        {
            continue;
        }

        let Some(src) = el.attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };

        let label = el
            .attr("label")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LABEL);
        let language = el
            .attr("srclang")
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        tracks.push(SubtitleTrack {
            url: resolve_url(base_url, src),
            label: label.to_string(),
            language: language.to_string(),
            format: CAPTION_FORMAT.to_string(),
        });
    }

    tracks
}

fn is_caption_kind(kind: &str) -> bool {
    matches!(
        kind.trim().to_ascii_lowercase().as_str(),
        "captions" | "subtitles" | ""
    )
}
