//! Embed page parser
//!
//! Embed hosts configure their players in many different ways. The
//! resolver tries a fixed list of patterns, HLS first, and returns the
//! first URL any of them finds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::StreamType;

/// One pattern of the resolver chain, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoUrlPattern {
    /// Any bare `http(s)://….m3u8` URL
    BareM3u8,
    /// First entry of a `sources: [...]` array (`file`/`src`/`url`)
    SourcesArray,
    /// A `file:` field ending in `.m3u8`
    FileM3u8,
    /// A `file`/`src`/`url` field ending in `.mp4`
    FieldMp4,
}

static BARE_M3U8: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s"'<>\\]+?\.m3u8(?:\?[^\s"'<>\\]*)?"#).unwrap()
});
static SOURCES_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"["']?sources["']?\s*[:=]\s*\[\s*\{[^}]*?["']?(?:file|src|url)["']?\s*:\s*["']([^"']+)["']"#,
    )
    .unwrap()
});
static FILE_M3U8: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?file["']?\s*:\s*["']([^"']+\.m3u8(?:\?[^"']*)?)["']"#).unwrap()
});
static FIELD_MP4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?(?:file|src|url)["']?\s*:\s*["']([^"']+\.mp4(?:\?[^"']*)?)["']"#).unwrap()
});
// Match patterns like "2160p", "1080p", "360p"
static RESOLUTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])(\d{3,4})[pP](?:[^a-zA-Z0-9]|$)").unwrap());

impl VideoUrlPattern {
    /// Patterns in the order they are tried
    pub const CHAIN: [VideoUrlPattern; 4] = [
        VideoUrlPattern::BareM3u8,
        VideoUrlPattern::SourcesArray,
        VideoUrlPattern::FileM3u8,
        VideoUrlPattern::FieldMp4,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            VideoUrlPattern::BareM3u8 => &*BARE_M3U8,
            VideoUrlPattern::SourcesArray => &*SOURCES_ARRAY,
            VideoUrlPattern::FileM3u8 => &*FILE_M3U8,
            VideoUrlPattern::FieldMp4 => &*FIELD_MP4,
        }
    }

    /// Runs this pattern alone
    pub fn find(self, content: &str) -> Option<String> {
        let caps = self.regex().captures(content)?;
        caps.get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().trim().to_string())
            .filter(|url| !url.is_empty())
    }
}

/// Finds a playable video URL inside embed page content
///
/// JSON-escaped slashes (`\/`) are unescaped before matching.
///
/// # Returns
/// The URL found by the highest-priority pattern, `None` if none matched
pub fn resolve_video_url(content: &str) -> Option<String> {
    let content = content.replace("\\/", "/");

    for pattern in VideoUrlPattern::CHAIN {
        if let Some(url) = pattern.find(&content) {
            tracing::debug!("{:?} matched {}", pattern, url);
            return Some(url);
        }
    }

    None
}

/// Infers the stream type from a URL
///
/// Anything whose path contains `.m3u8` is HLS, everything else MP4.
pub fn infer_stream_type(url: &str) -> StreamType {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().contains(".m3u8") {
        StreamType::Hls
    } else {
        StreamType::Mp4
    }
}

/// Quality label for a resolved URL
///
/// HLS manifests carry every rendition, so they are labelled "auto". MP4
/// URLs get a "{N}p" label when the URL names a resolution.
pub fn quality_label(url: &str, stream_type: StreamType) -> String {
    match stream_type {
        StreamType::Hls => "auto".to_string(),
        StreamType::Mp4 => match parse_resolution_from_text(url) {
            0 => "default".to_string(),
            res => format!("{}p", res),
        },
    }
}

/// Tries to find a resolution pattern in freeform text (e.g. filenames)
fn parse_resolution_from_text(text: &str) -> u32 {
    if let Some(caps) = RESOLUTION.captures(text)
        && let Some(m) = caps.get(1)
        && let Ok(res) = m.as_str().parse::<u32>()
    {
        return res;
    }
    0
}
