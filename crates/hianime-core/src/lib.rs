//! HiAnime Scraper Core Library
//!
//! Provides async API for searching titles, listing episodes and resolving
//! playable streams from hianime.to and its mirror domains.
//!
//! # Overview
//!
//! This crate provides a complete scraping solution with:
//! - Text-scan primitives and pattern extractors that tolerate markup drift
//! - Ordered fallback chains for episodes and embedded player URLs
//! - A query surface that never fails: errors are logged via `tracing` and
//!   surface as empty results
//!
//! # Example
//!
//! ```no_run
//! use hianime_core::{HianimeScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = HianimeScraper::new()?;
//!
//!     let results = scraper.search("naruto").await;
//!     let Some(anime) = results.first() else {
//!         return Ok(());
//!     };
//!
//!     let episodes = scraper.fetch_episodes(&anime.id).await;
//!     if let Some(episode) = episodes.first() {
//!         for source in scraper.fetch_sources(&episode.id).await {
//!             println!("{}: {}", source.label, source.qualities[0].url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Playback headers
//!
//! Media hosts reject requests without the site's Referer/Origin. Every
//! [`StreamQuality`] carries the headers a player has to send.
//!
//! Stream URLs are short-lived. Do not cache them long-term.

mod client;
mod error;
pub mod parser;
mod scraper;
pub mod text;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, HianimeClient, SiteDomain, PLAYBACK_USER_AGENT, USER_AGENT};

// Re-export error types
pub use error::{HianimeError, Result};

// Re-export parser functions
pub use parser::{
    parse_episodes, parse_search_results, parse_server_items, parse_subtitle_tracks,
    resolve_video_url,
};

// Re-export main scraper API
pub use scraper::HianimeScraper;

// Re-export data types
pub use types::{
    Episode, EpisodeListResponse, EpisodeSourcesResponse, SearchResult, ServerItem,
    StreamQuality, StreamType, StreamingSource, SubtitleTrack,
};
