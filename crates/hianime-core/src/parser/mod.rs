//! Pattern extractors for hianime
//!
//! Contains one module per page type. Every extractor is a pure function
//! over the page text and returns an empty collection on a miss.

pub mod embed;
pub mod episodes;
pub mod search;
pub mod servers;
pub mod subtitles;

pub use embed::{infer_stream_type, quality_label, resolve_video_url, VideoUrlPattern};
pub use episodes::{
    parse_ajax_episodes, parse_anime_data_id, parse_episodes, parse_page_episodes,
    parse_query_episodes, sort_episodes, EpisodePages, EpisodeTier,
};
pub use search::parse_search_results;
pub use servers::parse_server_items;
pub use subtitles::parse_subtitle_tracks;
