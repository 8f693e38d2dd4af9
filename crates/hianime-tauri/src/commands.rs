//! Tauri commands for hianime scraper
//!
//! Every command mirrors one operation of the query surface. Failures are
//! already absorbed by the scraper, so the commands always resolve to a
//! (possibly empty) list.

use hianime_core::{Episode, SearchResult, StreamingSource};
use tauri::State;

use crate::ScraperState;

/// Search for titles on hianime
///
/// # Arguments
/// * `state` - Managed ScraperState from Tauri
/// * `query` - Search query string
///
/// # Returns
/// Matching titles, empty when nothing matched or the site was unreachable
#[tauri::command]
pub async fn search_anime(
    state: State<'_, ScraperState>,
    query: String,
) -> Result<Vec<SearchResult>, String> {
    Ok(state.scraper.search(&query).await)
}

/// List the episodes of a title
///
/// # Arguments
/// * `state` - Managed ScraperState from Tauri
/// * `anime_id` - Title id from a search result
///
/// # Returns
/// Episodes sorted by number
#[tauri::command]
pub async fn fetch_episodes(
    state: State<'_, ScraperState>,
    anime_id: String,
) -> Result<Vec<Episode>, String> {
    Ok(state.scraper.fetch_episodes(&anime_id).await)
}

/// Resolve the playable sources of an episode
///
/// # Arguments
/// * `state` - Managed ScraperState from Tauri
/// * `episode_id` - Episode id from `fetch_episodes`
///
/// # Returns
/// One entry per server that could be resolved
#[tauri::command]
pub async fn fetch_sources(
    state: State<'_, ScraperState>,
    episode_id: String,
) -> Result<Vec<StreamingSource>, String> {
    Ok(state.scraper.fetch_sources(&episode_id).await)
}
