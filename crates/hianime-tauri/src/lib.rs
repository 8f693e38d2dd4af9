//! HiAnime Tauri Integration
//!
//! Provides Tauri plugin for frontend integration with the hianime scraper.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(hianime_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//!
//! const results = await invoke('plugin:hianime|search_anime', { query: 'naruto' });
//! const episodes = await invoke('plugin:hianime|fetch_episodes', { animeId: results[0].id });
//! const sources = await invoke('plugin:hianime|fetch_sources', { episodeId: episodes[0].id });
//! ```

use std::sync::Arc;

use hianime_core::{ClientConfig, HianimeScraper};
use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

mod commands;

/// Shared HianimeScraper handle
///
/// The scraper holds no mutable state, so commands share it through an
/// `Arc` and run concurrently without locking.
pub struct ScraperState {
    pub(crate) scraper: Arc<HianimeScraper>,
}

impl ScraperState {
    /// Create a new ScraperState with default configuration
    ///
    /// # Errors
    /// Returns error string if scraper initialization fails
    pub fn new() -> Result<Self, String> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new ScraperState pointed at a specific domain or mirror
    ///
    /// # Errors
    /// Returns error string if scraper initialization fails
    pub fn with_config(config: ClientConfig) -> Result<Self, String> {
        let scraper = HianimeScraper::with_config(config).map_err(|e| e.to_string())?;
        Ok(Self {
            scraper: Arc::new(scraper),
        })
    }
}

/// Initialize the hianime plugin with the default domain
///
/// # Example
/// ```ignore
/// tauri::Builder::default()
///     .plugin(hianime_tauri::init())
///     .run(tauri::generate_context!())
///     .expect("error while running tauri application");
/// ```
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    init_with_config(ClientConfig::default())
}

/// Initialize the hianime plugin with a custom client configuration
///
/// # Example
/// ```ignore
/// use hianime_core::{ClientConfig, SiteDomain};
///
/// tauri::Builder::default()
///     .plugin(hianime_tauri::init_with_config(ClientConfig::for_domain(SiteDomain::Aniwatch)))
///     .run(tauri::generate_context!())
///     .expect("error while running tauri application");
/// ```
pub fn init_with_config<R: Runtime>(config: ClientConfig) -> TauriPlugin<R> {
    Builder::new("hianime")
        .invoke_handler(tauri::generate_handler![
            commands::search_anime,
            commands::fetch_episodes,
            commands::fetch_sources
        ])
        .setup(move |app, _api| {
            let state = ScraperState::with_config(config.clone())
                .map_err(Box::<dyn std::error::Error>::from)?;
            tracing::info!("hianime plugin ready ({})", state.scraper.base_url());
            app.manage(state);
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use hianime_core::{Episode, SearchResult, StreamingSource, SubtitleTrack};
