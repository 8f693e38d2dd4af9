//! Episode list parser for hianime
//!
//! Episodes come from one of three places, tried in order:
//! the AJAX episode-list fragment, `.ep-item` elements on the watch page,
//! and finally any link carrying an `?ep=N` query.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{attr, opening_tags, tags_named, tags_with_class};
use crate::types::Episode;
use crate::url::trailing_segment;

/// Inputs available to the episode tiers
#[derive(Debug, Clone, Copy)]
pub struct EpisodePages<'a> {
    /// Slug of the title (e.g., "naruto-677")
    pub anime_id: &'a str,
    /// HTML of `/watch/{anime_id}`
    pub page: &'a str,
    /// HTML fragment from the AJAX episode list, if it could be fetched
    pub ajax_fragment: Option<&'a str>,
}

/// One strategy of the episode fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeTier {
    /// `.ep-item` anchors from the AJAX fragment, number and id required
    Ajax,
    /// `.ep-item` elements on the watch page, number and id optional
    PageItems,
    /// Links with an `?ep=N` query
    QueryLinks,
}

impl EpisodeTier {
    /// Tiers in the order they are tried
    pub const CHAIN: [EpisodeTier; 3] = [
        EpisodeTier::Ajax,
        EpisodeTier::PageItems,
        EpisodeTier::QueryLinks,
    ];

    /// Runs this tier alone
    pub fn extract(self, pages: &EpisodePages<'_>) -> Vec<Episode> {
        match self {
            EpisodeTier::Ajax => pages
                .ajax_fragment
                .map(parse_ajax_episodes)
                .unwrap_or_default(),
            EpisodeTier::PageItems => parse_page_episodes(pages.page),
            EpisodeTier::QueryLinks => parse_query_episodes(pages.page, pages.anime_id),
        }
    }
}

/// Runs the tier chain and returns the first non-empty list, sorted by number
pub fn parse_episodes(pages: &EpisodePages<'_>) -> Vec<Episode> {
    for tier in EpisodeTier::CHAIN {
        let episodes = tier.extract(pages);
        if !episodes.is_empty() {
            tracing::debug!("{:?} tier produced {} episodes", tier, episodes.len());
            return sort_episodes(episodes);
        }
        tracing::debug!("{:?} tier produced no episodes", tier);
    }

    Vec::new()
}

/// Sorts episodes ascending by number
///
/// The sort is stable; duplicate numbers keep their extraction order.
pub fn sort_episodes(mut episodes: Vec<Episode>) -> Vec<Episode> {
    episodes.sort_by_key(|e| e.number);
    episodes
}

static FIRST_DATA_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|[\s"'])data-id\s*=\s*["'](\d+)["']"#).unwrap());
static EP_QUERY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[?&]ep=(\d+)").unwrap());

/// Finds the numeric id the AJAX episode list is keyed by
///
/// Looks at `id="wrapper" data-id="N"` first, then the first `data-id`
/// on the page, then the trailing digits of the slug ("naruto-677" → "677").
pub fn parse_anime_data_id(html: &str, anime_id: &str) -> Option<String> {
    let wrapper = opening_tags(html)
        .into_iter()
        .find(|t| t.tag.contains("wrapper") && attr(t.tag, "id").as_deref() == Some("wrapper"))
        .and_then(|t| attr(t.tag, "data-id"))
        .filter(|id| is_numeric(id));
    if wrapper.is_some() {
        return wrapper;
    }

    if let Some(caps) = FIRST_DATA_ID.captures(html)
        && let Some(m) = caps.get(1)
    {
        return Some(m.as_str().to_string());
    }

    let slug = anime_id.split(['?', '#']).next().unwrap_or(anime_id);
    slug.rsplit('-')
        .next()
        .filter(|tail| is_numeric(tail))
        .map(str::to_string)
}

/// Parses `.ep-item` anchors from the AJAX fragment
///
/// Both `data-number` and `data-id` must be present.
pub fn parse_ajax_episodes(fragment: &str) -> Vec<Episode> {
    tags_with_class(fragment, "ep-item")
        .into_iter()
        .filter_map(|item| {
            let number = parse_number(&attr(item.tag, "data-number")?)?;
            let id = attr(item.tag, "data-id").filter(|id| !id.trim().is_empty())?;
            Some(Episode { id, number })
        })
        .collect()
}

/// Parses `.ep-item` elements on the watch page
///
/// A missing `data-number` falls back to the item's 1-based position, a
/// missing `data-id` to the trailing segment of `href` (query included).
pub fn parse_page_episodes(html: &str) -> Vec<Episode> {
    let mut episodes = Vec::new();

    for (index, item) in tags_with_class(html, "ep-item").into_iter().enumerate() {
        let number = match attr(item.tag, "data-number") {
            Some(raw) => match parse_number(&raw) {
                Some(n) => n,
                None => continue,
            },
            None => index as u32 + 1,
        };

        let id = attr(item.tag, "data-id")
            .filter(|id| !id.trim().is_empty())
            .or_else(|| attr(item.tag, "href").and_then(|href| trailing_segment(&href)));

        if let Some(id) = id {
            episodes.push(Episode { id, number });
        }
    }

    episodes
}

/// Parses links carrying an `?ep=N` query
///
/// Ids are synthesized as "{anime_id}?ep={N}".
pub fn parse_query_episodes(html: &str, anime_id: &str) -> Vec<Episode> {
    tags_named(html, "a")
        .into_iter()
        .filter_map(|anchor| {
            let href = attr(anchor.tag, "href")?;
            let caps = EP_QUERY.captures(&href)?;
            let number = parse_number(caps.get(1)?.as_str())?;
            Some(Episode {
                id: format!("{}?ep={}", anime_id, number),
                number,
            })
        })
        .collect()
}

fn parse_number(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
