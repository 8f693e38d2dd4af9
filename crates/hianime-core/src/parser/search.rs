//! Search results parser for hianime
//!
//! Two tiers: poster blocks (`.film-poster`) first, plain `/watch/` links
//! with a `title` attribute only when no poster block matched.

use crate::text::{attr, element_inner, tags_named, tags_with_class};
use crate::types::SearchResult;
use crate::url::{last_path_segment, resolve_url};

/// Parses search results HTML and returns a list of titles
///
/// # Arguments
/// * `html` - Raw HTML string from the search page
/// * `base_url` - Site origin used to absolutize links
///
/// # Returns
/// Vector of `SearchResult` in document order, empty if nothing matched
pub fn parse_search_results(html: &str, base_url: &str) -> Vec<SearchResult> {
    let results = extract_poster_results(html, base_url);
    if !results.is_empty() {
        return results;
    }

    tracing::debug!("No poster blocks found, falling back to /watch/ links");
    extract_watch_link_results(html, base_url)
}

/// Extracts results from `.film-poster` containers
///
/// A block is the poster element's own content, up to its closing tag. An
/// unclosed poster runs to the next poster (or the end of the document).
/// The first `<img>` and `<a href>` inside it are used; posters without a
/// link are skipped.
fn extract_poster_results(html: &str, base_url: &str) -> Vec<SearchResult> {
    let posters = tags_with_class(html, "film-poster");
    let mut results = Vec::new();

    for (index, poster) in posters.iter().enumerate() {
        let block = element_inner(html, poster).unwrap_or_else(|| {
            let block_end = posters
                .get(index + 1)
                .map(|next| next.start)
                .unwrap_or(html.len());
            &html[poster.end..block_end]
        });

        if let Some(result) = parse_poster_block(block, base_url) {
            results.push(result);
        }
    }

    results
}

fn parse_poster_block(block: &str, base_url: &str) -> Option<SearchResult> {
    let anchor = tags_named(block, "a")
        .into_iter()
        .find(|a| attr(a.tag, "href").is_some_and(|h| !h.trim().is_empty()))?;
    let href = attr(anchor.tag, "href")?;

    let img = tags_named(block, "img").into_iter().next();
    let alt = img.and_then(|i| attr(i.tag, "alt"));
    let title = alt
        .filter(|t| !t.trim().is_empty())
        .or_else(|| attr(anchor.tag, "title"))?
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }

    let image = img
        .and_then(|i| attr(i.tag, "data-src").or_else(|| attr(i.tag, "src")))
        .filter(|src| !src.trim().is_empty())
        .map(|src| resolve_url(base_url, &src))
        .unwrap_or_default();

    build_result(&href, title, image, base_url)
}

/// Extracts results from `<a href="/watch/..." title="...">` links
fn extract_watch_link_results(html: &str, base_url: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for anchor in tags_named(html, "a") {
        let Some(href) = attr(anchor.tag, "href") else {
            continue;
        };
        if !href.contains("/watch/") {
            continue;
        }
        let Some(title) = attr(anchor.tag, "title") else {
            continue;
        };
        let title = title.trim().to_string();
        if title.is_empty() {
            continue;
        }

        if let Some(result) = build_result(&href, title, String::new(), base_url) {
            results.push(result);
        }
    }

    results
}

fn build_result(href: &str, title: String, image: String, base_url: &str) -> Option<SearchResult> {
    let id = last_path_segment(href)?;
    let path = href.split(['?', '#']).next().unwrap_or(href);

    Some(SearchResult {
        id,
        title,
        image,
        url: resolve_url(base_url, path),
    })
}
