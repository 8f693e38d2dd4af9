//! URL helper functions for hianime
//!
//! Builds endpoint URLs against a configurable base origin and resolves
//! relative links found in markup.

/// Builds the search URL for a given query
///
/// URL encodes the query and constructs the search URL.
///
/// # Example
/// ```
/// use hianime_core::url::build_search_url;
/// let url = build_search_url("https://hianime.to", "one piece");
/// assert_eq!(url, "https://hianime.to/search?keyword=one%20piece");
/// ```
pub fn build_search_url(base_url: &str, query: &str) -> String {
    let encoded = urlencoding::encode(query);
    format!("{}/search?keyword={}", trim_base(base_url), encoded)
}

/// Builds the watch page URL of a title or episode
///
/// The id is appended verbatim. Composite episode ids such as
/// "naruto-677?ep=12" therefore keep their query string.
///
/// # Example
/// ```
/// use hianime_core::url::build_watch_url;
/// let url = build_watch_url("https://hianime.to", "naruto-677?ep=12");
/// assert_eq!(url, "https://hianime.to/watch/naruto-677?ep=12");
/// ```
pub fn build_watch_url(base_url: &str, id: &str) -> String {
    format!("{}/watch/{}", trim_base(base_url), id.trim_start_matches('/'))
}

/// Builds the AJAX episode list URL for a numeric anime data-id
pub fn build_episode_list_url(base_url: &str, data_id: &str) -> String {
    format!("{}/ajax/v2/episode/list/{}", trim_base(base_url), data_id)
}

/// Builds the AJAX sources URL for a numeric server id
pub fn build_episode_sources_url(base_url: &str, server_id: &str) -> String {
    format!(
        "{}/ajax/v2/episode/sources?id={}",
        trim_base(base_url),
        urlencoding::encode(server_id)
    )
}

/// Returns the `scheme://host[:port]` part of an absolute URL
///
/// # Example
/// ```
/// use hianime_core::url::origin_of;
/// assert_eq!(origin_of("https://megacloud.tv/embed-2/e-1/abc?k=1"), "https://megacloud.tv");
/// ```
pub fn origin_of(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return trim_base(url);
    };
    let host_start = scheme_end + 3;
    match url[host_start..].find(['/', '?', '#']) {
        Some(pos) => &url[..host_start + pos],
        None => url,
    }
}

/// Resolves a link from markup against a base URL
///
/// Absolute URLs are returned unchanged, protocol-relative ones get
/// `https:`, everything else is joined onto the origin of `base_url`.
///
/// # Example
/// ```
/// use hianime_core::url::resolve_url;
/// assert_eq!(resolve_url("https://hianime.to", "/naruto-677"), "https://hianime.to/naruto-677");
/// assert_eq!(resolve_url("https://hianime.to", "//cdn.example/a.vtt"), "https://cdn.example/a.vtt");
/// ```
pub fn resolve_url(base_url: &str, href: &str) -> String {
    let href = href.trim();
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{}", rest);
    }

    let origin = origin_of(base_url);
    if href.starts_with('/') {
        format!("{}{}", origin, href)
    } else {
        format!("{}/{}", origin, href)
    }
}

/// Extracts the last non-empty path segment of a link
///
/// Query string and fragment are dropped, so "/naruto-677?ref=search"
/// yields "naruto-677".
///
/// # Example
/// ```
/// use hianime_core::url::last_path_segment;
/// assert_eq!(last_path_segment("/naruto-677?ref=search"), Some("naruto-677".to_string()));
/// assert_eq!(last_path_segment("https://hianime.to/"), None);
/// ```
pub fn last_path_segment(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let path = strip_scheme_and_host(path);
    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Like [`last_path_segment`] but keeps the query string
///
/// Used for episode links, where the query carries the episode id
/// ("/watch/naruto-677?ep=12" yields "naruto-677?ep=12").
pub fn trailing_segment(href: &str) -> Option<String> {
    let href = href.split('#').next().unwrap_or(href);
    let (path, query) = match href.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (href, None),
    };
    let segment = last_path_segment(path)?;
    Some(match query {
        Some(q) if !q.is_empty() => format!("{}?{}", segment, q),
        _ => segment,
    })
}

fn strip_scheme_and_host(url: &str) -> &str {
    match url.find("://") {
        Some(pos) => {
            let rest = &url[pos + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("")
        }
        None => url,
    }
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
