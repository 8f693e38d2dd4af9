//! Server list parser for hianime episode pages

use crate::text::{attr, decode_html, element_inner, strip_tags, tags_with_class};
use crate::types::ServerItem;

/// Parses `.server-item` elements and returns them in document order
///
/// Only items with a numeric `data-id` are kept. The same server often
/// appears under both the sub and dub lists; the first occurrence wins.
pub fn parse_server_items(html: &str) -> Vec<ServerItem> {
    let mut servers: Vec<ServerItem> = Vec::new();

    for item in tags_with_class(html, "server-item") {
        let Some(id) = attr(item.tag, "data-id").map(|id| id.trim().to_string()) else {
            continue;
        };
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if servers.iter().any(|s| s.id == id) {
            continue;
        }

        let label = attr(item.tag, "data-server-name")
            .or_else(|| {
                element_inner(html, &item).map(|inner| decode_html(&strip_tags(inner)))
            })
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("Server {}", id));

        servers.push(ServerItem { id, label });
    }

    servers
}
