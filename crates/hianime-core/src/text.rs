//! Text-scan primitives
//!
//! Delimiter extraction, entity decoding and opening-tag helpers shared by
//! every parser. Nothing here builds a DOM: all helpers work on raw text so
//! that small markup drift (attribute order, extra classes, odd whitespace)
//! does not break extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// An opening tag found in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Raw opening tag including `<` and `>`
    pub tag: &'a str,
    /// Byte offset of the `<`
    pub start: usize,
    /// Byte offset right after the closing `>` of the tag
    pub end: usize,
}

/// Returns the text strictly between the first `start` marker and the
/// first `end` marker that follows it
///
/// # Example
/// ```
/// use hianime_core::text::extract_between;
/// assert_eq!(extract_between("a [b] c", "[", "]"), Some("b"));
/// assert_eq!(extract_between("a [b c", "[", "]"), None);
/// ```
pub fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let len = text[from..].find(end)?;
    Some(&text[from..from + len])
}

/// Returns every non-overlapping `start`..`end` match in document order
///
/// The cursor moves past each found `end` marker, so a match never
/// overlaps the previous one. Returns an empty vector when nothing matches.
pub fn extract_all<'a>(text: &'a str, start: &str, end: &str) -> Vec<&'a str> {
    let mut matches = Vec::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let rest = &text[cursor..];
        let Some(found) = extract_between(rest, start, end) else {
            break;
        };

        // `found` borrows from `rest`, recover its offset to move the cursor
        let offset = found.as_ptr() as usize - rest.as_ptr() as usize;
        let next = cursor + offset + found.len() + end.len();
        matches.push(found);

        if next == cursor {
            break;
        }
        cursor = next;
    }

    matches
}

/// Decodes the handful of HTML entities the site actually emits
///
/// Unknown entities are left untouched. `&amp;` is decoded last so that
/// `&amp;lt;` becomes `&lt;` rather than `<`.
///
/// # Example
/// ```
/// use hianime_core::text::decode_html;
/// assert_eq!(decode_html("A &amp; B &lt;tag&gt;"), "A & B <tag>");
/// ```
pub fn decode_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\w:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static OPENING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[a-zA-Z][a-zA-Z0-9]*\b[^>]*>").unwrap());
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").unwrap());
static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Reads a quoted attribute value from a single opening tag
///
/// Attribute names match whole and case-insensitively, so `data-id` never
/// matches inside `data-server-id`. The returned value is entity-decoded.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| decode_html(m.as_str()))
}

/// Checks whether the tag's `class` attribute contains `class` as a token
pub fn has_class(tag: &str, class: &str) -> bool {
    if !tag.contains(class) {
        return false;
    }
    attr(tag, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Element name of an opening tag, as written
pub fn tag_name(tag: &str) -> &str {
    let name = tag.strip_prefix('<').unwrap_or(tag);
    let len = name
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(name.len());
    &name[..len]
}

/// Finds every opening tag in the document
pub fn opening_tags(html: &str) -> Vec<TagMatch<'_>> {
    OPENING_TAG
        .find_iter(html)
        .map(|m| TagMatch {
            tag: m.as_str(),
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Finds every opening tag whose class list contains `class`
pub fn tags_with_class<'a>(html: &'a str, class: &str) -> Vec<TagMatch<'a>> {
    opening_tags(html)
        .into_iter()
        .filter(|t| has_class(t.tag, class))
        .collect()
}

/// Finds every opening tag with the given element name
pub fn tags_named<'a>(html: &'a str, name: &str) -> Vec<TagMatch<'a>> {
    opening_tags(html)
        .into_iter()
        .filter(|t| tag_name(t.tag).eq_ignore_ascii_case(name))
        .collect()
}

/// Returns the content of the element opened by `open`
///
/// Nested elements of the same name are balanced. Returns `None` when the
/// element is never closed.
pub fn element_inner<'a>(html: &'a str, open: &TagMatch<'_>) -> Option<&'a str> {
    let name = tag_name(open.tag);
    let rest = html.get(open.end..)?;
    let mut depth = 0usize;

    for caps in ANY_TAG.captures_iter(rest) {
        if !caps[2].eq_ignore_ascii_case(name) {
            continue;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };

        if &caps[1] == "/" {
            if depth == 0 {
                return Some(&rest[..whole.start()]);
            }
            depth -= 1;
        } else if !whole.as_str().ends_with("/>") {
            depth += 1;
        }
    }

    None
}

/// Removes markup and collapses whitespace
pub fn strip_tags(fragment: &str) -> String {
    MARKUP
        .replace_all(fragment, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
