use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;

// Text content only needs `&`, `<` and `>`; quotes are left alone so that
// rewritten values read the same way Office writes them.
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

static ENTITY_UNESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .expect("Failed to build XML unescaper")
});

/// Escape a string for use as element text.
///
/// # Examples
///
/// ```
/// use docmeta::xml::escape_text;
/// assert_eq!(escape_text("R&D <draft>"), "R&amp;D &lt;draft&gt;");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Replace the five predefined XML entities with their characters.
///
/// Used on attribute values, which keep their escaped form in the tree.
///
/// # Examples
///
/// ```
/// use docmeta::xml::unescape_entities;
/// assert_eq!(unescape_entities("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_entities("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_entities("&unknown;"), "&unknown;");
/// ```
#[inline]
pub fn unescape_entities(s: &str) -> String {
    ENTITY_UNESCAPER.replace_all(s, &["&", "<", ">", "\"", "'"])
}

/// Resolve a predefined entity name (without `&` and `;`).
pub(crate) fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}
