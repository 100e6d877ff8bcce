//! Removal of bracketed release tags such as `[1080p]` or `[Erai-raws]`.

use std::sync::LazyLock;

use regex::Regex;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[A-Za-z0-9\-_+.\s$#@!]+\]").expect("static tag pattern is valid")
});

/// Removes every bracketed tag from `text`.
///
/// Only brackets whose content is limited to ASCII letters, digits,
/// whitespace and `- _ + . $ # @ !` count as tags; anything else is left
/// untouched. Removal repeats until no tag remains, so the function is
/// idempotent even for nested input like `[a[b]c]`.
///
/// # Examples
/// ```
/// use kirinuki_core::parser::strip_tags;
///
/// assert_eq!(strip_tags("[AC] Kamisama Kiss [1080p]"), " Kamisama Kiss ");
/// ```
pub fn strip_tags(text: &str) -> String {
    let mut out = text.to_string();
    while RE_TAG.is_match(&out) {
        out = RE_TAG.replace_all(&out, "").into_owned();
    }
    out
}
