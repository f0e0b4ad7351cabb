//! Normalisation of text taken from product pages.

const ENTITIES: [(&str, &str); 6] = [
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

/// Strips framework comment markers, decodes the common HTML entities, and
/// trims surrounding whitespace.
///
/// Catalog files written before extraction cleaned its fields still hold
/// the raw markup, so identity checks go through this too.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.replace("<!-- -->", "");
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text.trim().to_string()
}
