//! Paragraph extraction from downloaded documents.
//!
//! HTML pages are reduced to the text of their `<p>` elements; `<script>`,
//! `<style>` and `<noscript>` blocks are removed first, inline tags are
//! stripped, `<br>` becomes a line break and character references are
//! decoded.  Every non-blank line of the result is one block.
//!
//! Pages without any `<p>` element fall back to the tag-stripped document.

use std::sync::OnceLock;

use regex::Regex;

fn invisible_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<!--.*?-->")
            .expect("static regex")
    })
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("static regex"))
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("static regex"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"))
}

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("static regex")
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Extract ordered, trimmed, non-blank text blocks from an HTML document.
///
/// ```
/// use article_narrator::content::extract_paragraphs;
///
/// let html = "<html><script>var x = 1;</script><body>\
///             <p>First &amp; <b>foremost</b>.</p><p> </p><p>Second</p></body></html>";
/// assert_eq!(extract_paragraphs(html), vec!["First & foremost.", "Second"]);
/// ```
pub fn extract_paragraphs(html: &str) -> Vec<String> {
    let visible = invisible_re().replace_all(html, " ");

    let fragments: Vec<&str> = paragraph_re()
        .captures_iter(&visible)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if fragments.is_empty() {
        log::debug!("extract: no <p> elements, falling back to whole document");
        return fragment_lines(&visible);
    }

    fragments.into_iter().flat_map(fragment_lines).collect()
}

/// Split plain text into trimmed, non-blank lines.
pub fn split_plain_text(text: &str) -> Vec<String> {
    text.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Decode HTML character references (`&amp;`, `&#233;`, `&#x2014;` …).
///
/// Unknown named references are left untouched.
pub fn decode_entities(text: &str) -> String {
    entity_re()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let body = &caps[1];
            decode_entity(body).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn fragment_lines(fragment: &str) -> Vec<String> {
    let with_breaks = line_break_re().replace_all(fragment, "\n");
    let stripped = tag_re().replace_all(&with_breaks, " ");
    let decoded = decode_entities(&stripped);
    split_plain_text(&decoded)
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entity(body: &str) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let hex = num.strip_prefix('x').or_else(|| num.strip_prefix('X'));
        let code = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let decoded = match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "lsquo" => "‘",
        "rsquo" => "’",
        "ldquo" => "“",
        "rdquo" => "”",
        "laquo" => "«",
        "raquo" => "»",
        "iexcl" => "¡",
        "iquest" => "¿",
        _ => return None,
    };
    Some(decoded.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
