use std::sync::LazyLock;

use regex::Regex;

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(?:amp|quot|lt|gt|apos|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap());
static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\. ").unwrap());

const ABBREVIATIONS: &[&str] = &["e.g", "i.e"];

/// Make free text safe to embed in a double-quoted attribute value.
///
/// Newlines are dropped, `&`, `<`, `>` (and `"` when `escape_quotes` is set)
/// become entity references, the result is trimmed and runs of spaces are
/// collapsed. An `&` that already starts an entity reference is kept, so
/// normalizing twice gives the same text.
pub fn normalize(raw: &str, escape_quotes: bool) -> String {
    let text = raw.replace('\n', "");
    let text = escape_ampersands(&text);
    let text = if escape_quotes {
        text.replace('"', "&quot;")
    } else {
        text
    };
    let text = text.replace('<', "&lt;").replace('>', "&gt;");
    SPACES_RE.replace_all(text.trim(), " ").into_owned()
}

fn escape_ampersands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == '&' && !ENTITY_RE.is_match(&text[i..]) {
            out.push_str("&amp;");
        } else {
            out.push(c);
        }
    }
    out
}

/// Keep only the first sentence: everything after the first ". " is
/// dropped unless the period closes "e.g" or "i.e".
pub fn first_sentence(text: &str) -> String {
    for m in SENTENCE_END_RE.find_iter(text) {
        let head = &text[..m.start()];
        if ABBREVIATIONS.iter().any(|a| head.ends_with(a)) {
            continue;
        }
        return format!("{}.", head);
    }
    text.to_string()
}
