//! Text normalisation and tokenisation for catalog searches.
//!
//! The same rules serve two purposes: building the token list sent to a
//! catalog's free-text search, and deciding whether a search hit plausibly
//! refers to the book the host asked about.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Bracketed subtitles, or everything after a colon/slash.
regex!(SUBTITLE, r"([(\[{].*?[)\]}]|[/:\\].*$)");
// "(2010)", "(Omnibus)", "[Paperback]" and friends.
regex!(
    FORMAT_TAG,
    r"(?i)[({\[](\d{4}|omnibus|anthology|hardcover|audiobook|audio\scd|paperback|turtleback|mass\s*market|edition|ed\.)[\])}]"
);
regex!(EDITION_TAG, r"(?i)[({\[].*?(edition|ed\.).*?[\]})]");
regex!(NUMBER_SEPARATOR, r"(\d+),(\d+)");
regex!(SPACED_HYPHEN, r"\s-");
regex!(TITLE_PUNCTUATION, r#"[:,;!@$%^&*(){}.`~"\s\[\]/《》「」“”]"#);
regex!(AUTHOR_SEPARATOR, r"[-+.:;,，。；：]");
regex!(AUTHOR_NOISE, r#"[!@#$%^&*()（）「」{}`~"\s\[\]/]"#);

/// Words that carry no identifying weight in a title.
const JOINERS: &[&str] = &["a", "and", "the", "&"];

/// Name particles and placeholders that carry no identifying weight.
const AUTHOR_NOISE_WORDS: &[&str] = &["von", "van", "unknown"];

/// Remove combining marks after canonical decomposition (`é` → `e`).
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Fold a string to a form suitable for case-insensitive comparison.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Drop ASCII control characters except tab, newline and carriage return.
///
/// Catalog pages occasionally contain stray control bytes that trip up
/// HTML tokenisers.
pub fn clean_ascii_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| !(c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r')))
        .collect()
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a title into search tokens.
///
/// With `strip_subtitle`, a bracketed part or anything after `:`/`/` is
/// removed first (unless that would leave almost nothing). With
/// `strip_joiners`, articles and conjunctions are dropped.
pub fn title_tokens(title: &str, strip_joiners: bool, strip_subtitle: bool) -> Vec<String> {
    let mut title = title.to_string();

    if strip_subtitle {
        let stripped = SUBTITLE.replace_all(&title, "");
        if stripped.trim().chars().count() > 1 {
            title = stripped.into_owned();
        }
    }

    let title = FORMAT_TAG.replace_all(&title, "");
    let title = EDITION_TAG.replace_all(&title, "");
    let title = NUMBER_SEPARATOR.replace_all(&title, "${1}${2}");
    let title = SPACED_HYPHEN.replace_all(&title, " ");
    let title = TITLE_PUNCTUATION.replace_all(&title, " ");

    title
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == '"' || c == '\''))
        .filter(|t| !t.is_empty())
        .filter(|t| !strip_joiners || !JOINERS.contains(&fold_case(t).as_str()))
        .map(str::to_string)
        .collect()
}

/// Split author names into search tokens.
///
/// Names containing a comma are treated as "Last, First" and reordered.
/// Tokens of two characters or fewer (initials) and name particles are
/// dropped. With `only_first_author`, names after the first are ignored.
pub fn author_tokens<S: AsRef<str>>(authors: &[S], only_first_author: bool) -> Vec<String> {
    let take = if only_first_author { 1 } else { authors.len() };
    let mut tokens = Vec::new();

    for author in authors.iter().take(take) {
        let author = author.as_ref();
        let has_comma = author.contains(',');
        let author = AUTHOR_SEPARATOR.replace_all(author, " ");
        let mut parts: Vec<&str> = author.split_whitespace().collect();
        if has_comma && !parts.is_empty() {
            parts.rotate_left(1);
        }
        for part in parts {
            let token = AUTHOR_NOISE.replace_all(part, "");
            let token = token.trim();
            if token.chars().count() > 2 && !AUTHOR_NOISE_WORDS.contains(&fold_case(token).as_str())
            {
                tokens.push(token.to_string());
            }
        }
    }

    tokens
}

#[cfg(test)]
#[path = "tests/text_tests.rs"]
mod tests;
