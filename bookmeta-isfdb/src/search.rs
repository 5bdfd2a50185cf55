//! Search results page parsing and candidate selection.

use bookmeta_core::text::{author_tokens, fold_case, strip_diacritics, title_tokens};
use scraper::{ElementRef, Html};

use crate::client::resolve_url;
use crate::consts::{
    CONTRIBUTOR_SELECTOR, FORMAT_SELECTOR, MAX_DISTINCT_TITLES, PRODUCT_IMAGE_SELECTOR,
    RESULT_ROW_SELECTOR, RESULT_TITLE_LINK_SELECTOR, UNSUPPORTED_FORMATS,
};

/// One row of a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub display_title: String,
    pub author_names: Vec<String>,
    pub detail_url: Option<String>,
    pub formats: Vec<String>,
}

/// Tokens from the host's title and authors that a row must overlap with.
#[derive(Debug, Clone, Default)]
pub struct MatchTokens {
    title: Vec<String>,
    authors: Vec<String>,
}

impl MatchTokens {
    pub fn new<S: AsRef<str>>(title: Option<&str>, authors: &[S]) -> Self {
        let title = title
            .map(|t| title_tokens(&strip_diacritics(t), true, false))
            .unwrap_or_default();
        let authors: Vec<String> = authors.iter().map(|a| strip_diacritics(a.as_ref())).collect();
        let authors = author_tokens(&authors, true);

        Self {
            title: title.iter().map(|t| fold_case(t)).collect(),
            authors: authors.iter().map(|a| fold_case(a)).collect(),
        }
    }
}

/// Loose overlap test between a row and the host's tokens.
///
/// A side with no tokens always matches. Otherwise any single token found
/// as a substring (ignoring case and accents) is enough.
pub fn is_match(candidate: &SearchCandidate, tokens: &MatchTokens) -> bool {
    let title = fold_case(&strip_diacritics(&candidate.display_title));
    let authors = fold_case(&strip_diacritics(&candidate.author_names.join(" ")));

    let title_match = tokens.title.is_empty() || tokens.title.iter().any(|t| title.contains(t.as_str()));
    let author_match =
        tokens.authors.is_empty() || tokens.authors.iter().any(|a| authors.contains(a.as_str()));

    title_match && author_match
}

/// True if at least one declared format is one we can use.
///
/// A row that declares no formats at all is not eligible.
pub fn has_supported_format(formats: &[String]) -> bool {
    formats
        .iter()
        .any(|f| !UNSUPPORTED_FORMATS.contains(&fold_case(f.trim()).as_str()))
}

/// Parse every row of a search results page into candidates.
///
/// Rows without a product image title are skipped. Relative links are
/// resolved against `page_url`.
pub fn parse_candidates(body: &str, page_url: &str) -> Vec<SearchCandidate> {
    let document = Html::parse_document(body);
    document
        .select(&RESULT_ROW_SELECTOR)
        .filter_map(|row| parse_row(row, page_url))
        .collect()
}

fn parse_row(row: ElementRef<'_>, page_url: &str) -> Option<SearchCandidate> {
    let title = row
        .select(&PRODUCT_IMAGE_SELECTOR)
        .filter_map(|img| img.value().attr("alt"))
        .collect::<String>();
    let title = clean_display_title(&title);
    if title.is_empty() {
        return None;
    }

    let author_names = row
        .select(&CONTRIBUTOR_SELECTOR)
        .filter_map(|a| {
            let text = a.text().collect::<String>();
            let name = text.split(',').next().unwrap_or_default().trim().to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect();

    let formats = row
        .select(&FORMAT_SELECTOR)
        .map(|f| f.text().collect::<String>().trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();

    let detail_url = row
        .select(&RESULT_TITLE_LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| !href.trim().is_empty())
        .and_then(|href| match resolve_url(page_url, href) {
            Ok(url) => Some(url),
            Err(e) => {
                log::warn!("Ignoring result link: {}", e);
                None
            }
        });

    Some(SearchCandidate {
        display_title: title,
        author_names,
        detail_url,
        formats,
    })
}

/// Drop a trailing series annotation and any "[NOOK Book]" marker.
fn clean_display_title(title: &str) -> String {
    let title = match title.rfind('(') {
        Some(idx) => &title[..idx],
        None => title,
    };
    title.replace("[NOOK Book]", "").trim().to_string()
}

/// Pick detail URLs worth fetching from a search results page.
///
/// Rows must match the host's title/author tokens and offer a supported
/// format. Titles are deduplicated in page order, scanning stops after five
/// distinct titles, and at most `max_results` URLs are returned.
pub fn parse_search_results<S: AsRef<str>>(
    body: &str,
    page_url: &str,
    title: Option<&str>,
    authors: &[S],
    max_results: usize,
) -> Vec<String> {
    let tokens = MatchTokens::new(title, authors);
    select_candidates(parse_candidates(body, page_url), &tokens, max_results)
}

pub(crate) fn select_candidates(
    candidates: Vec<SearchCandidate>,
    tokens: &MatchTokens,
    max_results: usize,
) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();
    let mut urls: Vec<String> = Vec::new();

    for candidate in candidates {
        log::debug!(
            "Considering search result: {} {:?}",
            candidate.display_title,
            candidate.author_names
        );
        if !is_match(&candidate, tokens) {
            log::debug!(
                "Rejecting as not close enough match: {} {:?}",
                candidate.display_title,
                candidate.author_names
            );
            continue;
        }
        if !has_supported_format(&candidate.formats) {
            log::debug!(
                "Rejecting {} for format {:?}",
                candidate.display_title,
                candidate.formats
            );
            continue;
        }
        let Some(url) = candidate.detail_url else {
            continue;
        };
        if titles.contains(&candidate.display_title) {
            continue;
        }

        titles.push(candidate.display_title);
        urls.push(url);
        if titles.len() >= MAX_DISTINCT_TITLES {
            break;
        }
    }

    urls.truncate(max_results);
    urls
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
