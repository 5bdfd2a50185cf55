//! Publication detail page parsing.
//!
//! Every field is extracted on its own. A field that fails to parse is
//! logged and left empty; it never takes the rest of the record with it.

use bookmeta_core::metadata::parse_catalog_date;
use bookmeta_core::text::normalize_whitespace;
use bookmeta_core::{CoreError, MatchResult, check_isbn};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Node};

use crate::client::resolve_url;
use crate::consts::{
    ANCHOR_SELECTOR, BRACKETED_ISBN_REGEX, CONTENTS_SELECTOR, COVER_IMAGE_SELECTOR,
    DETAIL_ROW_SELECTOR, LABEL_SELECTOR, TRAILING_DIGITS_REGEX,
};
use crate::error::FieldError;

/// Everything a detail page yielded, with unparseable fields left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailPage {
    pub isfdb_id: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub pubdate: Option<NaiveDate>,
    pub comments: Option<String>,
    pub cover_url: Option<String>,
}

impl DetailPage {
    /// Turn the page into a result, or `None` if it lacks an identifier,
    /// a title or any author.
    pub fn into_match_result(self, source_relevance: usize) -> Option<MatchResult> {
        let result = MatchResult::new(self.title?, self.authors, self.isfdb_id?)?;
        Some(
            result
                .with_isbn(self.isbn)
                .with_publisher(self.publisher)
                .with_pubdate(self.pubdate)
                .with_comments(self.comments)
                .with_cover_url(self.cover_url)
                .with_source_relevance(source_relevance),
        )
    }
}

/// A labelled `<li>` from the publication header.
struct DetailRow<'a> {
    label: String,
    element: ElementRef<'a>,
}

impl<'a> DetailRow<'a> {
    fn new(element: ElementRef<'a>) -> Option<Self> {
        let label = element.select(&LABEL_SELECTOR).next()?;
        let label = label.text().collect::<String>();
        let label = label.trim().trim_end_matches(':').trim().to_string();
        Some(Self { label, element })
    }

    /// Text after the label, without the trailing record number.
    fn value(&self) -> String {
        let mut seen_label = false;
        let mut text = String::new();

        for child in self.element.children() {
            match child.value() {
                Node::Text(t) if seen_label => text.push_str(t),
                Node::Element(el) => {
                    if !seen_label && el.name() == "b" {
                        seen_label = true;
                        continue;
                    }
                    if !seen_label || el.classes().any(|c| c == "recordID") {
                        continue;
                    }
                    if let Some(el) = ElementRef::wrap(child) {
                        text.extend(el.text());
                    }
                }
                _ => {}
            }
        }

        normalize_whitespace(&text)
    }

    fn links(&self) -> Vec<String> {
        self.element
            .select(&ANCHOR_SELECTOR)
            .map(|a| normalize_whitespace(&a.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn detail_rows(document: &Html) -> Vec<DetailRow<'_>> {
    document
        .select(&DETAIL_ROW_SELECTOR)
        .filter_map(DetailRow::new)
        .collect()
}

fn find_row<'r, 'a>(rows: &'r [DetailRow<'a>], labels: &[&str]) -> Option<&'r DetailRow<'a>> {
    rows.iter().find(|r| labels.contains(&r.label.as_str()))
}

/// Parse a detail page fetched from `page_url`.
pub fn parse_detail_page(body: &str, page_url: &str, append_contents: bool) -> DetailPage {
    let document = Html::parse_document(body);
    let rows = detail_rows(&document);

    let field = |name: &str, result| log_field_error(name, page_url, result);

    DetailPage {
        isfdb_id: field("ISFDB id", extract_isfdb_id(page_url)),
        title: field("title", extract_title(&rows)),
        authors: log_field_error("authors", page_url, extract_authors(&rows)).unwrap_or_default(),
        isbn: field("ISBN", extract_isbn(&rows)),
        publisher: field("publisher", extract_publisher(&rows)),
        pubdate: log_field_error("published date", page_url, extract_pubdate(&rows)),
        comments: if append_contents {
            field("comments", extract_contents(&document))
        } else {
            None
        },
        cover_url: field("cover", extract_cover(&document, page_url)),
    }
}

fn log_field_error<T>(name: &str, page_url: &str, result: Result<Option<T>, FieldError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Error parsing {} for url {}: {}", name, page_url, e);
            None
        }
    }
}

pub(crate) fn extract_isfdb_id(url: &str) -> Result<Option<String>, FieldError> {
    TRAILING_DIGITS_REGEX
        .captures(url.trim())
        .map(|c| Some(c[1].to_string()))
        .ok_or(FieldError::Missing("ISFDB id"))
}

fn extract_title(rows: &[DetailRow<'_>]) -> Result<Option<String>, FieldError> {
    let row = find_row(rows, &["Publication"]).ok_or(FieldError::Missing("title"))?;
    let title = row.value();
    if title.is_empty() {
        return Err(FieldError::Missing("title"));
    }
    Ok(Some(title))
}

fn extract_authors(rows: &[DetailRow<'_>]) -> Result<Option<Vec<String>>, FieldError> {
    let mut authors = Vec::new();
    for row in rows
        .iter()
        .filter(|r| r.label.starts_with("Author") || r.label.starts_with("Editor"))
    {
        let links = row.links();
        if links.is_empty() {
            authors.extend(
                row.value()
                    .split(" and ")
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string),
            );
        } else {
            authors.extend(links);
        }
    }

    if authors.is_empty() {
        return Err(FieldError::Missing("authors"));
    }
    Ok(Some(authors))
}

fn extract_isbn(rows: &[DetailRow<'_>]) -> Result<Option<String>, FieldError> {
    let Some(row) = find_row(rows, &["ISBN"]) else {
        return Ok(None);
    };
    let value = row.value();

    // "0-345-47063-X [978-0-345-47063-8]": prefer the ISBN-13
    let candidate = BRACKETED_ISBN_REGEX
        .captures(&value)
        .map(|c| c[1].to_string())
        .or_else(|| value.split_whitespace().next().map(str::to_string));

    match candidate {
        Some(raw) => check_isbn(&raw)
            .map(Some)
            .ok_or_else(|| FieldError::invalid("ISBN", raw)),
        None => Ok(None),
    }
}

fn extract_publisher(rows: &[DetailRow<'_>]) -> Result<Option<String>, FieldError> {
    let Some(row) = find_row(rows, &["Publisher"]) else {
        return Ok(None);
    };
    let publisher = row.links().into_iter().next().unwrap_or_else(|| row.value());
    Ok((!publisher.is_empty()).then_some(publisher))
}

fn extract_pubdate(rows: &[DetailRow<'_>]) -> Result<Option<NaiveDate>, FieldError> {
    let Some(row) = find_row(rows, &["Date", "Year"]) else {
        return Ok(None);
    };
    let value = row.value();
    match parse_catalog_date(&value) {
        Ok(date) => Ok(Some(date)),
        Err(CoreError::UnknownDate) => Ok(None),
        Err(_) => Err(FieldError::invalid("date", value)),
    }
}

fn extract_contents(document: &Html) -> Result<Option<String>, FieldError> {
    Ok(document.select(&CONTENTS_SELECTOR).next().map(|ul| ul.html()))
}

fn extract_cover(document: &Html, page_url: &str) -> Result<Option<String>, FieldError> {
    let Some(src) = document
        .select(&COVER_IMAGE_SELECTOR)
        .next()
        .and_then(|img| img.value().attr("src"))
    else {
        return Ok(None);
    };
    if src.trim().is_empty() {
        return Ok(None);
    }
    resolve_url(page_url, src)
        .map(Some)
        .map_err(|_| FieldError::invalid("cover", src))
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
