use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::identifiers::{self, Identifiers};

/// Metadata for one catalog record that matched a query.
///
/// A result always carries a non-empty title, at least one author and a
/// non-empty catalog identifier; [`MatchResult::new`] refuses to build one
/// otherwise. Everything else is optional because catalog pages are
/// inconsistent about what they show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    title: String,
    authors: Vec<String>,
    isfdb_id: String,
    isbn: Option<String>,
    comments: Option<String>,
    cover_url: Option<String>,
    publisher: Option<String>,
    pubdate: Option<NaiveDate>,
    source_relevance: usize,
}

impl MatchResult {
    /// Build a result from the three required fields.
    ///
    /// Blank authors are dropped; returns `None` if the title or identifier
    /// is blank or no author remains.
    pub fn new(
        title: impl Into<String>,
        authors: impl IntoIterator<Item = impl Into<String>>,
        isfdb_id: impl Into<String>,
    ) -> Option<Self> {
        let title = title.into().trim().to_string();
        let isfdb_id = isfdb_id.into().trim().to_string();
        let authors: Vec<String> = authors
            .into_iter()
            .map(|a| a.into().trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        if title.is_empty() || isfdb_id.is_empty() || authors.is_empty() {
            return None;
        }

        Some(Self {
            title,
            authors,
            isfdb_id,
            isbn: None,
            comments: None,
            cover_url: None,
            publisher: None,
            pubdate: None,
            source_relevance: 0,
        })
    }

    pub fn with_isbn(mut self, isbn: Option<String>) -> Self {
        self.isbn = isbn;
        self
    }

    pub fn with_comments(mut self, comments: Option<String>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_cover_url(mut self, cover_url: Option<String>) -> Self {
        self.cover_url = cover_url;
        self
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn with_pubdate(mut self, pubdate: Option<NaiveDate>) -> Self {
        self.pubdate = pubdate;
        self
    }

    pub fn with_source_relevance(mut self, relevance: usize) -> Self {
        self.source_relevance = relevance;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn isfdb_id(&self) -> &str {
        &self.isfdb_id
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn pubdate(&self) -> Option<NaiveDate> {
        self.pubdate
    }

    /// Position of the record in the source's candidate list (0 = first).
    pub fn source_relevance(&self) -> usize {
        self.source_relevance
    }

    pub fn has_cover(&self) -> bool {
        self.cover_url.is_some()
    }

    /// Identifiers the record is known by: always `isfdb`, plus `isbn` if present.
    pub fn identifiers(&self) -> Identifiers {
        let mut ids = Identifiers::new().with(identifiers::ISFDB, self.isfdb_id.as_str());
        if let Some(isbn) = &self.isbn {
            ids.insert(identifiers::ISBN, isbn.as_str());
        }
        ids
    }
}

/// Parse a catalog date of the form `YYYY-MM-DD`.
///
/// Catalogs use `00` for an unknown month or day; both default to 1. A zero
/// year or the literal `unknown` means the date is not known at all.
pub fn parse_catalog_date(text: &str) -> Result<NaiveDate, CoreError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("unknown") {
        return Err(CoreError::UnknownDate);
    }

    let mut parts = text.splitn(3, '-');
    let field = |part: Option<&str>, width: usize| -> Result<u32, CoreError> {
        let part = part.ok_or_else(|| CoreError::invalid_date(text))?;
        let digits: String = part.chars().take(width).collect();
        if digits.len() != width || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::invalid_date(text));
        }
        digits.parse().map_err(|_| CoreError::invalid_date(text))
    };

    let year = field(parts.next(), 4)?;
    let month = field(parts.next(), 2)?.max(1);
    let day = field(parts.next(), 2)?.max(1);

    if year == 0 {
        return Err(CoreError::UnknownDate);
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| CoreError::invalid_date(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_title_authors_and_id() {
        assert!(MatchResult::new("Black House", ["Stephen King"], "4638").is_some());
        assert!(MatchResult::new("", ["Stephen King"], "4638").is_none());
        assert!(MatchResult::new("Black House", Vec::<String>::new(), "4638").is_none());
        assert!(MatchResult::new("Black House", ["  "], "4638").is_none());
        assert!(MatchResult::new("Black House", ["Stephen King"], " ").is_none());
    }

    #[test]
    fn test_builders_fill_optional_fields() {
        let result = MatchResult::new("Black House", ["Stephen King", "Peter Straub"], "4638")
            .unwrap()
            .with_isbn(Some("9780345470638".to_string()))
            .with_publisher(Some("Ballantine".to_string()))
            .with_source_relevance(2);
        assert_eq!(result.authors(), ["Stephen King", "Peter Straub"]);
        assert_eq!(result.isbn(), Some("9780345470638"));
        assert_eq!(result.publisher(), Some("Ballantine"));
        assert_eq!(result.source_relevance(), 2);
        assert!(!result.has_cover());
        assert_eq!(result.identifiers().isfdb(), Some("4638"));
        assert_eq!(result.identifiers().isbn(), Some("9780345470638"));
    }

    #[test]
    fn test_parse_catalog_date_full() {
        assert_eq!(
            parse_catalog_date("2001-09-15"),
            Ok(NaiveDate::from_ymd_opt(2001, 9, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_catalog_date_zero_month_and_day() {
        assert_eq!(
            parse_catalog_date("2008-00-00"),
            Ok(NaiveDate::from_ymd_opt(2008, 1, 1).unwrap())
        );
        assert_eq!(
            parse_catalog_date("2008-08-00"),
            Ok(NaiveDate::from_ymd_opt(2008, 8, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_catalog_date_unknown() {
        assert_eq!(parse_catalog_date("0000-00-00"), Err(CoreError::UnknownDate));
        assert_eq!(parse_catalog_date("unknown"), Err(CoreError::UnknownDate));
    }

    #[test]
    fn test_parse_catalog_date_garbage() {
        assert!(matches!(parse_catalog_date("Sept 2001"), Err(CoreError::InvalidDate(_))));
        assert!(matches!(parse_catalog_date("2001-13-01"), Err(CoreError::InvalidDate(_))));
        assert!(matches!(parse_catalog_date("2001"), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn test_serializes_to_json() {
        let result = MatchResult::new("Black House", ["Stephen King"], "4638")
            .unwrap()
            .with_pubdate(NaiveDate::from_ymd_opt(2001, 9, 15));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["title"], "Black House");
        assert_eq!(json["isfdb_id"], "4638");
        assert_eq!(json["pubdate"], "2001-09-15");
    }
}
