use bookmeta_core::BookQuery;
use bookmeta_core::text::{author_tokens, strip_diacritics, title_tokens};

use crate::client::IsfdbClient;
use crate::error::IsfdbError;

/// One way of asking ISFDB about a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// Known publication record; goes straight to the detail page.
    DirectIdentifier(String),
    /// Exact ISBN search.
    Isbn(String),
    /// Free-text search. Tokens are already percent-encoded.
    TitleAuthor { tokens: Vec<String> },
}

impl SearchQuery {
    pub fn to_url(&self, client: &IsfdbClient) -> String {
        match self {
            Self::DirectIdentifier(id) => client.detail_url(id),
            Self::Isbn(isbn) => client.search_url(&format!("type=ISBN&arg={}", isbn)),
            Self::TitleAuthor { tokens } => client.search_url(&format!("arg={}", tokens.join("+"))),
        }
    }

    pub fn is_isbn(&self) -> bool {
        matches!(self, Self::Isbn(_))
    }
}

/// Build a search for `query`, preferring a valid ISBN over title/author.
///
/// Direct identifiers are not considered here; the coordinator handles
/// them before searching.
pub fn build_query(query: &BookQuery) -> Result<SearchQuery, IsfdbError> {
    if let Some(isbn) = query.identifiers.valid_isbn() {
        return Ok(SearchQuery::Isbn(isbn));
    }

    let mut tokens = Vec::new();

    if let Some(title) = query.title.as_deref() {
        let title = strip_diacritics(title).replace('?', "");
        tokens.extend(title_tokens(&title, true, true));
    }

    let authors: Vec<String> = query.authors.iter().map(|a| strip_diacritics(a)).collect();
    tokens.extend(author_tokens(&authors, true));

    if tokens.is_empty() {
        return Err(IsfdbError::InsufficientMetadata);
    }

    let tokens = tokens
        .iter()
        .map(|t| urlencoding::encode(t).into_owned())
        .collect();
    Ok(SearchQuery::TitleAuthor { tokens })
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
