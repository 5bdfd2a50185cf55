use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::isbn::check_isbn;

/// Identifier namespace for ISBNs.
pub const ISBN: &str = "isbn";
/// Identifier namespace for ISFDB publication record numbers.
pub const ISFDB: &str = "isfdb";

/// Known identifiers for a book, keyed by namespace (`isbn`, `isfdb`, ...).
///
/// Namespaces are stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiers(BTreeMap<String, String>);

impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, namespace: &str, value: impl Into<String>) -> Self {
        self.insert(namespace, value);
        self
    }

    /// Set an identifier. Blank values are ignored.
    pub fn insert(&mut self, namespace: &str, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if !value.is_empty() {
            self.0.insert(namespace.trim().to_lowercase(), value.to_string());
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&str> {
        self.0.get(&namespace.to_lowercase()).map(String::as_str)
    }

    /// The raw ISBN as supplied, valid or not.
    pub fn isbn(&self) -> Option<&str> {
        self.get(ISBN)
    }

    /// The supplied ISBN, normalised, if it passes checksum validation.
    pub fn valid_isbn(&self) -> Option<String> {
        self.isbn().and_then(check_isbn)
    }

    pub fn isfdb(&self) -> Option<&str> {
        self.get(ISFDB)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Identifiers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ids = Self::new();
        for (k, v) in iter {
            ids.insert(k.as_ref(), v);
        }
        ids
    }
}

/// What the host knows about the book it wants metadata for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookQuery {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub identifiers: Identifiers,
}

impl BookQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let author = author.into();
        if !author.trim().is_empty() {
            self.authors.push(author);
        }
        self
    }

    pub fn with_authors<I, S>(self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        authors.into_iter().fold(self, |q, a| q.with_author(a))
    }

    pub fn with_identifier(mut self, namespace: &str, value: impl Into<String>) -> Self {
        self.identifiers.insert(namespace, value);
        self
    }

    /// Both a title and at least one author are present.
    pub fn has_title_and_authors(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty()) && !self.authors.is_empty()
    }

    /// The same query with every identifier dropped.
    pub fn without_identifiers(&self) -> Self {
        Self {
            title: self.title.clone(),
            authors: self.authors.clone(),
            identifiers: Identifiers::new(),
        }
    }
}
