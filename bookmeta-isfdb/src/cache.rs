//! In-memory cover URL cache.
//!
//! Detail workers record every (identifier, cover URL) pair they resolve,
//! plus the ISBN each identifier was found under, so a later cover download
//! for the same book can skip identification entirely. Entries live for the
//! lifetime of the cache and are never evicted.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bookmeta_core::Identifiers;
use bookmeta_core::to_isbn13;

use crate::consts::THUMBNAIL_URL_REGEX;

/// Size variant of a cached cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    Full,
    Small,
}

impl CoverSize {
    const SMALL_PREFIX: &'static str = "small/";

    /// Key prefixes that mark a reduced-size entry.
    const KNOWN_PREFIXES: &'static [&'static str] = &[Self::SMALL_PREFIX];

    /// Guess the size variant from the shape of a cover URL.
    pub fn from_url(url: &str) -> Self {
        if THUMBNAIL_URL_REGEX.is_match(url) {
            Self::Small
        } else {
            Self::Full
        }
    }

    fn key(self, isfdb_id: &str) -> String {
        match self {
            Self::Full => isfdb_id.to_string(),
            Self::Small => format!("{}{}", Self::SMALL_PREFIX, isfdb_id),
        }
    }
}

#[derive(Debug, Default)]
struct CacheInner {
    covers: BTreeMap<String, String>,
    isbn_to_id: BTreeMap<String, String>,
}

/// Identifier → cover URL map shared by every worker of a source.
#[derive(Debug, Default)]
pub struct CoverCache {
    inner: Mutex<CacheInner>,
}

impl CoverCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // Every write is a single insert, so a poisoned map is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_cover(&self, isfdb_id: &str, url: &str, size: CoverSize) {
        self.lock()
            .covers
            .insert(size.key(isfdb_id), url.to_string());
    }

    /// Remember which identifier an ISBN resolved to.
    ///
    /// Keys are ISBN-13, so either printed form of a book finds the entry.
    pub fn insert_isbn(&self, isbn: &str, isfdb_id: &str) {
        let isbn = to_isbn13(isbn).unwrap_or_else(|| isbn.to_string());
        self.lock()
            .isbn_to_id
            .insert(isbn, isfdb_id.to_string());
    }

    pub fn isbn_to_identifier(&self, isbn: &str) -> Option<String> {
        let isbn = to_isbn13(isbn).unwrap_or_else(|| isbn.to_string());
        self.lock().isbn_to_id.get(&isbn).cloned()
    }

    /// Look up a cover by identifier.
    ///
    /// Tries the plain key, then the small variant, then falls back to the
    /// first entry (in key order) carrying any known size prefix.
    pub fn cover_url(&self, isfdb_id: &str) -> Option<String> {
        let inner = self.lock();
        let covers = &inner.covers;

        if let Some(url) = covers.get(&CoverSize::Full.key(isfdb_id)) {
            return Some(url.clone());
        }
        if let Some(url) = covers.get(&CoverSize::Small.key(isfdb_id)) {
            return Some(url.clone());
        }
        covers
            .iter()
            .find(|(key, _)| {
                CoverSize::KNOWN_PREFIXES
                    .iter()
                    .any(|prefix| key.starts_with(prefix))
            })
            .map(|(_, url)| url.clone())
    }

    /// Resolve the identifier for a book, directly or via a cached ISBN.
    pub fn cached_identifier(&self, identifiers: &Identifiers) -> Option<String> {
        match identifiers.isfdb() {
            Some(id) => Some(id.to_string()),
            None => identifiers
                .isbn()
                .and_then(|isbn| self.isbn_to_identifier(isbn)),
        }
    }

    /// Cached cover for a book, returned with the identifier it was found under.
    pub fn cached_cover(&self, identifiers: &Identifiers) -> Option<(String, String)> {
        let isfdb_id = self.cached_identifier(identifiers)?;
        let url = self.cover_url(&isfdb_id)?;
        Some((isfdb_id, url))
    }

    pub fn cached_cover_url(&self, identifiers: &Identifiers) -> Option<String> {
        self.cached_cover(identifiers).map(|(_, url)| url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LARGE: &str = "http://images.amazon.com/images/P/034547063X.01.LZZZZZZZ.jpg";
    const THUMB: &str = "http://images.amazon.com/images/P/034547063X.01.MZZZZZZZ.jpg";

    #[test]
    fn test_round_trip() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", LARGE, CoverSize::Full);
        assert_eq!(cache.cover_url("4638").as_deref(), Some(LARGE));
    }

    #[test]
    fn test_small_variant_for_same_id() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", THUMB, CoverSize::Small);
        assert_eq!(cache.cover_url("4638").as_deref(), Some(THUMB));
    }

    #[test]
    fn test_plain_key_wins_over_small() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", THUMB, CoverSize::Small);
        cache.insert_cover("4638", LARGE, CoverSize::Full);
        assert_eq!(cache.cover_url("4638").as_deref(), Some(LARGE));
    }

    #[test]
    fn test_unknown_id_falls_back_to_any_small_entry() {
        let cache = CoverCache::new();
        cache.insert_cover("9999", THUMB, CoverSize::Small);
        assert_eq!(cache.cover_url("4638").as_deref(), Some(THUMB));
    }

    #[test]
    fn test_unknown_id_without_small_entries() {
        let cache = CoverCache::new();
        cache.insert_cover("9999", LARGE, CoverSize::Full);
        assert_eq!(cache.cover_url("4638"), None);
        assert_eq!(CoverCache::new().cover_url("4638"), None);
    }

    #[test]
    fn test_isbn_lookup_normalises() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", LARGE, CoverSize::Full);
        cache.insert_isbn("9780345470638", "4638");

        let ids = Identifiers::new().with("isbn", "978-0-345-47063-8");
        assert_eq!(cache.cached_cover(&ids), Some(("4638".to_string(), LARGE.to_string())));
    }

    #[test]
    fn test_isbn10_and_isbn13_share_an_entry() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", LARGE, CoverSize::Full);
        cache.insert_isbn("9780345470638", "4638");
        assert_eq!(cache.isbn_to_identifier("0-345-47063-X").as_deref(), Some("4638"));

        let cache = CoverCache::new();
        cache.insert_isbn("034547063X", "4638");
        assert_eq!(cache.isbn_to_identifier("978-0-345-47063-8").as_deref(), Some("4638"));
    }

    #[test]
    fn test_isfdb_identifier_preferred_over_isbn() {
        let cache = CoverCache::new();
        cache.insert_cover("4638", LARGE, CoverSize::Full);
        cache.insert_isbn("9780345470638", "1111");

        let ids = Identifiers::new()
            .with("isfdb", "4638")
            .with("isbn", "9780345470638");
        assert_eq!(cache.cached_cover_url(&ids).as_deref(), Some(LARGE));
    }

    #[test]
    fn test_cover_size_from_url() {
        assert_eq!(CoverSize::from_url(LARGE), CoverSize::Full);
        assert_eq!(CoverSize::from_url(THUMB), CoverSize::Small);
        assert_eq!(
            CoverSize::from_url("http://images.amazon.com/images/P/0345470630.01._SL160_.jpg"),
            CoverSize::Small
        );
        assert_eq!(
            CoverSize::from_url("http://www.isfdb.org/images/black_house.jpg"),
            CoverSize::Full
        );
    }
}
