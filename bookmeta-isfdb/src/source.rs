use std::sync::Arc;

use bookmeta_core::identifiers::ISFDB;
use bookmeta_core::{BookQuery, Identifiers, MatchResult};
use tokio::sync::mpsc;

use crate::cache::CoverCache;
use crate::cancel::CancelFlag;
use crate::client::IsfdbClient;
use crate::cover::{self, CoverImage};
use crate::error::IsfdbError;
use crate::identify::{self, IdentifyOutcome};
use crate::options::IsfdbOptions;

pub const SOURCE_NAME: &str = "ISFDB";
pub const SOURCE_DESCRIPTION: &str = "Downloads metadata and covers from ISFDB";
pub const SOURCE_VERSION: (u32, u32, u32) = (1, 0, 0);

/// What a metadata source can do for a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Identify,
    Cover,
}

pub const CAPABILITIES: &[Capability] = &[Capability::Identify, Capability::Cover];

/// Metadata fields this source may fill in.
pub const TOUCHED_FIELDS: &[&str] = &[
    "title",
    "authors",
    "identifier:isfdb",
    "identifier:isbn",
    "publisher",
    "pubdate",
    "comments",
];

/// The ISFDB metadata source.
///
/// Owns the HTTP client, the options and the cover cache. The cache is
/// shared by every call made through this source (and any other source
/// built with the same cache via [`Isfdb::with_cache`]).
#[derive(Debug, Clone)]
pub struct Isfdb {
    client: IsfdbClient,
    options: IsfdbOptions,
    cache: Arc<CoverCache>,
}

impl Isfdb {
    pub fn new(options: IsfdbOptions) -> Result<Self, IsfdbError> {
        Self::with_cache(options, Arc::new(CoverCache::new()))
    }

    pub fn with_cache(options: IsfdbOptions, cache: Arc<CoverCache>) -> Result<Self, IsfdbError> {
        let client = IsfdbClient::new(&options)?;
        Ok(Self {
            client,
            options,
            cache,
        })
    }

    pub fn options(&self) -> &IsfdbOptions {
        &self.options
    }

    pub fn cache(&self) -> &Arc<CoverCache> {
        &self.cache
    }

    /// Identify a book, streaming results into `results`.
    pub async fn identify(
        &self,
        query: &BookQuery,
        results: mpsc::UnboundedSender<MatchResult>,
        cancel: &CancelFlag,
    ) -> Result<IdentifyOutcome, IsfdbError> {
        identify::identify(&self.client, &self.options, &self.cache, query, results, cancel).await
    }

    /// Identify a book and collect whatever results arrived, in source order.
    pub async fn identify_all(
        &self,
        query: &BookQuery,
        cancel: &CancelFlag,
    ) -> Result<(IdentifyOutcome, Vec<MatchResult>), IsfdbError> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = self.identify(query, tx, cancel).await?;

        let mut results = Vec::new();
        while let Ok(result) = rx.try_recv() {
            results.push(result);
        }
        results.sort_by_key(MatchResult::source_relevance);
        Ok((outcome, results))
    }

    pub async fn download_cover(
        &self,
        query: &BookQuery,
        cancel: &CancelFlag,
    ) -> Option<CoverImage> {
        cover::download_cover(&self.client, &self.options, &self.cache, query, cancel).await
    }

    pub async fn download_cover_ranked<K, F>(
        &self,
        query: &BookQuery,
        cancel: &CancelFlag,
        key: F,
    ) -> Option<CoverImage>
    where
        K: Ord,
        F: Fn(&MatchResult) -> K,
    {
        cover::download_cover_ranked(&self.client, &self.options, &self.cache, query, cancel, key)
            .await
    }

    pub fn cached_cover_url(&self, identifiers: &Identifiers) -> Option<String> {
        self.cache.cached_cover_url(identifiers)
    }

    /// `(namespace, id, url)` of the catalog page for a book with an ISFDB id.
    pub fn book_url(&self, identifiers: &Identifiers) -> Option<(&'static str, String, String)> {
        let id = identifiers.isfdb()?.trim();
        if id.is_empty() {
            return None;
        }
        Some((ISFDB, id.to_string(), self.client.detail_url(id)))
    }
}
