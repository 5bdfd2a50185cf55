use std::sync::Arc;

use bookmeta_core::{BookQuery, MatchResult, RelevanceKey};
use tokio::sync::mpsc;

use crate::cache::CoverCache;
use crate::cancel::CancelFlag;
use crate::client::IsfdbClient;
use crate::identify::{IdentifyOutcome, identify};
use crate::options::IsfdbOptions;

/// A downloaded cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub isfdb_id: String,
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Fetch the best cover for `query`, ranking candidates by [`RelevanceKey`].
pub async fn download_cover(
    client: &IsfdbClient,
    options: &IsfdbOptions,
    cache: &Arc<CoverCache>,
    query: &BookQuery,
    cancel: &CancelFlag,
) -> Option<CoverImage> {
    download_cover_ranked(client, options, cache, query, cancel, |r| {
        RelevanceKey::for_result(r, query)
    })
    .await
}

/// Fetch the best cover for `query` using a caller-supplied ranking.
///
/// The cache is consulted first. On a miss, identification runs to fill it
/// and the cover of the best-ranked result that has one is downloaded.
/// Lookup and download failures are logged and yield `None`.
pub async fn download_cover_ranked<K, F>(
    client: &IsfdbClient,
    options: &IsfdbOptions,
    cache: &Arc<CoverCache>,
    query: &BookQuery,
    cancel: &CancelFlag,
    key: F,
) -> Option<CoverImage>
where
    K: Ord,
    F: Fn(&MatchResult) -> K,
{
    let cached = match cache.cached_cover(&query.identifiers) {
        Some(hit) => Some(hit),
        None => {
            log::info!("No cached cover found, running identify");
            let (tx, mut rx) = mpsc::unbounded_channel();
            let outcome = match identify(client, options, cache, query, tx, cancel).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("Identify failed while looking for a cover: {}", e);
                    return None;
                }
            };
            if outcome == IdentifyOutcome::Aborted || cancel.is_cancelled() {
                return None;
            }

            let mut results = Vec::new();
            while let Ok(result) = rx.try_recv() {
                results.push(result);
            }
            results.sort_by_cached_key(|r| key(r));

            results
                .iter()
                .find_map(|r| cache.cached_cover(&r.identifiers()))
        }
    };

    let Some((isfdb_id, url)) = cached else {
        log::info!("No cover found");
        return None;
    };

    if cancel.is_cancelled() {
        return None;
    }

    log::info!("Downloading cover from: {}", url);
    let fetched = tokio::select! {
        fetched = client.download_image(&url) => fetched,
        _ = cancel.cancelled(options.poll_interval()) => {
            log::info!("Cancelled while downloading cover from {}", url);
            return None;
        }
    };
    match fetched {
        Ok(bytes) => Some(CoverImage {
            isfdb_id,
            url,
            bytes,
        }),
        Err(e) => {
            log::error!("Failed to download cover from {}: {}", url, e);
            None
        }
    }
}
