//! Identification flow: query, search, fan out detail workers, collect.

use std::sync::Arc;

use bookmeta_core::{BookQuery, MatchResult};
use futures::future::join_all;
use tokio::sync::mpsc;

use crate::cache::CoverCache;
use crate::cancel::CancelFlag;
use crate::client::{IsfdbClient, Page};
use crate::consts::{DETAIL_PATH, ZERO_MATCHES_MARKER};
use crate::error::IsfdbError;
use crate::options::IsfdbOptions;
use crate::query::{SearchQuery, build_query};
use crate::search::parse_search_results;
use crate::worker::DetailWorker;

/// How an identification attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyOutcome {
    /// Every launched worker finished. Results were sent as they arrived.
    Completed { candidates: usize },
    /// Neither the original query nor the title/author retry found anything.
    NoMatches,
    /// The cancel flag was set. Workers already launched keep running and
    /// may still send results.
    Aborted,
}

/// Identify a book, sending each result to `results` as it is parsed.
///
/// If a query with identifiers turns up no candidates and a title and
/// authors are available, the search is retried once without identifiers.
pub async fn identify(
    client: &IsfdbClient,
    options: &IsfdbOptions,
    cache: &Arc<CoverCache>,
    query: &BookQuery,
    results: mpsc::UnboundedSender<MatchResult>,
    cancel: &CancelFlag,
) -> Result<IdentifyOutcome, IsfdbError> {
    let mut query = query.clone();
    let mut retried = false;

    loop {
        if cancel.is_cancelled() {
            return Ok(IdentifyOutcome::Aborted);
        }

        let candidates = find_candidates(client, options, &query).await?;

        if cancel.is_cancelled() {
            return Ok(IdentifyOutcome::Aborted);
        }

        if candidates.is_empty() {
            if !retried && !query.identifiers.is_empty() && query.has_title_and_authors() {
                log::info!("No matches found with identifiers, retrying using only title and authors");
                query = query.without_identifiers();
                retried = true;
                continue;
            }
            log::error!("No matches found for {:?} by {:?}", query.title, query.authors);
            return Ok(IdentifyOutcome::NoMatches);
        }

        return run_workers(client, options, cache, candidates, results, cancel).await;
    }
}

/// Resolve a query to an ordered list of detail page URLs.
async fn find_candidates(
    client: &IsfdbClient,
    options: &IsfdbOptions,
    query: &BookQuery,
) -> Result<Vec<String>, IsfdbError> {
    if let Some(id) = query.identifiers.isfdb() {
        let url = SearchQuery::DirectIdentifier(id.trim().to_string()).to_url(client);
        log::debug!("Using ISFDB id {} directly", id);
        return Ok(vec![url]);
    }

    let search = build_query(query).inspect_err(|_| {
        log::error!("Insufficient metadata to construct query");
    })?;
    let url = search.to_url(client);
    log::info!("Querying: {}", url);

    let page = match client.get_page(&url).await {
        Ok(page) => page,
        Err(IsfdbError::NotFound { .. }) if search.is_isbn() => {
            log::info!("Failed to find match for ISBN search {}", url);
            Page::empty(url)
        }
        Err(e) => {
            log::error!("Failed to make identify query: {}", e);
            return Err(e);
        }
    };

    if search.is_isbn()
        && page.url.contains(DETAIL_PATH)
        && !page.body.contains(ZERO_MATCHES_MARKER)
    {
        log::info!("ISBN match location: {}", page.url);
        return Ok(vec![page.url]);
    }

    if page.body.is_empty() {
        log::debug!("Empty search results page for {}", page.url);
        return Ok(Vec::new());
    }

    Ok(parse_search_results(
        &page.body,
        &page.url,
        query.title.as_deref(),
        &query.authors,
        options.max_results(),
    ))
}

/// Launch one staggered worker per candidate and wait for all of them.
async fn run_workers(
    client: &IsfdbClient,
    options: &IsfdbOptions,
    cache: &Arc<CoverCache>,
    candidates: Vec<String>,
    results: mpsc::UnboundedSender<MatchResult>,
    cancel: &CancelFlag,
) -> Result<IdentifyOutcome, IsfdbError> {
    let total = candidates.len();
    let mut handles = Vec::with_capacity(total);

    for (relevance, url) in candidates.into_iter().enumerate() {
        if relevance > 0 {
            tokio::select! {
                _ = tokio::time::sleep(options.stagger()) => {}
                _ = cancel.cancelled(options.poll_interval()) => {}
            }
        }
        if cancel.is_cancelled() {
            log::info!("Cancelled after launching {} of {} workers", handles.len(), total);
            return Ok(IdentifyOutcome::Aborted);
        }

        let worker = DetailWorker {
            url,
            relevance,
            client: client.clone(),
            cache: cache.clone(),
            append_contents: options.append_contents,
            results: results.clone(),
        };
        handles.push(worker.spawn());
    }
    drop(results);

    tokio::select! {
        joined = join_all(handles) => {
            for r in joined {
                if let Err(e) = r {
                    log::error!("Detail worker failed: {}", e);
                }
            }
            Ok(IdentifyOutcome::Completed { candidates: total })
        }
        _ = cancel.cancelled(options.poll_interval()) => {
            log::info!("Cancelled while waiting for detail workers");
            Ok(IdentifyOutcome::Aborted)
        }
    }
}
