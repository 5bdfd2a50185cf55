use std::sync::Arc;

use bookmeta_core::MatchResult;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::{CoverCache, CoverSize};
use crate::client::IsfdbClient;
use crate::consts::NOT_FOUND_TITLE_MARKER;
use crate::detail::{DetailPage, parse_detail_page};
use crate::error::IsfdbError;

/// Fetches and parses one candidate's detail page.
///
/// A worker either sends exactly one [`MatchResult`] or nothing; every
/// failure is logged and swallowed here.
pub(crate) struct DetailWorker {
    pub url: String,
    pub relevance: usize,
    pub client: IsfdbClient,
    pub cache: Arc<CoverCache>,
    pub append_contents: bool,
    pub results: mpsc::UnboundedSender<MatchResult>,
}

impl DetailWorker {
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        log::info!("ISFDB url: {}", self.url);

        let page = match self.client.get_page(&self.url).await {
            Ok(page) => page,
            Err(IsfdbError::NotFound { url }) => {
                log::error!("URL malformed: {}", url);
                return;
            }
            Err(e) if e.is_timeout() => {
                log::error!("ISFDB timed out fetching {}, try again later", self.url);
                return;
            }
            Err(e) => {
                log::error!("Failed to make details query {}: {}", self.url, e);
                return;
            }
        };

        if page.body.contains(NOT_FOUND_TITLE_MARKER) {
            log::error!("URL malformed: {}", self.url);
            return;
        }
        if page.body.is_empty() {
            log::error!("Empty details page for {}", self.url);
            return;
        }

        let detail = parse_detail_page(&page.body, &page.url, self.append_contents);
        self.emit(detail);
    }

    fn emit(self, detail: DetailPage) {
        if detail.isfdb_id.is_none() || detail.title.is_none() || detail.authors.is_empty() {
            log::error!(
                "Could not find title/authors/ISFDB id for {} (id: {:?}, title: {:?}, authors: {:?})",
                self.url,
                detail.isfdb_id,
                detail.title,
                detail.authors
            );
            return;
        }
        let Some(result) = detail.into_match_result(self.relevance) else {
            log::error!("Incomplete record for {}", self.url);
            return;
        };

        if let Some(cover) = result.cover_url() {
            self.cache
                .insert_cover(result.isfdb_id(), cover, CoverSize::from_url(cover));
        }
        if let Some(isbn) = result.isbn() {
            self.cache.insert_isbn(isbn, result.isfdb_id());
        }

        log::debug!("Found {} ({})", result.title(), result.isfdb_id());
        if self.results.send(result).is_err() {
            log::debug!("Result receiver dropped before {} finished", self.url);
        }
    }
}
