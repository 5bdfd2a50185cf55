use bookmeta_core::text::clean_ascii_chars;
use reqwest::{StatusCode, Url};

use crate::consts::{DETAIL_PATH, SEARCH_PATH};
use crate::error::IsfdbError;
use crate::options::IsfdbOptions;

/// A fetched HTML page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after any redirects
    pub url: String,
    pub body: String,
}

impl Page {
    /// Stand-in for a page the server said does not exist.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: String::new(),
        }
    }
}

/// HTTP client for isfdb.org.
///
/// Cheap to clone; each detail worker gets its own clone.
#[derive(Debug, Clone)]
pub struct IsfdbClient {
    http: reqwest::Client,
    base_url: String,
}

impl IsfdbClient {
    pub fn new(options: &IsfdbOptions) -> Result<Self, IsfdbError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout())
            .user_agent(options.user_agent.as_str())
            .build()?;

        Url::parse(options.base())
            .map_err(|e| IsfdbError::config(format!("Invalid base URL {:?}: {}", options.base_url, e)))?;

        Ok(Self {
            http,
            base_url: options.base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the search endpoint, with `query` as its raw query string.
    pub fn search_url(&self, query: &str) -> String {
        format!("{}{}?{}", self.base_url, SEARCH_PATH, query)
    }

    /// URL of a publication's detail page.
    pub fn detail_url(&self, isfdb_id: &str) -> String {
        format!("{}{}?{}", self.base_url, DETAIL_PATH, isfdb_id)
    }

    /// Fetch a page and decode it leniently.
    ///
    /// HTTP 404 maps to [`IsfdbError::NotFound`]; every other non-success
    /// status is a transport error. Invalid UTF-8 is replaced and stray
    /// control characters are removed.
    pub async fn get_page(&self, url: &str) -> Result<Page, IsfdbError> {
        log::debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(IsfdbError::NotFound {
                url: url.to_string(),
            });
        }
        let resp = resp.error_for_status()?;

        let final_url = resp.url().to_string();
        if final_url != url {
            log::debug!("Redirected to {}", final_url);
        }

        let bytes = resp.bytes().await?;
        let body = clean_ascii_chars(String::from_utf8_lossy(&bytes).trim());

        Ok(Page {
            url: final_url,
            body,
        })
    }

    /// Download an image, returning its raw bytes.
    pub async fn download_image(&self, url: &str) -> Result<Vec<u8>, IsfdbError> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Resolve a possibly relative link against the page it appeared on.
pub(crate) fn resolve_url(page_url: &str, href: &str) -> Result<String, IsfdbError> {
    let base = Url::parse(page_url)
        .map_err(|e| IsfdbError::parse(format!("Bad page URL {:?}: {}", page_url, e)))?;
    let joined = base
        .join(href.trim())
        .map_err(|e| IsfdbError::parse(format!("Bad link {:?}: {}", href, e)))?;
    Ok(joined.to_string())
}
