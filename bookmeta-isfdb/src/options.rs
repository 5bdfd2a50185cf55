use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://www.isfdb.org";
pub const MAX_DOWNLOADS_LIMIT: usize = 5;

/// Tunables for the ISFDB source.
///
/// The core only ever reads these; loading them from disk and the
/// environment is done by [`crate::config::load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsfdbOptions {
    /// How many search hits to fetch details for (clamped to 1..=5)
    pub max_downloads: usize,
    /// Fold the publication's contents listing into the comments field
    pub append_contents: bool,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Delay between detail-worker launches, in milliseconds
    pub stagger_ms: u64,
    /// How often the coordinator checks for cancellation while waiting
    pub poll_interval_ms: u64,
    /// Site root, without a trailing slash
    pub base_url: String,
    pub user_agent: String,
}

impl Default for IsfdbOptions {
    fn default() -> Self {
        Self {
            max_downloads: 1,
            append_contents: false,
            timeout_secs: 30,
            stagger_ms: 100,
            poll_interval_ms: 200,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("bookmeta/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl IsfdbOptions {
    pub fn max_results(&self) -> usize {
        self.max_downloads.clamp(1, MAX_DOWNLOADS_LIMIT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// The base URL with any trailing slashes removed.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = IsfdbOptions::default();
        assert_eq!(opts.max_results(), 1);
        assert!(!opts.append_contents);
        assert_eq!(opts.timeout(), Duration::from_secs(30));
        assert_eq!(opts.stagger(), Duration::from_millis(100));
        assert_eq!(opts.poll_interval(), Duration::from_millis(200));
        assert_eq!(opts.base(), "http://www.isfdb.org");
    }

    #[test]
    fn test_max_results_is_clamped() {
        let mut opts = IsfdbOptions::default();
        opts.max_downloads = 0;
        assert_eq!(opts.max_results(), 1);
        opts.max_downloads = 12;
        assert_eq!(opts.max_results(), 5);
        opts.max_downloads = 3;
        assert_eq!(opts.max_results(), 3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let opts: IsfdbOptions = toml::from_str("max_downloads = 4").unwrap();
        assert_eq!(opts.max_downloads, 4);
        assert_eq!(opts.timeout_secs, 30);
        assert_eq!(opts.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_strips_trailing_slash() {
        let opts = IsfdbOptions {
            base_url: "http://localhost:1234/".to_string(),
            ..IsfdbOptions::default()
        };
        assert_eq!(opts.base(), "http://localhost:1234");
    }
}
