//! ISFDB metadata source.
//!
//! Looks books up on isfdb.org by publication id, ISBN or title/author,
//! fetches the matching publication pages concurrently and turns them into
//! [`bookmeta_core::MatchResult`]s. Covers found along the way are cached so
//! a later cover download can skip the search.

pub mod cache;
pub mod cancel;
pub mod client;
pub mod config;
mod consts;
pub mod cover;
pub mod detail;
pub mod error;
pub mod identify;
pub mod options;
pub mod query;
pub mod search;
pub mod source;
mod worker;

pub use cache::{CoverCache, CoverSize};
pub use cancel::CancelFlag;
pub use client::IsfdbClient;
pub use config::{OptionSource, OptionSources, config_path, option_sources};
pub use cover::CoverImage;
pub use error::{FieldError, IsfdbError};
pub use identify::IdentifyOutcome;
pub use options::IsfdbOptions;
pub use query::{SearchQuery, build_query};
pub use search::{SearchCandidate, parse_search_results};
pub use source::{
    CAPABILITIES, Capability, Isfdb, SOURCE_DESCRIPTION, SOURCE_NAME, SOURCE_VERSION, TOUCHED_FIELDS,
};
