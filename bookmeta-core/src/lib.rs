//! Shared types for bookmeta metadata sources.
//!
//! Everything here is pure data and text handling: the query a host hands
//! to a source, the records a source hands back, ISBN validation and the
//! tokenisation rules used to build and match catalog searches.

pub mod error;
pub mod identifiers;
pub mod isbn;
pub mod metadata;
pub mod rank;
pub mod text;

pub use error::CoreError;
pub use identifiers::{BookQuery, Identifiers};
pub use isbn::{check_isbn, to_isbn13};
pub use metadata::{MatchResult, parse_catalog_date};
pub use rank::{RelevanceKey, sort_by_relevance};
