use crate::identifiers::BookQuery;
use crate::isbn::to_isbn13;
use crate::metadata::MatchResult;
use crate::text::fold_case;

/// Sort key ordering results the way a metadata host ranks them.
///
/// Fields compare in declaration order, and `false` sorts before `true`, so
/// a result whose ISBN agrees with the query comes first, then results with
/// a cover, then exact title matches, then the source's own ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RelevanceKey {
    pub isbn_mismatch: bool,
    pub missing_cover: bool,
    pub title_mismatch: bool,
    pub source_relevance: usize,
}

impl RelevanceKey {
    pub fn for_result(result: &MatchResult, query: &BookQuery) -> Self {
        let isbn_mismatch = match query.identifiers.valid_isbn() {
            Some(wanted) => result.isbn().and_then(to_isbn13) != to_isbn13(&wanted),
            None => false,
        };

        let title_mismatch = match query.title.as_deref() {
            Some(title) => fold_case(title.trim()) != fold_case(result.title()),
            None => false,
        };

        Self {
            isbn_mismatch,
            missing_cover: !result.has_cover(),
            title_mismatch,
            source_relevance: result.source_relevance(),
        }
    }
}

/// Sort results in place by [`RelevanceKey`] for `query`.
pub fn sort_by_relevance(results: &mut [MatchResult], query: &BookQuery) {
    results.sort_by_cached_key(|r| RelevanceKey::for_result(r, query));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, relevance: usize) -> MatchResult {
        MatchResult::new(title, ["Stephen King"], "4638")
            .unwrap()
            .with_source_relevance(relevance)
    }

    #[test]
    fn test_matching_isbn_ranks_first() {
        let query = BookQuery::new()
            .with_title("Black House")
            .with_identifier("isbn", "978-0-345-47063-8");
        let mut results = vec![
            result("Black House", 0).with_isbn(Some("9780345000000".to_string())),
            result("Black House", 1).with_isbn(Some("9780345470638".to_string())),
        ];
        sort_by_relevance(&mut results, &query);
        assert_eq!(results[0].source_relevance(), 1);
    }

    #[test]
    fn test_isbn10_query_matches_isbn13_result() {
        let query = BookQuery::new().with_identifier("isbn", "0-345-47063-X");
        let key = RelevanceKey::for_result(
            &result("Black House", 0).with_isbn(Some("9780345470638".to_string())),
            &query,
        );
        assert!(!key.isbn_mismatch);
    }

    #[test]
    fn test_cover_beats_title() {
        let query = BookQuery::new().with_title("Black House");
        let mut results = vec![
            result("Black House", 0),
            result("Black House: A Novel", 1).with_cover_url(Some("http://x/c.jpg".to_string())),
        ];
        sort_by_relevance(&mut results, &query);
        assert_eq!(results[0].source_relevance(), 1);
    }

    #[test]
    fn test_title_compare_ignores_case() {
        let query = BookQuery::new().with_title("black house");
        let key = RelevanceKey::for_result(&result("Black House", 0), &query);
        assert!(!key.title_mismatch);
    }

    #[test]
    fn test_falls_back_to_source_order() {
        let query = BookQuery::new();
        let mut results = vec![result("B", 2), result("A", 0), result("C", 1)];
        sort_by_relevance(&mut results, &query);
        let order: Vec<_> = results.iter().map(MatchResult::source_relevance).collect();
        assert_eq!(order, [0, 1, 2]);
    }
}
