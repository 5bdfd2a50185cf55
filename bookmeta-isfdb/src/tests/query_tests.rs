use super::*;
use crate::options::IsfdbOptions;

fn client() -> IsfdbClient {
    IsfdbClient::new(&IsfdbOptions::default()).unwrap()
}

fn black_house() -> BookQuery {
    BookQuery::new()
        .with_title("Black House")
        .with_authors(["Stephen King", "Peter Straub"])
}

#[test]
fn test_valid_isbn_builds_isbn_search() {
    let query = black_house().with_identifier("isbn", "978-0-345-47063-8");
    let built = build_query(&query).unwrap();
    assert_eq!(built, SearchQuery::Isbn("9780345470638".to_string()));
    assert_eq!(
        built.to_url(&client()),
        "http://www.isfdb.org/cgi-bin/se.cgi?type=ISBN&arg=9780345470638"
    );
}

#[test]
fn test_invalid_isbn_is_ignored() {
    let query = black_house().with_identifier("isbn", "1234567890");
    let built = build_query(&query).unwrap();
    assert!(!built.is_isbn());
}

#[test]
fn test_title_and_first_author_tokens() {
    let built = build_query(&black_house()).unwrap();
    assert_eq!(
        built.to_url(&client()),
        "http://www.isfdb.org/cgi-bin/se.cgi?arg=Black+House+Stephen+King"
    );
}

#[test]
fn test_question_marks_subtitles_and_joiners_removed() {
    let query = BookQuery::new()
        .with_title("The Hitchhiker's Guide? (Trilogy of Five): Book One")
        .with_author("Douglas Adams");
    let SearchQuery::TitleAuthor { tokens } = build_query(&query).unwrap() else {
        panic!("expected a token search");
    };
    assert_eq!(tokens, ["Hitchhiker%27s", "Guide", "Douglas", "Adams"]);
}

#[test]
fn test_diacritics_are_stripped_and_tokens_encoded() {
    let query = BookQuery::new()
        .with_title("Les Misérables")
        .with_author("Victor Hugo");
    let SearchQuery::TitleAuthor { tokens } = build_query(&query).unwrap() else {
        panic!("expected a token search");
    };
    assert_eq!(tokens, ["Les", "Miserables", "Victor", "Hugo"]);
}

#[test]
fn test_title_only_and_author_only() {
    let title_only = BookQuery::new().with_title("Dune");
    assert!(build_query(&title_only).is_ok());

    let author_only = BookQuery::new().with_author("Frank Herbert");
    let SearchQuery::TitleAuthor { tokens } = build_query(&author_only).unwrap() else {
        panic!("expected a token search");
    };
    assert_eq!(tokens, ["Frank", "Herbert"]);
}

#[test]
fn test_nothing_usable_is_insufficient_metadata() {
    assert!(matches!(
        build_query(&BookQuery::new()),
        Err(IsfdbError::InsufficientMetadata)
    ));

    let only_noise = BookQuery::new().with_title("?").with_author("J. R.");
    assert!(matches!(
        build_query(&only_noise),
        Err(IsfdbError::InsufficientMetadata)
    ));
}

#[test]
fn test_direct_identifier_url() {
    let query = SearchQuery::DirectIdentifier("4638".to_string());
    assert_eq!(
        query.to_url(&client()),
        "http://www.isfdb.org/cgi-bin/pl.cgi?4638"
    );
}
