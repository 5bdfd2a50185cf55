use super::*;

const PAGE_URL: &str = "http://www.isfdb.org/cgi-bin/se.cgi?arg=Black+House+Stephen+King";

fn row(title: &str, authors: &[&str], formats: &[&str], href: Option<&str>) -> String {
    let authors: String = authors
        .iter()
        .map(|a| format!(r#"<a class="contributor" href="/cgi-bin/ea.cgi?1">{}</a> "#, a))
        .collect();
    let formats: String = formats
        .iter()
        .map(|f| format!(r#"<span class="format">{}</span>"#, f))
        .collect();
    let link = href
        .map(|h| format!(r#"<a class="title" href="{}">{}</a>"#, h, title))
        .unwrap_or_default();
    format!(
        r#"<tr><td><img class="product-image" alt="{}" src="/x.jpg"></td><td>{}{}{}</td></tr>"#,
        title, link, authors, formats
    )
}

fn page(rows: &[String]) -> String {
    format!(
        r#"<html><head><title>Search</title></head><body><div id="main"><table>{}</table></div></body></html>"#,
        rows.concat()
    )
}

fn search(body: &str, max_results: usize) -> Vec<String> {
    parse_search_results(
        body,
        PAGE_URL,
        Some("Black House"),
        &["Stephen King", "Peter Straub"],
        max_results,
    )
}

#[test]
fn test_matching_row_yields_absolute_url() {
    let body = page(&[row(
        "Black House",
        &["Stephen King, Author", "Peter Straub"],
        &["Hardcover"],
        Some("/cgi-bin/pl.cgi?4638"),
    )]);
    assert_eq!(search(&body, 1), ["http://www.isfdb.org/cgi-bin/pl.cgi?4638"]);
}

#[test]
fn test_no_rows_is_empty_not_error() {
    assert!(search("<html><body><p>found 0 matches</p></body></html>", 5).is_empty());
    assert!(search("", 5).is_empty());
}

#[test]
fn test_rows_without_image_title_are_skipped() {
    let body = page(&[
        r#"<tr><td><a class="title" href="/cgi-bin/pl.cgi?1">Black House</a></td></tr>"#.to_string(),
    ]);
    assert!(search(&body, 5).is_empty());
}

#[test]
fn test_title_match_ignores_case() {
    let body = page(&[row(
        "BLACK HOUSE",
        &["STEPHEN KING"],
        &["Paperback"],
        Some("/cgi-bin/pl.cgi?1"),
    )]);
    assert_eq!(search(&body, 1).len(), 1);
}

#[test]
fn test_author_mismatch_is_rejected() {
    let body = page(&[row(
        "Black House",
        &["Somebody Else"],
        &["Paperback"],
        Some("/cgi-bin/pl.cgi?1"),
    )]);
    assert!(search(&body, 5).is_empty());
}

#[test]
fn test_unsupported_formats_exclude_matching_row() {
    let body = page(&[row(
        "Black House",
        &["Stephen King"],
        &["Audiobook", "CD"],
        Some("/cgi-bin/pl.cgi?1"),
    )]);
    assert!(search(&body, 5).is_empty());
}

#[test]
fn test_one_supported_format_is_enough() {
    let body = page(&[row(
        "Black House",
        &["Stephen King"],
        &["Audiobook", "Paperback"],
        Some("/cgi-bin/pl.cgi?1"),
    )]);
    assert_eq!(search(&body, 5).len(), 1);
}

#[test]
fn test_zero_formats_is_ineligible() {
    let body = page(&[row("Black House", &["Stephen King"], &[], Some("/cgi-bin/pl.cgi?1"))]);
    assert!(search(&body, 5).is_empty());
}

#[test]
fn test_duplicate_titles_collapse_to_first() {
    let body = page(&[
        row("Black House", &["Stephen King"], &["Hardcover"], Some("/cgi-bin/pl.cgi?1")),
        row("Black House", &["Stephen King"], &["Paperback"], Some("/cgi-bin/pl.cgi?2")),
        row("Black House (Talisman #2)", &["Stephen King"], &["eBook"], Some("/cgi-bin/pl.cgi?3")),
    ]);
    assert_eq!(search(&body, 5), ["http://www.isfdb.org/cgi-bin/pl.cgi?1"]);
}

#[test]
fn test_nook_marker_is_stripped_before_dedup() {
    let body = page(&[
        row("Black House", &["Stephen King"], &["Hardcover"], Some("/cgi-bin/pl.cgi?1")),
        row("Black House [NOOK Book]", &["Stephen King"], &["eBook"], Some("/cgi-bin/pl.cgi?2")),
    ]);
    assert_eq!(search(&body, 5).len(), 1);
}

#[test]
fn test_result_count_capped_by_max_results() {
    let rows: Vec<String> = (1..=4)
        .map(|i| {
            row(
                &format!("Black House {}", i),
                &["Stephen King"],
                &["Paperback"],
                Some(&format!("/cgi-bin/pl.cgi?{}", i)),
            )
        })
        .collect();
    let body = page(&rows);
    assert_eq!(search(&body, 1), ["http://www.isfdb.org/cgi-bin/pl.cgi?1"]);
    assert_eq!(search(&body, 3).len(), 3);
}

#[test]
fn test_scan_stops_after_five_distinct_titles() {
    let rows: Vec<String> = (1..=8)
        .map(|i| {
            row(
                &format!("Black House {}", i),
                &["Stephen King"],
                &["Paperback"],
                Some(&format!("/cgi-bin/pl.cgi?{}", i)),
            )
        })
        .collect();
    let urls = search(&page(&rows), 10);
    assert_eq!(urls.len(), 5);
    assert_eq!(urls[4], "http://www.isfdb.org/cgi-bin/pl.cgi?5");
}

#[test]
fn test_parse_candidates_extracts_row_fields() {
    let body = page(&[row(
        "Black House (The Talisman)",
        &["Stephen King, Author", "Peter Straub, Author"],
        &["Hardcover", "Paperback"],
        Some("pl.cgi?4638"),
    )]);
    let candidates = parse_candidates(&body, PAGE_URL);
    assert_eq!(
        candidates,
        [SearchCandidate {
            display_title: "Black House".to_string(),
            author_names: vec!["Stephen King".to_string(), "Peter Straub".to_string()],
            detail_url: Some("http://www.isfdb.org/cgi-bin/pl.cgi?4638".to_string()),
            formats: vec!["Hardcover".to_string(), "Paperback".to_string()],
        }]
    );
}

#[test]
fn test_empty_tokens_match_anything() {
    let candidate = SearchCandidate {
        display_title: "Anything".to_string(),
        author_names: vec![],
        detail_url: None,
        formats: vec![],
    };
    let none: [&str; 0] = [];
    assert!(is_match(&candidate, &MatchTokens::new(None, &none)));
}

#[test]
fn test_match_ignores_accents() {
    let candidate = SearchCandidate {
        display_title: "Les Misérables".to_string(),
        author_names: vec!["Victor Hugo".to_string()],
        detail_url: None,
        formats: vec![],
    };
    let tokens = MatchTokens::new(Some("Les Miserables"), &["Victor Hugo"]);
    assert!(is_match(&candidate, &tokens));
}

#[test]
fn test_supported_format_check_is_case_insensitive() {
    assert!(!has_supported_format(&["AUDIOBOOK".to_string()]));
    assert!(!has_supported_format(&["See All Formats & Editions".to_string()]));
    assert!(has_supported_format(&["Mass Market Paperback".to_string()]));
    assert!(!has_supported_format(&[]));
}
