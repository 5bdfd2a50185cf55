use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

pub(crate) const SEARCH_PATH: &str = "/cgi-bin/se.cgi";
pub(crate) const DETAIL_PATH: &str = "/cgi-bin/pl.cgi";

// An ISBN search that lands on a publication page but still says this is a miss.
pub(crate) const ZERO_MATCHES_MARKER: &str = "found 0 matches";
pub(crate) const NOT_FOUND_TITLE_MARKER: &str = "<title>404 - ";

/// Format labels that never describe a printed or electronic book.
pub(crate) const UNSUPPORTED_FORMATS: &[&str] = &[
    "audiobook",
    "other format",
    "cd",
    "item",
    "see all formats & editions",
];

/// Search pages stop contributing candidates after this many distinct titles.
pub(crate) const MAX_DISTINCT_TITLES: usize = 5;

// Search results page.
selector!(RESULT_ROW_SELECTOR, "div#main > table tr");
selector!(PRODUCT_IMAGE_SELECTOR, "img.product-image[alt]");
selector!(CONTRIBUTOR_SELECTOR, "a.contributor");
selector!(FORMAT_SELECTOR, "span.format");
selector!(RESULT_TITLE_LINK_SELECTOR, "a.title[href]");

// Publication detail page.
selector!(DETAIL_ROW_SELECTOR, "div#MetadataBox td.pubheader ul > li");
selector!(LABEL_SELECTOR, "b");
selector!(ANCHOR_SELECTOR, "a");
selector!(CONTENTS_SELECTOR, "div#ContentBox ul");
selector!(
    COVER_IMAGE_SELECTOR,
    "div#MetadataBox > table > tbody > tr:first-child > td:first-child img[src]"
);

regex!(TRAILING_DIGITS_REGEX, r"(\d+)$");
regex!(BRACKETED_ISBN_REGEX, r"\[\s*([0-9Xx][0-9Xx\- ]{8,}[0-9Xx])\s*\]");
// Amazon image URLs mark reduced sizes with THUMBZZZ/MZZZZZZZ or _SL160_ style tokens.
regex!(
    THUMBNAIL_URL_REGEX,
    r"(?i)\.(?:THUMBZZZ|[TM]ZZZZZZZ|_S[LXY]\d{1,3}_)\.(?:jpe?g|gif|png)$"
);
