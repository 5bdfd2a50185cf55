//! ISBN validation.
//!
//! Catalog pages and user input carry ISBNs with hyphens, spaces and the
//! occasional lowercase `x`. [`check_isbn`] strips all of that and only
//! accepts values whose check digit is correct. [`to_isbn13`] maps both
//! lengths onto one canonical form.

/// Normalise and validate an ISBN-10 or ISBN-13.
///
/// Returns the bare digit string (with a trailing `X` for ISBN-10 where the
/// check digit is ten) or `None` if the value is not a well-formed ISBN.
/// Runs of a single repeated digit (`0000000000`) are rejected even though
/// some of them happen to satisfy the checksum.
pub fn check_isbn(raw: &str) -> Option<String> {
    let isbn: String = raw
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_digit() || *c == 'X')
        .collect();

    if is_repeated_digit(&isbn) {
        return None;
    }

    match isbn.len() {
        10 if is_valid_isbn10(&isbn) => Some(isbn),
        13 if is_valid_isbn13(&isbn) => Some(isbn),
        _ => None,
    }
}

/// Validate an ISBN and express it as ISBN-13.
///
/// An ISBN-10 gains the `978` prefix and a recomputed check digit, so the
/// two printed forms of one book compare equal.
pub fn to_isbn13(raw: &str) -> Option<String> {
    let isbn = check_isbn(raw)?;
    if isbn.len() == 13 {
        return Some(isbn);
    }
    let body = format!("978{}", &isbn[..9]);
    let check = isbn13_check_digit(body.as_bytes());
    Some(format!("{}{}", body, check))
}

fn is_repeated_digit(isbn: &str) -> bool {
    let mut chars = isbn.chars();
    match chars.next() {
        Some(first) if first.is_ascii_digit() && isbn.len() >= 10 => chars.all(|c| c == first),
        _ => false,
    }
}

fn is_valid_isbn10(isbn: &str) -> bool {
    let bytes = isbn.as_bytes();
    let mut sum = 0u32;
    for (i, b) in bytes[..9].iter().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        sum += (i as u32 + 1) * u32::from(b - b'0');
    }
    let check = sum % 11;
    match bytes[9] {
        b'X' => check == 10,
        b if b.is_ascii_digit() => check == u32::from(b - b'0'),
        _ => false,
    }
}

fn is_valid_isbn13(isbn: &str) -> bool {
    let bytes = isbn.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    isbn13_check_digit(&bytes[..12]) == u32::from(bytes[12] - b'0')
}

/// Check digit for the first twelve digits of an ISBN-13.
fn isbn13_check_digit(digits: &[u8]) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let weight = if i % 2 == 0 { 1 } else { 3 };
            weight * u32::from(b - b'0')
        })
        .sum();
    (10 - sum % 10) % 10
}

#[cfg(test)]
#[path = "tests/isbn_tests.rs"]
mod tests;
