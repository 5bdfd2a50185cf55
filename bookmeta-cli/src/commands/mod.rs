pub(crate) mod config;
pub(crate) mod cover;
pub(crate) mod identify;

use std::future::Future;

use bookmeta_core::BookQuery;
use bookmeta_isfdb::{CancelFlag, IsfdbOptions};

use crate::cli_types::{BookArgs, SourceArgs};
use crate::error::CliError;

/// Turn the book arguments into a query.
pub(crate) fn book_query(book: &BookArgs) -> Result<BookQuery, CliError> {
    let mut query = BookQuery::new().with_authors(book.authors.iter().cloned());
    if let Some(title) = &book.title {
        query = query.with_title(title.clone());
    }

    for raw in &book.identifiers {
        let (ns, value) = raw.split_once(':').ok_or_else(|| {
            CliError::invalid_argument(format!("expected NS:VALUE, got {:?}", raw))
        })?;
        if ns.trim().is_empty() {
            return Err(CliError::invalid_argument(format!(
                "missing namespace in {:?}",
                raw
            )));
        }
        query = query.with_identifier(ns, value);
    }
    if let Some(isbn) = &book.isbn {
        query = query.with_identifier("isbn", isbn.clone());
    }
    if let Some(id) = &book.isfdb {
        query = query.with_identifier("isfdb", id.clone());
    }

    if query.title.is_none() && query.authors.is_empty() && query.identifiers.is_empty() {
        return Err(CliError::invalid_argument(
            "give at least a title, an author or an identifier",
        ));
    }
    Ok(query)
}

/// Load options from config and environment, then apply command-line overrides.
pub(crate) fn load_options(source: &SourceArgs) -> Result<IsfdbOptions, CliError> {
    let mut options = bookmeta_isfdb::config::load()?;
    apply_overrides(&mut options, source);
    Ok(options)
}

fn apply_overrides(options: &mut IsfdbOptions, source: &SourceArgs) {
    if let Some(n) = source.max_downloads {
        options.max_downloads = n;
    }
    if source.append_contents {
        options.append_contents = true;
    }
    if let Some(secs) = source.timeout {
        options.timeout_secs = secs;
    }
    if let Some(url) = &source.base_url {
        options.base_url = url.clone();
    }
}

/// Run `f` on a fresh runtime with Ctrl-C wired to its cancel flag.
pub(crate) fn run_cancellable<F, Fut, T>(f: F) -> Result<T, CliError>
where
    F: FnOnce(CancelFlag) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let cancel = CancelFlag::new();
        let on_ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted, cancelling...");
                on_ctrl_c.cancel();
            }
        });
        f(cancel).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> BookArgs {
        BookArgs {
            title: None,
            authors: Vec::new(),
            isbn: None,
            isfdb: None,
            identifiers: Vec::new(),
        }
    }

    #[test]
    fn test_book_query_collects_identifiers() {
        let args = BookArgs {
            title: Some("Black House".into()),
            authors: vec!["Stephen King".into(), "Peter Straub".into()],
            isbn: Some("9780345470638".into()),
            identifiers: vec!["isfdb:4638".into()],
            ..book()
        };
        let query = book_query(&args).unwrap();
        assert_eq!(query.title.as_deref(), Some("Black House"));
        assert_eq!(query.authors.len(), 2);
        assert_eq!(query.identifiers.isbn(), Some("9780345470638"));
        assert_eq!(query.identifiers.isfdb(), Some("4638"));
    }

    #[test]
    fn test_explicit_flags_win_over_identifier_list() {
        let args = BookArgs {
            isfdb: Some("4638".into()),
            identifiers: vec!["isfdb:1".into()],
            ..book()
        };
        let query = book_query(&args).unwrap();
        assert_eq!(query.identifiers.isfdb(), Some("4638"));
    }

    #[test]
    fn test_book_query_rejects_malformed_identifier() {
        let args = BookArgs {
            identifiers: vec!["4638".into()],
            ..book()
        };
        assert!(matches!(book_query(&args), Err(CliError::InvalidArgument(_))));

        let args = BookArgs {
            identifiers: vec![":4638".into()],
            ..book()
        };
        assert!(matches!(book_query(&args), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_book_query_requires_something() {
        assert!(matches!(book_query(&book()), Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_overrides() {
        let mut options = IsfdbOptions::default();
        let source = SourceArgs {
            max_downloads: Some(3),
            append_contents: true,
            timeout: Some(5),
            base_url: Some("http://localhost:1234".into()),
        };
        apply_overrides(&mut options, &source);
        assert_eq!(options.max_downloads, 3);
        assert!(options.append_contents);
        assert_eq!(options.timeout_secs, 5);
        assert_eq!(options.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_no_overrides_keeps_loaded_values() {
        let mut options = IsfdbOptions {
            append_contents: true,
            ..IsfdbOptions::default()
        };
        let source = SourceArgs {
            max_downloads: None,
            append_contents: false,
            timeout: None,
            base_url: None,
        };
        apply_overrides(&mut options, &source);
        assert!(options.append_contents);
        assert_eq!(options.max_downloads, 1);
    }
}
