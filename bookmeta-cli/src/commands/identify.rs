use bookmeta_core::{MatchResult, sort_by_relevance};
use bookmeta_isfdb::{IdentifyOutcome, Isfdb};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::{BookArgs, SourceArgs};
use crate::commands::{book_query, load_options, run_cancellable};
use crate::error::CliError;
use crate::spinner;

/// Run the identify command.
pub(crate) fn run_identify(
    book: &BookArgs,
    source: &SourceArgs,
    json: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let query = book_query(book)?;
    let options = load_options(source)?;
    let isfdb = Isfdb::new(options)?;

    let lookup = query.clone();
    let (outcome, mut results) = run_cancellable(|cancel| async move {
        let pb = spinner::start("Searching ISFDB...", quiet || json);
        let found = isfdb.identify_all(&lookup, &cancel).await;
        pb.finish_and_clear();
        Ok(found?)
    })?;
    sort_by_relevance(&mut results, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    match outcome {
        IdentifyOutcome::Aborted => {
            log::warn!(
                "{} Cancelled ({} result(s) received before stopping)",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                results.len(),
            );
        }
        IdentifyOutcome::NoMatches => {
            log::info!(
                "{} No matches found",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            );
            return Ok(());
        }
        IdentifyOutcome::Completed { candidates } => {
            log::info!(
                "{} {} of {} candidate(s) matched",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                results.len(),
                candidates,
            );
        }
    }

    for result in &results {
        log::info!("");
        print_result(result);
    }
    Ok(())
}

fn print_result(result: &MatchResult) {
    log::info!(
        "{}",
        result.title().if_supports_color(Stdout, |t| t.bold()),
    );
    print_field("Authors", Some(&result.authors().join(" & ")));
    print_field("ISFDB", Some(result.isfdb_id()));
    print_field("ISBN", result.isbn());
    print_field("Publisher", result.publisher());
    print_field(
        "Published",
        result.pubdate().map(|d| d.format("%Y-%m-%d").to_string()).as_deref(),
    );
    print_field("Cover", result.cover_url());
    if let Some(comments) = result.comments() {
        print_field("Comments", Some(&format!("{} chars", comments.len())));
    }
}

fn print_field(name: &str, value: Option<&str>) {
    let Some(value) = value else {
        return;
    };
    log::info!(
        "  {} {}",
        format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
        value,
    );
}
