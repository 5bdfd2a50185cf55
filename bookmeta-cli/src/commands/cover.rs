use std::path::Path;

use bookmeta_isfdb::Isfdb;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::cli_types::{BookArgs, SourceArgs};
use crate::commands::{book_query, load_options, run_cancellable};
use crate::error::CliError;
use crate::spinner;

/// Run the cover command.
pub(crate) fn run_cover(
    book: &BookArgs,
    source: &SourceArgs,
    output: &Path,
    quiet: bool,
) -> Result<(), CliError> {
    let query = book_query(book)?;
    let options = load_options(source)?;
    let isfdb = Isfdb::new(options)?;

    let cover = run_cancellable(|cancel| async move {
        let pb = spinner::start("Looking for a cover...", quiet);
        let cover = isfdb.download_cover(&query, &cancel).await;
        pb.finish_and_clear();
        Ok(cover)
    })?;

    let Some(cover) = cover else {
        log::info!(
            "{} No cover found",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        return Ok(());
    };

    std::fs::write(output, &cover.bytes)?;
    log::info!(
        "{} Saved cover for ISFDB {} to {} ({} bytes)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        cover.isfdb_id,
        output.display().if_supports_color(Stdout, |t| t.cyan()),
        cover.bytes.len(),
    );
    log::debug!("Cover source: {}", cover.url);
    Ok(())
}
