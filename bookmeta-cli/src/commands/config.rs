use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::error::CliError;

/// Show current settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = bookmeta_isfdb::config_path();
    let sources = bookmeta_isfdb::option_sources();

    let (major, minor, patch) = bookmeta_isfdb::SOURCE_VERSION;
    log::info!(
        "{} {}",
        format!("{} Configuration", bookmeta_isfdb::SOURCE_NAME)
            .if_supports_color(Stdout, |t| t.bold()),
        format!("v{}.{}.{}", major, minor, patch).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("  {}", bookmeta_isfdb::SOURCE_DESCRIPTION);
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let options = bookmeta_isfdb::config::load()?;

    let fields = [
        (
            "max_downloads",
            &sources.max_downloads,
            format!("{} (effective {})", options.max_downloads, options.max_results()),
        ),
        (
            "append_contents",
            &sources.append_contents,
            options.append_contents.to_string(),
        ),
        (
            "timeout_secs",
            &sources.timeout_secs,
            options.timeout_secs.to_string(),
        ),
        ("stagger_ms", &sources.stagger_ms, options.stagger_ms.to_string()),
        (
            "poll_interval_ms",
            &sources.poll_interval_ms,
            options.poll_interval_ms.to_string(),
        ),
        ("base_url", &sources.base_url, options.base_url.clone()),
        ("user_agent", &sources.user_agent, options.user_agent.clone()),
    ];

    for (name, source, value) in &fields {
        log::info!(
            "  {} {} {}",
            format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path() {
    match bookmeta_isfdb::config_path() {
        Some(p) => println!("{}", p.display()),
        None => log::error!("Could not determine config directory"),
    }
}
