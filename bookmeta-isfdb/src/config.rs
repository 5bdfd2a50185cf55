use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::IsfdbError;
use crate::options::IsfdbOptions;

pub const ENV_MAX_DOWNLOADS: &str = "BOOKMETA_ISFDB_MAX_DOWNLOADS";
pub const ENV_APPEND_CONTENTS: &str = "BOOKMETA_ISFDB_APPEND_CONTENTS";
pub const ENV_TIMEOUT: &str = "BOOKMETA_ISFDB_TIMEOUT";
pub const ENV_BASE_URL: &str = "BOOKMETA_ISFDB_BASE_URL";

/// Where an option's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default.
    Default,
}

impl std::fmt::Display for OptionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Provenance of each option.
#[derive(Debug)]
pub struct OptionSources {
    pub max_downloads: OptionSource,
    pub append_contents: OptionSource,
    pub timeout_secs: OptionSource,
    pub stagger_ms: OptionSource,
    pub poll_interval_ms: OptionSource,
    pub base_url: OptionSource,
    pub user_agent: OptionSource,
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    isfdb: Option<IsfdbConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct IsfdbConfig {
    max_downloads: Option<usize>,
    append_contents: Option<bool>,
    timeout_secs: Option<u64>,
    stagger_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    base_url: Option<String>,
    user_agent: Option<String>,
}

/// Return the path to the options file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bookmeta").join("isfdb.toml"))
}

/// Load options from the environment, the config file, or defaults.
///
/// Priority: env vars > config file > defaults. A missing file is not an
/// error; a file that exists but does not parse is.
pub fn load() -> Result<IsfdbOptions, IsfdbError> {
    load_from(config_path().as_deref(), |var| std::env::var(var).ok())
}

/// Like [`load`], with an explicit file path and environment lookup.
pub fn load_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<IsfdbOptions, IsfdbError> {
    let file = match path {
        Some(path) => read_config_file(path)?,
        None => None,
    };
    let file = file.unwrap_or_default();
    let defaults = IsfdbOptions::default();

    let max_downloads = match env(ENV_MAX_DOWNLOADS) {
        Some(v) => parse_env(ENV_MAX_DOWNLOADS, &v)?,
        None => file.max_downloads.unwrap_or(defaults.max_downloads),
    };

    let append_contents = match env(ENV_APPEND_CONTENTS) {
        Some(v) => parse_bool(ENV_APPEND_CONTENTS, &v)?,
        None => file.append_contents.unwrap_or(defaults.append_contents),
    };

    let timeout_secs = match env(ENV_TIMEOUT) {
        Some(v) => parse_env(ENV_TIMEOUT, &v)?,
        None => file.timeout_secs.unwrap_or(defaults.timeout_secs),
    };

    let base_url = env(ENV_BASE_URL)
        .or(file.base_url)
        .unwrap_or(defaults.base_url);

    Ok(IsfdbOptions {
        max_downloads,
        append_contents,
        timeout_secs,
        stagger_ms: file.stagger_ms.unwrap_or(defaults.stagger_ms),
        poll_interval_ms: file.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
        base_url,
        user_agent: file.user_agent.unwrap_or(defaults.user_agent),
    })
}

/// Determine where each option is coming from.
pub fn option_sources() -> OptionSources {
    option_sources_from(config_path().as_deref(), |var| std::env::var(var).ok())
}

/// Like [`option_sources`], with an explicit file path and environment lookup.
pub fn option_sources_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> OptionSources {
    let file = path
        .and_then(|p| read_config_file(p).ok().flatten())
        .unwrap_or_default();

    let pick = |var: Option<&'static str>, in_file: bool| match var {
        Some(var) if env(var).is_some() => OptionSource::EnvVar(var),
        _ if in_file => OptionSource::ConfigFile,
        _ => OptionSource::Default,
    };

    OptionSources {
        max_downloads: pick(Some(ENV_MAX_DOWNLOADS), file.max_downloads.is_some()),
        append_contents: pick(Some(ENV_APPEND_CONTENTS), file.append_contents.is_some()),
        timeout_secs: pick(Some(ENV_TIMEOUT), file.timeout_secs.is_some()),
        stagger_ms: pick(None, file.stagger_ms.is_some()),
        poll_interval_ms: pick(None, file.poll_interval_ms.is_some()),
        base_url: pick(Some(ENV_BASE_URL), file.base_url.is_some()),
        user_agent: pick(None, file.user_agent.is_some()),
    }
}

fn read_config_file(path: &Path) -> Result<Option<IsfdbConfig>, IsfdbError> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        IsfdbError::config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Ok(config.isfdb)
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> Result<T, IsfdbError> {
    value
        .trim()
        .parse()
        .map_err(|_| IsfdbError::config(format!("Invalid value for {}: {:?}", var, value)))
}

fn parse_bool(var: &str, value: &str) -> Result<bool, IsfdbError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(IsfdbError::config(format!(
            "Invalid value for {}: {:?}",
            var, value
        ))),
    }
}
