use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tui::theme::ThemeConfig;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    /// End the interactive session when a search fails instead of showing the error.
    /// Default: false
    #[serde(default)]
    pub exit_on_query_error: bool,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Abstract-connect endpoint the search form is posted to.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Bibliography endpoint used for BibTeX export.
    #[serde(default = "default_bibtex_url")]
    pub bibtex_url: String,

    /// Per-request timeout in seconds. Default: 30
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            search_url: default_search_url(),
            bibtex_url: default_bibtex_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Number of result rows drawn below the form. Default: 10
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Screen row of the first result. Default: 10
    #[serde(default = "default_results_row")]
    pub results_row: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            max_results: default_max_results(),
            results_row: default_results_row(),
        }
    }
}

fn default_search_url() -> String {
    "http://adsabs.harvard.edu/cgi-bin/nph-abs_connect".to_string()
}

fn default_bibtex_url() -> String {
    "http://adsabs.harvard.edu/cgi-bin/nph-bib_query".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_results() -> usize {
    10
}

fn default_results_row() -> u16 {
    10
}

/// Returns the base termads directory: ~/.termads/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".termads"))
}

/// Returns the path of the interactive-session log file
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("termads.log"))
}

/// Ensure the base directory exists
pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.termads/")?;
    Ok(())
}

/// Load config from ~/.termads/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&base_dir()?.join("config.toml"))
}

pub fn load_from(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}
