//! Configuration for the `nf-filters` command-line tool.
//!
//! Values are merged by ortho-config from, lowest to highest precedence:
//!
//! 1. **Defaults** – built-in values
//! 2. **Configuration file** – `.nf-filters.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `NF_FILTERS_RECORDS`, `NF_FILTERS_URL`, ...
//! 4. **Command-line arguments** – `--records`/`-r`, `--url`/`-u`, ...
//!
//! # Configuration File
//!
//! ```toml
//! records = "evaluations.json"
//! url = "https://evaluations.example/vehicles?make=Toyota"
//! search_fields = "customerName,make,model"
//! format = "jsonl"
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::filters::{DEFAULT_DEBOUNCE_DELAY, FilterOptions};

/// How the command-line tool prints the filtered records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Jsonl,
    /// A single pretty-printed JSON array.
    Json,
    /// The active filter tag markup instead of records.
    Tags,
}

impl FromStr for OutputFormat {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" | "json-lines" | "jsonlines" => Ok(Self::Jsonl),
            "json" => Ok(Self::Json),
            "tags" | "html" => Ok(Self::Tags),
            _ => Err(FilterError::Configuration {
                message: format!(
                    "unsupported output format '{s}': valid options are 'jsonl', 'json' or 'tags'"
                ),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Json => write!(f, "json"),
            Self::Tags => write!(f, "tags"),
        }
    }
}

/// Command-line configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use nf_filters::FilterAppConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = FilterAppConfig::load().expect("failed to load configuration");
/// let records = config.require_records().expect("records path required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "NF_FILTERS",
    discovery(
        dotfile_name = ".nf-filters.toml",
        config_file_name = "nf-filters.toml",
        app_name = "nf-filters"
    )
)]
pub struct FilterAppConfig {
    /// Path to a JSON file holding the records to filter.
    ///
    /// Can be provided via:
    /// - CLI: `--records <PATH>` or `-r <PATH>`
    /// - Environment: `NF_FILTERS_RECORDS`
    /// - Config file: `records = "..."`
    #[ortho_config(cli_short = 'r')]
    pub records: Option<String>,

    /// Navigation URL whose query string carries the filter state.
    ///
    /// Can be provided via:
    /// - CLI: `--url <URL>` or `-u <URL>`
    /// - Environment: `NF_FILTERS_URL`
    /// - Config file: `url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub url: Option<String>,

    /// Comma-separated fields scanned by free-text search.
    ///
    /// Defaults to `customerName,make,model,vin,contractNo,plateNo`.
    #[ortho_config(cli_short = 's')]
    pub search_fields: Option<String>,

    /// Debounce window for typed input, in milliseconds.
    #[ortho_config()]
    pub debounce_delay_ms: u64,

    /// Disables reading state from, and writing it back to, the URL.
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment, so this is set via `--no-url-sync` or the config file.
    #[ortho_config(cli_short = 'n')]
    pub no_url_sync: bool,

    /// Output format: `jsonl` (default), `json` or `tags`.
    #[ortho_config(cli_short = 'f')]
    pub format: Option<String>,
}

impl Default for FilterAppConfig {
    fn default() -> Self {
        Self {
            records: None,
            url: None,
            search_fields: None,
            debounce_delay_ms: default_debounce_delay_ms(),
            no_url_sync: false,
            format: None,
        }
    }
}

fn default_debounce_delay_ms() -> u64 {
    u64::try_from(DEFAULT_DEBOUNCE_DELAY.as_millis()).unwrap_or(u64::MAX)
}

impl FilterAppConfig {
    /// Returns the records path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Configuration`] when no path is configured.
    pub fn require_records(&self) -> Result<&str, FilterError> {
        self.records
            .as_deref()
            .ok_or_else(|| FilterError::Configuration {
                message: "records path is required (use --records or -r)".to_owned(),
            })
    }

    /// Returns the navigation URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Configuration`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, FilterError> {
        self.url.as_deref().ok_or_else(|| FilterError::Configuration {
            message: "navigation URL is required (use --url or -u)".to_owned(),
        })
    }

    /// Resolves the configured output format.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Configuration`] for an unknown format name.
    pub fn output_format(&self) -> Result<OutputFormat, FilterError> {
        self.format
            .as_deref()
            .map_or(Ok(OutputFormat::default()), str::parse)
    }

    /// Returns the configured search fields, ignoring blank entries.
    ///
    /// `None` means the defaults apply.
    #[must_use]
    pub fn search_field_list(&self) -> Option<Vec<String>> {
        let fields: Vec<String> = self
            .search_fields
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        (!fields.is_empty()).then_some(fields)
    }

    /// Builds manager options from this configuration.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let mut options = FilterOptions::default()
            .with_debounce_delay(Duration::from_millis(self.debounce_delay_ms))
            .with_save_to_url(!self.no_url_sync);
        if let Some(fields) = self.search_field_list() {
            options.search_fields = fields;
        }
        options
    }
}

#[cfg(test)]
mod tests;
