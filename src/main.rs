//! `nf-filters` command-line entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use nf_filters::{FilterAppConfig, FilterError};
use ortho_config::OrthoConfig;

mod cli;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), FilterError> {
    let config = load_config()?;
    cli::filter_records::run(&config)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`FilterError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<FilterAppConfig, FilterError> {
    FilterAppConfig::load().map_err(|error| FilterError::Configuration {
        message: error.to_string(),
    })
}
