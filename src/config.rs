//! Configuration
//!
//! Settings shared by the `salon` binary, read from the command line with environment
//! fallbacks. A `.env` file in the working directory is loaded first if present.

use std::path::PathBuf;

use clap::{Args, Parser};
use jiff::tz::TimeZone;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Command line or environment could not be parsed.
    #[error(transparent)]
    Parse(#[from] clap::Error),

    /// Not an ISO 4217 code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Not an IANA time zone.
    #[error("unknown time zone {name}: {source}")]
    UnknownTimeZone {
        /// Name as configured
        name: String,
        /// Lookup failure
        source: jiff::Error,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Clone, Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Salon settings.
#[derive(Clone, Debug, Args)]
pub struct AppConfig {
    /// ISO 4217 currency the business trades in
    #[arg(long, env = "SALON_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// IANA time zone calendar days are counted in
    #[arg(long, env = "SALON_TIME_ZONE", default_value = "UTC")]
    pub time_zone: String,

    /// Directory holding `catalog/` and `schedules/` fixtures
    #[arg(long, env = "SALON_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// JSON file for calendar display preferences
    #[arg(long, env = "SALON_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    /// Logging
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not ISO 4217.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency.to_uppercase())
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownTimeZone`] if the name is not in the time zone database.
    pub fn time_zone(&self) -> Result<TimeZone, ConfigError> {
        TimeZone::get(&self.time_zone).map_err(|source| ConfigError::UnknownTimeZone {
            name: self.time_zone.clone(),
            source,
        })
    }
}

/// Load `.env` if present, then parse `P` from the process arguments.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the arguments or environment are invalid.
pub fn load<P: Parser>() -> Result<P, ConfigError> {
    _ = dotenvy::dotenv();

    Ok(P::try_parse()?)
}
