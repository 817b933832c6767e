//! CLI subcommands and their shared arguments.

pub mod report;
pub mod status;

use clap::Args;
use serde::Serialize;
use tencent_ads_conversion::{ConfigError, ConversionError, PageQuery};
use thiserror::Error;
use url::Url;

pub use report::ReportArgs;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Building or sending the report failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Output could not be serialized.
    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the landing page identity comes from.
///
/// Without either flag the reporter runs with no page context.
#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    /// Full landing page URL
    #[arg(long, conflicts_with = "query")]
    pub page_url: Option<Url>,

    /// Raw landing page query string (leading `?` optional)
    #[arg(long)]
    pub query: Option<String>,
}

impl PageArgs {
    /// The page query, or `None` when no page was given.
    #[must_use]
    pub fn source(&self) -> Option<PageQuery> {
        match (&self.page_url, &self.query) {
            (Some(url), _) => Some(PageQuery::new(url.query().unwrap_or_default())),
            (None, Some(query)) => Some(PageQuery::new(query.as_str())),
            (None, None) => None,
        }
    }
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
