//! Tracking status command.
//!
//! # Usage
//!
//! ```bash
//! tac status --page-url 'https://shop.example/landing?gdt_vid=click-9'
//! ```

use tencent_ads_conversion::{ConversionReporter, ReporterConfig};

use super::{CliError, PageArgs, print_json};

/// Print the tracking status extracted from the page.
///
/// # Errors
///
/// Returns error if the environment config is invalid or output fails.
pub fn run(page: &PageArgs) -> Result<(), CliError> {
    let config = ReporterConfig::from_env()?;
    let reporter = ConversionReporter::new(config, &page.source())?;

    let status = reporter.tracking_status();
    tracing::info!(tracking_method = %status.tracking_method, "Tracking status resolved");

    print_json(&status)
}
