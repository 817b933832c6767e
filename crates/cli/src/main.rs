//! Tencent Ads conversion CLI - Tracking status checks and manual reports.
//!
//! # Usage
//!
//! ```bash
//! # Show which identifier a landing page URL carries
//! tac status --page-url 'https://shop.example/landing?gdt_vid=click-9'
//!
//! # Report a purchase for a callback-token landing
//! TENCENT_ADS_ACCESS_TOKEN=... tac report --action-type PURCHASE --value 10000 \
//!     --quantity 1 --query '__CALLBACK__=tok%2525201'
//!
//! # Report a registration keyed by click id
//! tac report --action-type REGISTER --query 'gdt_vid=click-9' \
//!     --account-id A1 --action-set-id S1 --custom channel=wechat
//! ```
//!
//! # Commands
//!
//! - `status` - Print the tracking status extracted from a page URL
//! - `report` - Send one conversion report and print the platform response
//!
//! Credentials and endpoint overrides come from the environment; see
//! [`tencent_ads_conversion::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CliError, PageArgs, ReportArgs};

#[derive(Parser)]
#[command(name = "tac")]
#[command(author, version, about = "Tencent Ads conversion reporting tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tracking status for a landing page
    Status {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Report a conversion
    Report(ReportArgs),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tac=info,tencent_ads_conversion=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Status { page } => commands::status::run(&page)?,
        Commands::Report(args) => commands::report::run(&args).await?,
    }
    Ok(())
}
