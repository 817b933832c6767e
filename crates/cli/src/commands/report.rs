//! Conversion report command.
//!
//! # Usage
//!
//! ```bash
//! tac report --action-type PURCHASE --value 10000 --quantity 1 \
//!     --query '__CALLBACK__=tok%2525201' --custom coupon=SUMMER --custom first=true
//! ```
//!
//! # Environment Variables
//!
//! - `TENCENT_ADS_ACCESS_TOKEN` - Access token sent with the report
//! - `TENCENT_ADS_ACCOUNT_ID` / `TENCENT_ADS_ACTION_SET_ID` - Click-id reports
//!   (overridable with `--account-id` / `--action-set-id`)

use clap::Args;
use serde_json::Number;
use tencent_ads_conversion::{
    ActionType, ConversionParams, ConversionReporter, ParamValue, ReporterConfig,
};

use super::{CliError, PageArgs, print_json};

/// Arguments for `tac report`.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Conversion action type (PURCHASE, `COMPLETE_ORDER`, REGISTER, or any tag)
    #[arg(short, long)]
    pub action_type: ActionType,

    /// Conversion value (integer or decimal)
    #[arg(long)]
    pub value: Option<Number>,

    /// Item quantity
    #[arg(long)]
    pub quantity: Option<Number>,

    /// Advertiser-side identifier (order number, user id)
    #[arg(long)]
    pub outer_id: Option<String>,

    /// Custom parameter as `key=value` (repeatable)
    #[arg(long = "custom", value_parser = parse_custom_param)]
    pub custom: Vec<(String, ParamValue)>,

    /// Advertiser account id (overrides `TENCENT_ADS_ACCOUNT_ID`)
    #[arg(long)]
    pub account_id: Option<String>,

    /// User action set id (overrides `TENCENT_ADS_ACTION_SET_ID`)
    #[arg(long)]
    pub action_set_id: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

impl ReportArgs {
    /// Conversion parameters described by the flags.
    #[must_use]
    pub fn params(&self) -> ConversionParams {
        let mut params = ConversionParams::new(self.action_type.clone());
        params.value.clone_from(&self.value);
        params.quantity.clone_from(&self.quantity);
        params.outer_id.clone_from(&self.outer_id);

        self.custom
            .iter()
            .fold(params, |params, (key, value)| {
                params.with_custom_param(key.as_str(), value.clone())
            })
    }
}

/// Send one conversion report and print the response.
///
/// # Errors
///
/// Returns error if the config is invalid, validation fails, or the report
/// is rejected.
pub async fn run(args: &ReportArgs) -> Result<(), CliError> {
    let mut config = ReporterConfig::from_env()?;
    if let Some(account_id) = &args.account_id {
        config.account_id = Some(account_id.clone());
    }
    if let Some(action_set_id) = &args.action_set_id {
        config.action_set_id = Some(action_set_id.clone());
    }

    let reporter = ConversionReporter::new(config, &args.page.source())?;
    let response = reporter.report_conversion(&args.params()).await?;

    tracing::info!(
        code = response.code,
        success = response.is_success(),
        "Conversion reported"
    );

    print_json(&response)
}

fn parse_custom_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;

    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }

    Ok((key.to_string(), ParamValue::parse_cli(value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn parse(argv: &[&str]) -> ReportArgs {
        TestCli::try_parse_from(std::iter::once("tac").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_parse_custom_param() {
        assert_eq!(
            parse_custom_param("coupon=SUMMER").unwrap(),
            ("coupon".to_string(), ParamValue::from("SUMMER"))
        );
        assert_eq!(
            parse_custom_param("expr=a=b").unwrap(),
            ("expr".to_string(), ParamValue::from("a=b"))
        );
        assert!(parse_custom_param("novalue").is_err());
        assert!(parse_custom_param("=x").is_err());
    }

    #[test]
    fn test_params_from_flags() {
        let args = parse(&[
            "--action-type",
            "PURCHASE",
            "--value",
            "10000",
            "--quantity",
            "1",
            "--outer-id",
            "order-7",
            "--custom",
            "first=true",
            "--custom",
            "coupon=SUMMER",
        ]);

        let params = args.params();
        assert_eq!(params.action_type, ActionType::PURCHASE);
        assert_eq!(params.value, Some(Number::from(10000)));
        assert_eq!(params.quantity, Some(Number::from(1)));
        assert_eq!(params.outer_id.as_deref(), Some("order-7"));

        let custom = params.custom_params.unwrap();
        assert_eq!(custom.get("first"), Some(&ParamValue::Bool(true)));
        assert_eq!(custom.get("coupon"), Some(&ParamValue::from("SUMMER")));
    }

    #[test]
    fn test_decimal_value_flag() {
        let args = parse(&["-a", "PURCHASE", "--value", "99.5"]);
        let body = serde_json::to_value(args.params()).unwrap();
        assert_eq!(body["value"], 99.5);

        let bad = TestCli::try_parse_from(["tac", "-a", "PURCHASE", "--value", "ten"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_minimal_flags_leave_optionals_unset() {
        let args = parse(&["-a", "REGISTER", "--query", "gdt_vid=x"]);
        let params = args.params();
        assert_eq!(params, ConversionParams::new(ActionType::REGISTER));
        assert!(args.page.source().is_some());
    }

    #[test]
    fn test_page_url_conflicts_with_query() {
        let result = TestCli::try_parse_from([
            "tac",
            "-a",
            "PURCHASE",
            "--page-url",
            "https://shop.example/?gdt_vid=x",
            "--query",
            "gdt_vid=y",
        ]);
        assert!(result.is_err());
    }
}
