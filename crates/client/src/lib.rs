//! Tencent Ads conversion reporting.
//!
//! This crate provides:
//! - [`ConversionReporter`] for validating, shaping and sending conversion reports
//! - [`ReporterConfig`] and [`Endpoints`] for credentials and API targets
//! - [`ConversionError`] describing every way a report can fail
//!
//! # Flow
//!
//! 1. The reporter is built with a config and an [`IdentitySource`]; the
//!    landing page's `__CALLBACK__` / `gdt_vid` parameters are read once
//! 2. [`ConversionReporter::report_conversion`] validates the config
//! 3. The request is shaped for the callback or click-id endpoint
//! 4. A single POST is made and the platform's JSON response returned as-is
//!
//! # Example
//!
//! ```no_run
//! use secrecy::SecretString;
//! use tencent_ads_conversion::{
//!     ActionType, ConversionParams, ConversionReporter, PageQuery, ReporterConfig,
//! };
//!
//! # async fn run() -> Result<(), tencent_ads_conversion::ConversionError> {
//! let config = ReporterConfig {
//!     access_token: Some(SecretString::from("your_token")),
//!     ..ReporterConfig::default()
//! };
//! let page = PageQuery::new("?__CALLBACK__=tok%2525201");
//! let reporter = ConversionReporter::new(config, &page)?;
//!
//! let response = reporter
//!     .report_conversion(
//!         &ConversionParams::new(ActionType::PURCHASE)
//!             .with_value(10000)
//!             .with_quantity(1),
//!     )
//!     .await?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
mod error;
mod reporter;
mod request;

pub use config::{ConfigError, Endpoints, ReporterConfig};
pub use error::ConversionError;
pub use reporter::ConversionReporter;
pub use request::{Attribution, ConversionRequest, RequestBody};

pub use tencent_ads_conversion_core::{
    ActionType, ConversionParams, ConversionResponse, ExtractedIdentity, IdentitySource, NoPage,
    PageQuery, ParamValue, TrackingMethod, TrackingStatus,
};
