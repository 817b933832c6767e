//! Conversion reporter.
//!
//! Holds the configuration and the identity read from the landing page, and
//! turns each [`ConversionParams`] into one POST against the attribution API.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use tencent_ads_conversion_core::{
    ConversionParams, ConversionResponse, ExtractedIdentity, IdentitySource, TrackingMethod,
    TrackingStatus,
};
use tracing::{debug, instrument};

use crate::config::ReporterConfig;
use crate::error::ConversionError;
use crate::request::{Attribution, ConversionRequest, RequestBody};

/// Header carrying the access token.
const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Conversion reporter for the Tencent Ads attribution API.
///
/// The identity is extracted once at construction and never changes. Clones
/// share the same configuration, identity and HTTP connection pool, and
/// concurrent reports are fully independent.
#[derive(Clone)]
pub struct ConversionReporter {
    inner: Arc<ReporterInner>,
}

struct ReporterInner {
    client: reqwest::Client,
    config: ReporterConfig,
    identity: ExtractedIdentity,
}

impl std::fmt::Debug for ConversionReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionReporter")
            .field("config", &self.inner.config)
            .field("identity", &self.inner.identity)
            .finish_non_exhaustive()
    }
}

impl ConversionReporter {
    /// Create a reporter, reading the attribution identity from `source`.
    ///
    /// No configuration is validated here; see [`Self::validate_config`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(
        config: ReporterConfig,
        source: &(impl IdentitySource + ?Sized),
    ) -> Result<Self, ConversionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ConversionError::Client)?;

        Ok(Self::with_client(client, config, source))
    }

    /// Create a reporter that sends through an existing HTTP client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        config: ReporterConfig,
        source: &(impl IdentitySource + ?Sized),
    ) -> Self {
        let identity = ExtractedIdentity::from_source(source);

        debug!(
            tracking_method = %TrackingMethod::resolve(&identity),
            "Conversion reporter initialized"
        );

        Self {
            inner: Arc::new(ReporterInner {
                client,
                config,
                identity,
            }),
        }
    }

    /// The reporter's configuration.
    #[must_use]
    pub fn config(&self) -> &ReporterConfig {
        &self.inner.config
    }

    /// The identity extracted at construction.
    #[must_use]
    pub fn identity(&self) -> &ExtractedIdentity {
        &self.inner.identity
    }

    /// Snapshot of the held identity. Performs no I/O.
    #[must_use]
    pub fn tracking_status(&self) -> TrackingStatus {
        TrackingStatus::from(&self.inner.identity)
    }

    /// Check that a report could be sent.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingAccessToken`] without a token, and
    /// [`ConversionError::NoTrackingMethod`] when neither a callback token nor
    /// a click id with account and action set ids is available.
    pub fn validate_config(&self) -> Result<(), ConversionError> {
        if self.inner.config.access_token().is_none() {
            return Err(ConversionError::MissingAccessToken);
        }

        self.attribution().map(|_| ())
    }

    /// Shape the request for `params`: pick the endpoint and merge in the
    /// attribution fields. A callback token always takes precedence.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NoTrackingMethod`] when no attribution is available.
    pub fn build_request(
        &self,
        params: &ConversionParams,
    ) -> Result<ConversionRequest, ConversionError> {
        let attribution = self.attribution()?;
        let endpoints = &self.inner.config.endpoints;
        let url = match attribution {
            Attribution::Callback { .. } => endpoints.callback.clone(),
            Attribution::ClickId { .. } => endpoints.click_id.clone(),
        };

        Ok(ConversionRequest {
            url,
            body: RequestBody {
                params: params.clone(),
                attribution,
            },
        })
    }

    /// Send a shaped request and return the platform's response as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Http`] for a non-success status (the body is
    /// not read), [`ConversionError::Request`] if the request could not be
    /// completed and [`ConversionError::Decode`] if the body is not JSON.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn send_request(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, ConversionError> {
        let token = self
            .inner
            .config
            .access_token()
            .ok_or(ConversionError::MissingAccessToken)?;

        debug!(
            tracking_method = %request.body.attribution.method(),
            "Sending conversion report"
        );

        let response = self
            .inner
            .client
            .post(request.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_TOKEN_HEADER, token)
            .json(&request.body)
            .send()
            .await
            .map_err(ConversionError::Request)?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Conversion report rejected");
            return Err(ConversionError::Http {
                status: status.as_u16(),
            });
        }

        let result: ConversionResponse = response
            .json()
            .await
            .map_err(ConversionError::Decode)?;

        debug!(
            code = result.code,
            message = %result.message,
            "Conversion report accepted"
        );

        Ok(result)
    }

    /// Report a conversion: validate, shape, then send.
    ///
    /// # Errors
    ///
    /// Returns the first failure from validation, shaping or transport.
    /// Nothing is retried.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tencent_ads_conversion::{ActionType, ConversionParams, ConversionReporter};
    /// # async fn run(reporter: ConversionReporter) -> Result<(), tencent_ads_conversion::ConversionError> {
    /// let params = ConversionParams::new(ActionType::PURCHASE)
    ///     .with_value(10000)
    ///     .with_quantity(1);
    /// let response = reporter.report_conversion(&params).await?;
    /// println!("{} {}", response.code, response.message);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, params), fields(action_type = %params.action_type))]
    pub async fn report_conversion(
        &self,
        params: &ConversionParams,
    ) -> Result<ConversionResponse, ConversionError> {
        self.validate_config()?;

        let request = self.build_request(params)?;

        self.send_request(&request).await
    }

    /// Resolve the attribution fields for the next report.
    fn attribution(&self) -> Result<Attribution, ConversionError> {
        let identity = &self.inner.identity;
        if identity.has_callback() {
            return Ok(Attribution::Callback {
                callback: identity.callback().to_owned(),
            });
        }

        let config = &self.inner.config;
        match (config.account_id(), config.action_set_id()) {
            (Some(account_id), Some(action_set_id)) if identity.has_click_id() => {
                Ok(Attribution::ClickId {
                    account_id: account_id.to_owned(),
                    user_action_set_id: action_set_id.to_owned(),
                    click_id: identity.click_id().to_owned(),
                })
            }
            _ => Err(ConversionError::NoTrackingMethod),
        }
    }
}
