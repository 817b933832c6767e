//! Shaped conversion requests.

use serde::Serialize;
use tencent_ads_conversion_core::{ConversionParams, TrackingMethod};
use url::Url;

/// A request ready to be sent: target endpoint plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Endpoint chosen for the attribution method.
    pub url: Url,
    /// JSON body.
    pub body: RequestBody,
}

/// Request body: the caller's parameters followed by the attribution fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    #[serde(flatten)]
    pub params: ConversionParams,
    #[serde(flatten)]
    pub attribution: Attribution,
}

/// Identifier fields merged into the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Attribution {
    /// Report keyed by the decoded callback token.
    Callback { callback: String },
    /// Report keyed by click id, account and action set.
    ClickId {
        account_id: String,
        user_action_set_id: String,
        click_id: String,
    },
}

impl Attribution {
    /// The tracking method this attribution corresponds to.
    #[must_use]
    pub const fn method(&self) -> TrackingMethod {
        match self {
            Self::Callback { .. } => TrackingMethod::Callback,
            Self::ClickId { .. } => TrackingMethod::ClickId,
        }
    }
}
