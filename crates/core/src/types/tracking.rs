//! Tracking method resolution and status snapshots.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::identity::ExtractedIdentity;

/// Which attribution identifier drives a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TrackingMethod {
    /// The double-encoded `__CALLBACK__` token.
    Callback,
    /// The raw `gdt_vid` click id.
    ClickId,
    /// No identifier found.
    #[default]
    None,
}

impl TrackingMethod {
    /// Resolve the method for an identity. A callback always wins over a click id.
    #[must_use]
    pub fn resolve(identity: &ExtractedIdentity) -> Self {
        if identity.has_callback() {
            Self::Callback
        } else if identity.has_click_id() {
            Self::ClickId
        } else {
            Self::None
        }
    }

    /// Returns the label used on the wire and in status output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::ClickId => "clickId",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TrackingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of the identity a reporter holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatus {
    pub has_callback: bool,
    pub has_click_id: bool,
    pub tracking_method: TrackingMethod,
    /// Decoded callback token; `None` outside a page context.
    pub callback: Option<String>,
    /// Raw click id; `None` outside a page context.
    pub click_id: Option<String>,
}

impl From<&ExtractedIdentity> for TrackingStatus {
    fn from(identity: &ExtractedIdentity) -> Self {
        Self {
            has_callback: identity.has_callback(),
            has_click_id: identity.has_click_id(),
            tracking_method: TrackingMethod::resolve(identity),
            callback: identity.callback.clone(),
            click_id: identity.click_id.clone(),
        }
    }
}
