//! Conversion reporting errors.

use thiserror::Error;

/// Errors that can occur when reporting a conversion.
///
/// Credential and configuration errors are raised before any network call.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No access token was configured.
    #[error("Access token is required")]
    MissingAccessToken,

    /// Neither a callback token nor a complete click-id triple is available.
    #[error("Either callback or clickId with accountId and actionSetId is required")]
    NoTrackingMethod,

    /// The API answered with a non-success HTTP status.
    #[error("Failed to report conversion: HTTP error! status: {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },

    /// The request could not be sent or the connection failed.
    #[error("Failed to report conversion: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("Failed to report conversion: {0}")]
    Decode(#[source] reqwest::Error),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ConversionError {
    /// Whether this is a missing-credential error.
    #[must_use]
    pub const fn is_credential(&self) -> bool {
        matches!(self, Self::MissingAccessToken)
    }

    /// Whether this is a missing-tracking-method error.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::NoTrackingMethod)
    }

    /// The HTTP status for transport errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}
