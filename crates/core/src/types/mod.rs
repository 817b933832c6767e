//! Core types for Tencent Ads conversion reporting.
//!
//! This module provides typed wrappers for the attribution API's domain concepts.

pub mod action;
pub mod identity;
pub mod params;
pub mod response;
pub mod tracking;

pub use action::ActionType;
pub use identity::{
    CALLBACK_PARAM, CLICK_ID_PARAM, DecodeError, ExtractedIdentity, IdentitySource, NoPage,
    PageQuery, decode_component, extract_callback,
};
pub use params::{ConversionParams, ParamValue};
pub use response::ConversionResponse;
pub use tracking::{TrackingMethod, TrackingStatus};
