//! Tencent Ads Conversion Core - Shared types library.
//!
//! This crate provides the types used by every Tencent Ads conversion component:
//! - `tencent-ads-conversion` - The reporter that talks to the attribution API
//! - `tac-cli` - Command-line front end for status checks and manual reports
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no environment access. Identity extraction takes an injected
//! [`IdentitySource`] instead of reading a global page location.
//!
//! # Modules
//!
//! - [`types`] - Action types, conversion parameters, responses, tracking identity

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
