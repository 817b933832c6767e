//! Conversion action type.

use core::fmt;
use std::borrow::Cow;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

/// A conversion action tag (e.g. `PURCHASE`).
///
/// The attribution API recommends a handful of values, exposed as associated
/// constants, but the tag is free-form: any string is sent through unchanged.
///
/// ## Examples
///
/// ```
/// use tencent_ads_conversion_core::ActionType;
///
/// assert_eq!(ActionType::PURCHASE.as_str(), "PURCHASE");
///
/// let custom: ActionType = "ADD_TO_CART".parse().unwrap();
/// assert_eq!(custom.as_str(), "ADD_TO_CART");
/// assert!(!custom.is_recommended());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionType(Cow<'static, str>);

impl ActionType {
    /// A completed purchase.
    pub const PURCHASE: Self = Self(Cow::Borrowed("PURCHASE"));
    /// A completed order.
    pub const COMPLETE_ORDER: Self = Self(Cow::Borrowed("COMPLETE_ORDER"));
    /// A user registration.
    pub const REGISTER: Self = Self(Cow::Borrowed("REGISTER"));

    /// The recommended action types, in documentation order.
    pub const RECOMMENDED: [Self; 3] = [Self::PURCHASE, Self::COMPLETE_ORDER, Self::REGISTER];

    /// Create an action type from any tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the tag is one of the platform's recommended values.
    #[must_use]
    pub fn is_recommended(&self) -> bool {
        Self::RECOMMENDED.iter().any(|known| known == self)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ActionType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ActionType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ActionType {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}

impl AsRef<str> for ActionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recommended_constants() {
        assert_eq!(ActionType::PURCHASE.as_str(), "PURCHASE");
        assert_eq!(ActionType::COMPLETE_ORDER.as_str(), "COMPLETE_ORDER");
        assert_eq!(ActionType::REGISTER.as_str(), "REGISTER");
    }

    #[test]
    fn test_owned_equals_borrowed() {
        assert_eq!(ActionType::new("PURCHASE"), ActionType::PURCHASE);
        assert!(ActionType::from("REGISTER").is_recommended());
    }

    #[test]
    fn test_free_form_tag_accepted() {
        let tag: ActionType = "VIEW_CONTENT".parse().unwrap();
        assert_eq!(tag.to_string(), "VIEW_CONTENT");
        assert!(!tag.is_recommended());
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let json = serde_json::to_string(&ActionType::COMPLETE_ORDER).unwrap();
        assert_eq!(json, "\"COMPLETE_ORDER\"");

        let parsed: ActionType = serde_json::from_str("\"custom\"").unwrap();
        assert_eq!(parsed.as_str(), "custom");
    }
}
