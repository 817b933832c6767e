//! Caller-supplied conversion parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::action::ActionType;

/// Parameters for a single conversion report.
///
/// Serialized with the attribution API's camelCase keys. Unset optional
/// fields are left out of the request body entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionParams {
    /// Conversion action tag.
    pub action_type: ActionType,
    /// Conversion value. Integers and fractions are sent as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Number>,
    /// Item quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Number>,
    /// Advertiser-side identifier for the conversion (order number, user id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_id: Option<String>,
    /// Extra fields forwarded as-is under `customParams`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_params: Option<BTreeMap<String, ParamValue>>,
}

impl ConversionParams {
    /// Create parameters carrying only an action type.
    #[must_use]
    pub const fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            value: None,
            quantity: None,
            outer_id: None,
            custom_params: None,
        }
    }

    /// Set the conversion value.
    ///
    /// Fractional amounts go through [`Number::from_f64`].
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Number>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: impl Into<Number>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }

    /// Set the advertiser-side identifier.
    #[must_use]
    pub fn with_outer_id(mut self, outer_id: impl Into<String>) -> Self {
        self.outer_id = Some(outer_id.into());
        self
    }

    /// Add one custom parameter, replacing any previous value for `key`.
    #[must_use]
    pub fn with_custom_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        self.custom_params
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// A custom parameter value.
///
/// A closed set of JSON shapes: strings, numbers, booleans and nested maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(Number),
    String(String),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// Infer a value from a command-line literal.
    ///
    /// `true`/`false` become booleans, anything JSON accepts as a number
    /// becomes a number, and everything else stays a string.
    #[must_use]
    pub fn parse_cli(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => serde_json::from_str::<Number>(raw)
                .map_or_else(|_| Self::String(raw.to_owned()), Self::Number),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<BTreeMap<String, Self>> for ParamValue {
    fn from(value: BTreeMap<String, Self>) -> Self {
        Self::Map(value)
    }
}
