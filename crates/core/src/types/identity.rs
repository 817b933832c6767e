//! Attribution identity extraction.
//!
//! The ad platform redirects users to the landing page with one of two
//! identifiers in the query string:
//!
//! - `__CALLBACK__` - a reporting token, percent-encoded twice by the platform
//! - `gdt_vid` - a raw click id
//!
//! Where the page URL comes from is abstracted behind [`IdentitySource`], so a
//! reporter can be built from a [`url::Url`], a bare query string, or with
//! [`NoPage`] when there is no page at all.
//!
//! Query strings are parsed with `application/x-www-form-urlencoded` rules:
//! the first occurrence of a name wins, `+` decodes to a space and one layer
//! of percent-encoding is removed by the parser itself.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::{Url, form_urlencoded};

/// Query parameter carrying the double-encoded callback token.
pub const CALLBACK_PARAM: &str = "__CALLBACK__";

/// Query parameter carrying the raw click id.
pub const CLICK_ID_PARAM: &str = "gdt_vid";

/// Errors from strict percent-decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A `%` was not followed by two hex digits.
    #[error("malformed percent escape at byte {position}")]
    MalformedEscape {
        /// Byte offset of the offending `%`.
        position: usize,
    },
    /// The decoded bytes are not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Something that can supply the landing page's query string.
///
/// Returning `None` means there is no page context (e.g. a server process).
/// A page without a query string returns `Some("")`.
pub trait IdentitySource {
    /// The raw query component, without requiring a leading `?`.
    fn page_query(&self) -> Option<Cow<'_, str>>;
}

impl IdentitySource for Url {
    fn page_query(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.query().unwrap_or_default()))
    }
}

impl<S: IdentitySource> IdentitySource for Option<S> {
    fn page_query(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(S::page_query)
    }
}

impl<S: IdentitySource + ?Sized> IdentitySource for &S {
    fn page_query(&self) -> Option<Cow<'_, str>> {
        (**self).page_query()
    }
}

/// A raw query string, with or without the leading `?`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageQuery(String);

impl PageQuery {
    /// Wrap a query string such as `?gdt_vid=abc` or `gdt_vid=abc`.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    /// Returns the query without its leading `?`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.strip_prefix('?').unwrap_or(&self.0)
    }
}

impl IdentitySource for PageQuery {
    fn page_query(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

/// No page context; both identifiers stay unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoPage;

impl IdentitySource for NoPage {
    fn page_query(&self) -> Option<Cow<'_, str>> {
        None
    }
}

/// Identifiers read from the landing page.
///
/// Both fields are `None` when there was no page context, and `Some` (possibly
/// empty) otherwise. Downstream, `None` and `Some("")` behave identically.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedIdentity {
    /// Decoded callback token.
    pub callback: Option<String>,
    /// Raw click id.
    pub click_id: Option<String>,
}

impl ExtractedIdentity {
    /// Extract identifiers from a source. Never fails.
    pub fn from_source(source: &(impl IdentitySource + ?Sized)) -> Self {
        source
            .page_query()
            .map_or_else(Self::default, |query| Self::from_query(&query))
    }

    /// Extract identifiers from a raw query string (leading `?` tolerated).
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        Self {
            callback: Some(extract_callback(
                first_value(query, CALLBACK_PARAM).as_deref(),
            )),
            click_id: Some(first_value(query, CLICK_ID_PARAM).unwrap_or_default()),
        }
    }

    /// Whether a non-empty callback token is present.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Whether a non-empty click id is present.
    #[must_use]
    pub fn has_click_id(&self) -> bool {
        self.click_id.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Callback token, empty when absent.
    #[must_use]
    pub fn callback(&self) -> &str {
        self.callback.as_deref().unwrap_or_default()
    }

    /// Click id, empty when absent.
    #[must_use]
    pub fn click_id(&self) -> &str {
        self.click_id.as_deref().unwrap_or_default()
    }
}

/// Undo the platform's double encoding of a callback token.
///
/// On any decoding failure the input is returned unchanged.
#[must_use]
pub fn extract_callback(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => String::new(),
        Some(raw) => decode_component(raw)
            .and_then(|once| decode_component(&once))
            .unwrap_or_else(|_| raw.to_owned()),
    }
}

/// Percent-decode one layer, rejecting malformed escapes and non-UTF-8 output.
///
/// Unlike form decoding, `+` is left as-is.
///
/// # Errors
///
/// Returns [`DecodeError::MalformedEscape`] for a `%` that is not followed by
/// two hex digits, and [`DecodeError::InvalidUtf8`] if the result is not UTF-8.
pub fn decode_component(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    for (position, _) in input.match_indices('%') {
        let is_hex = |offset: usize| {
            bytes
                .get(position + offset)
                .is_some_and(u8::is_ascii_hexdigit)
        };
        if !(is_hex(1) && is_hex(2)) {
            return Err(DecodeError::MalformedEscape { position });
        }
    }

    urlencoding::decode(input)
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

fn first_value(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn double_encode(value: &str) -> String {
        urlencoding::encode(&urlencoding::encode(value)).into_owned()
    }

    #[test]
    fn test_double_encoded_callback_round_trip() {
        let original = "tok 123/α&b=c";
        let url = Url::parse(&format!(
            "https://shop.example/landing?{CALLBACK_PARAM}={}",
            double_encode(original)
        ))
        .unwrap();

        let identity = ExtractedIdentity::from_source(&url);
        assert_eq!(identity.callback(), original);
        assert_eq!(identity.click_id.as_deref(), Some(""));
    }

    #[test]
    fn test_click_id_copied_verbatim() {
        let identity = ExtractedIdentity::from_source(&PageQuery::new("?gdt_vid=click-9"));
        assert_eq!(identity.click_id(), "click-9");
        assert_eq!(identity.callback.as_deref(), Some(""));
        assert!(!identity.has_callback());
        assert!(identity.has_click_id());
    }

    #[test]
    fn test_click_id_is_not_decoded_twice() {
        let identity = ExtractedIdentity::from_query("gdt_vid=a%2525b");
        assert_eq!(identity.click_id(), "a%25b");
    }

    #[test]
    fn test_both_identifiers_present() {
        let query = format!("gdt_vid=click-9&{CALLBACK_PARAM}={}", double_encode("tok"));
        let identity = ExtractedIdentity::from_query(&query);
        assert_eq!(identity.callback(), "tok");
        assert_eq!(identity.click_id(), "click-9");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let identity = ExtractedIdentity::from_query("gdt_vid=first&gdt_vid=second");
        assert_eq!(identity.click_id(), "first");
    }

    #[test]
    fn test_malformed_callback_falls_back_to_raw() {
        // Parser strips one layer: "%25zz" -> "%zz", which cannot be decoded.
        let identity = ExtractedIdentity::from_query("__CALLBACK__=%25zz");
        assert_eq!(identity.callback(), "%zz");
    }

    #[test]
    fn test_truncated_escape_falls_back_to_raw() {
        let identity = ExtractedIdentity::from_query("__CALLBACK__=%25E0%25A4%25A");
        assert_eq!(identity.callback(), "%E0%A4%A");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_raw() {
        let identity = ExtractedIdentity::from_query("__CALLBACK__=%25FF");
        assert_eq!(identity.callback(), "%FF");
    }

    #[test]
    fn test_second_layer_failure_falls_back_to_raw() {
        // First decode yields "%zz", second decode fails.
        let identity = ExtractedIdentity::from_query("__CALLBACK__=%2525zz");
        assert_eq!(identity.callback(), "%25zz");
    }

    #[test]
    fn test_empty_callback_parameter() {
        let identity = ExtractedIdentity::from_query("__CALLBACK__=&gdt_vid=");
        assert_eq!(identity.callback.as_deref(), Some(""));
        assert_eq!(identity.click_id.as_deref(), Some(""));
    }

    #[test]
    fn test_no_page_leaves_identity_unset() {
        let identity = ExtractedIdentity::from_source(&NoPage);
        assert_eq!(identity, ExtractedIdentity::default());
        assert!(identity.callback.is_none());
        assert!(identity.click_id.is_none());
        assert_eq!(identity.callback(), "");
    }

    #[test]
    fn test_url_without_query_is_a_page() {
        let url = Url::parse("https://shop.example/landing").unwrap();
        let identity = ExtractedIdentity::from_source(&url);
        assert_eq!(identity.callback.as_deref(), Some(""));
        assert_eq!(identity.click_id.as_deref(), Some(""));
    }

    #[test]
    fn test_optional_source() {
        let missing: Option<PageQuery> = None;
        assert_eq!(
            ExtractedIdentity::from_source(&missing),
            ExtractedIdentity::default()
        );

        let present = Some(PageQuery::new("gdt_vid=x"));
        assert_eq!(ExtractedIdentity::from_source(&present).click_id(), "x");
    }

    #[test]
    fn test_plus_decodes_to_space_in_click_id() {
        let identity = ExtractedIdentity::from_query("gdt_vid=a+b");
        assert_eq!(identity.click_id(), "a b");
    }

    #[test]
    fn test_decode_component_errors() {
        assert_eq!(
            decode_component("ab%2"),
            Err(DecodeError::MalformedEscape { position: 2 })
        );
        assert_eq!(decode_component("%C3"), Err(DecodeError::InvalidUtf8));
        assert_eq!(decode_component("a+b%20c").unwrap(), "a+b c");
    }

    #[test]
    fn test_extract_callback_absent() {
        assert_eq!(extract_callback(None), "");
        assert_eq!(extract_callback(Some("")), "");
    }
}
