//! Identity and geo headers sent with every catalog request.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ScraperError;

/// Town name the storefront prices against.
pub const GEO_TOWN_HEADER: &str = "bethowen_geo_town";
/// Region id matching [`GEO_TOWN_HEADER`].
pub const GEO_TOWN_ID_HEADER: &str = "bethowen_geo_town_id";

/// Unreserved characters plus `/` stay literal; everything else is escaped.
/// Header values must be visible ASCII, and town names are usually Cyrillic.
const TOWN_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes a town name for use in [`GEO_TOWN_HEADER`].
#[must_use]
pub fn encode_town(town: &str) -> String {
    utf8_percent_encode(town, TOWN_ENCODE_SET).to_string()
}

/// Builds the default header map for the HTTP client.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidHeader`] if `region` contains characters
/// that are not allowed in a header value.
pub fn geo_headers(town: &str, region: &str) -> Result<HeaderMap, ScraperError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(GEO_TOWN_HEADER),
        header_value(GEO_TOWN_HEADER, &encode_town(town))?,
    );
    headers.insert(
        HeaderName::from_static(GEO_TOWN_ID_HEADER),
        header_value(GEO_TOWN_ID_HEADER, region)?,
    );
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ScraperError> {
    HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
        name: name.to_owned(),
        reason: e.to_string(),
    })
}
