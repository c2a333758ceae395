use encoding_rs::Encoding;
use tracing::{debug, warn};

/// Strictly decode `bytes` with `encoding`; malformed input yields `None`.
/// A leading byte-order mark is dropped.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let text = encoding.decode_without_bom_handling_and_without_replacement(bytes)?;
    Some(text.strip_prefix('\u{feff}').unwrap_or(text.as_ref()).to_string())
}

/// Try `primary`, then `fallback`. Returns the text and the encoding that worked.
pub fn decode_with_fallback(
    bytes: &[u8],
    primary: &'static Encoding,
    fallback: &'static Encoding,
) -> Option<(String, &'static Encoding)> {
    if let Some(text) = decode_strict(bytes, primary) {
        debug!(encoding = primary.name(), "decoded with primary encoding");
        return Some((text, primary));
    }
    warn!(
        primary = primary.name(),
        fallback = fallback.name(),
        "primary decode failed, retrying with fallback"
    );
    decode_strict(bytes, fallback).map(|text| (text, fallback))
}
