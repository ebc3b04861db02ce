//! Percent-encoding for URIs, query strings and form bodies, plus the HTML
//! escaping used wherever a path ends up in generated markup.
//!
//! Decoding is strict: a `%` that is not followed by two hex digits is an
//! error, which the connection turns into `400 Bad Request`.

use thiserror::Error;
use url::form_urlencoded;

use crate::http::request::Params;

/// A malformed `%XX` escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input ended before two hex digits followed a `%`.
    #[error("truncated escape at byte {0}")]
    Truncated(usize),
    /// A `%` was followed by something other than two hex digits.
    #[error("invalid escape `%{1}` at byte {0}")]
    InvalidHex(usize, String),
}

/// Decodes `+` to a space and `%XX` to the byte it names.
///
/// When the decoded bytes are valid UTF-8 they are returned as such;
/// otherwise every byte maps to the character with the same code point.
///
/// # Example
///
/// ```
/// # use nanoserve::http::codec::decode;
/// assert_eq!(decode("a+b%20c").unwrap(), "a b c");
/// assert!(decode("50%").is_err());
/// ```
pub fn decode(input: &str) -> Result<String, DecodeError> {
    let src = input.as_bytes();
    let mut out = Vec::with_capacity(src.len());
    let mut i = 0;

    while i < src.len() {
        match src[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = src.get(i + 1..i + 3).ok_or(DecodeError::Truncated(i))?;
                match (hex_value(hex[0]), hex_value(hex[1])) {
                    (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                    _ => {
                        return Err(DecodeError::InvalidHex(
                            i,
                            String::from_utf8_lossy(hex).into_owned(),
                        ));
                    }
                }
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    Ok(match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    })
}

/// Decodes `k1=v1&k2=v2` into `params`.
///
/// Tokens without a `=` are skipped. Keys are trimmed before decoding and a
/// repeated key keeps its first position but takes the last value.
pub fn decode_params(input: &str, params: &mut Params) -> Result<(), DecodeError> {
    for pair in input.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        params.insert(decode(key.trim())?, decode(value)?);
    }
    Ok(())
}

/// Encodes each `/`-separated segment of `uri`, leaving the slashes alone.
pub fn encode_uri(uri: &str) -> String {
    uri.split('/')
        .map(|segment| form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
