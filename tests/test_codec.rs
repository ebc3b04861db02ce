use nanoserve::http::codec::{decode, decode_params, encode_uri, DecodeError};
use nanoserve::http::request::Params;

#[test]
fn test_decode_plus_and_escapes() {
    assert_eq!(decode("a+b%20c").unwrap(), "a b c");
    assert_eq!(decode("%41%62%3d").unwrap(), "Ab=");
    assert_eq!(decode("plain").unwrap(), "plain");
    assert_eq!(decode("").unwrap(), "");
}

#[test]
fn test_decode_utf8_sequences() {
    assert_eq!(decode("caf%C3%A9").unwrap(), "café");
}

#[test]
fn test_decode_non_utf8_bytes_map_to_chars() {
    assert_eq!(decode("%E9t%E9").unwrap(), "\u{e9}t\u{e9}");
}

#[test]
fn test_decode_truncated_escape() {
    assert_eq!(decode("abc%4"), Err(DecodeError::Truncated(3)));
    assert_eq!(decode("%"), Err(DecodeError::Truncated(0)));
}

#[test]
fn test_decode_invalid_hex() {
    assert_eq!(decode("x%g1"), Err(DecodeError::InvalidHex(1, "g1".to_string())));
}

#[test]
fn test_decode_params() {
    let mut params = Params::new();
    decode_params("k1=v1&k2=a+b%20c& spaced =1", &mut params).unwrap();

    assert_eq!(params.get("k1").map(String::as_str), Some("v1"));
    assert_eq!(params.get("k2").map(String::as_str), Some("a b c"));
    assert_eq!(params.get("spaced").map(String::as_str), Some("1"));
    assert_eq!(params.len(), 3);
}

#[test]
fn test_decode_params_later_value_wins() {
    let mut params = Params::new();
    decode_params("a=1&b=2&a=3", &mut params).unwrap();

    let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
}

#[test]
fn test_decode_params_rejects_bad_escape() {
    let mut params = Params::new();
    assert!(decode_params("ok=1&bad=%zz", &mut params).is_err());
}

#[test]
fn test_encode_uri_keeps_slashes() {
    assert_eq!(encode_uri("/docs/my file.txt"), "/docs/my+file.txt");
    assert_eq!(encode_uri("/a&b/"), "/a%26b/");
    assert_eq!(decode(&encode_uri("/x y/z%")).unwrap(), "/x y/z%");
}
