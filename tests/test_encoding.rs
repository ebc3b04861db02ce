//! Output encoding is process-wide, so everything touching it lives in one
//! test binary and one test.

use nanoserve::http::response::{
    encode_text, output_encoding, set_output_encoding, Body, Response, StatusCode,
};

fn body_bytes(response: &Response) -> Vec<u8> {
    match &response.body {
        Body::Bytes(b) => b.to_vec(),
        Body::Empty => Vec::new(),
        Body::File(_) => panic!("unexpected file body"),
    }
}

#[test]
fn test_output_encoding_lifecycle() {
    set_output_encoding(None);
    assert_eq!(output_encoding(), None);
    assert_eq!(&encode_text("café")[..], "café".as_bytes());

    set_output_encoding(Some("iso-8859-1"));
    assert_eq!(output_encoding().as_deref(), Some("iso-8859-1"));
    let response = Response::text(StatusCode::Ok, "text/plain", "café");
    assert_eq!(body_bytes(&response), b"caf\xe9".to_vec());

    // Unknown encodings silently produce an empty body.
    set_output_encoding(Some("no-such-charset"));
    let response = Response::text(StatusCode::Ok, "text/plain", "hello");
    assert!(body_bytes(&response).is_empty());
    assert_eq!(response.status, StatusCode::Ok);

    set_output_encoding(None);
    assert_eq!(&encode_text("hello")[..], b"hello");
}
