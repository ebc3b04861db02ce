use nanoserve::http::request::{BuildError, Method, Params, Request, RequestBuilder};
use std::collections::HashMap;

fn request_with_headers(headers: HashMap<String, String>) -> Request {
    Request {
        method: Method::POST,
        uri: "/api".to_string(),
        params: Params::new(),
        headers,
        body: Default::default(),
    }
}

#[test]
fn test_request_header_retrieval_ignores_case() {
    let mut headers = HashMap::new();
    headers.insert("host".to_string(), "example.com".to_string());
    headers.insert("content-type".to_string(), "application/json".to_string());

    let req = request_with_headers(headers);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_content_length_parsing() {
    let mut headers = HashMap::new();
    headers.insert("content-length".to_string(), "42".to_string());

    assert_eq!(request_with_headers(headers).content_length(), Some(42));
}

#[test]
fn test_request_content_length_missing() {
    assert_eq!(request_with_headers(HashMap::new()).content_length(), None);
}

#[test]
fn test_request_content_length_invalid() {
    let mut headers = HashMap::new();
    headers.insert("content-length".to_string(), "not-a-number".to_string());

    assert_eq!(request_with_headers(headers).content_length(), None);
}

#[test]
fn test_request_builder() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .uri("/search")
        .param("q", "rust")
        .header("User-Agent", "test")
        .build()
        .unwrap();

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.uri, "/search");
    assert_eq!(req.param("q"), Some("rust"));
    assert_eq!(req.headers.get("user-agent").unwrap(), "test");
}

#[test]
fn test_request_builder_requires_method_and_uri() {
    assert!(matches!(
        RequestBuilder::new().uri("/").build(),
        Err(BuildError::MissingMethod)
    ));
    assert!(matches!(
        RequestBuilder::new().method(Method::GET).build(),
        Err(BuildError::MissingUri)
    ));
    assert_eq!(BuildError::MissingUri.to_string(), "uri missing");
}

#[test]
fn test_method_round_trips_through_str() {
    for token in ["GET", "POST", "HEAD", "PUT", "DELETE", "PROPFIND"] {
        assert_eq!(Method::from(token).as_str(), token);
    }
    assert_eq!(Method::from("PROPFIND").to_string(), "PROPFIND");
}
