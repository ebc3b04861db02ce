use nanoserve::http::response::{Body, Response, ResponseBuilder, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::MovedPermanently.reason_phrase(), "Moved Permanently");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
    assert_eq!(StatusCode::NotImplemented.reason_phrase(), "Not Implemented");
}

#[test]
fn test_status_line_display() {
    assert_eq!(StatusCode::Ok.to_string(), "200 OK");
    assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .mime_type("text/plain")
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.mime_type.as_deref(), Some("text/plain"));
    assert!(matches!(&response.body, Body::Bytes(b) if &b[..] == b"Hello, World!"));
}

#[test]
fn test_response_builder_keeps_header_order() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-First", "1")
        .header("Cache-Control", "no-cache")
        .header("X-Last", "3")
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(names, vec!["X-First", "Cache-Control", "X-Last"]);
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert!(response.body.is_empty());
    assert!(response.mime_type.is_none());
    assert!(response.headers.is_empty());
}

#[test]
fn test_response_add_header_and_lookup() {
    let mut response = Response::new(StatusCode::Ok, None, Body::Empty);
    response.add_header("X-Custom", "value");

    assert_eq!(response.header("x-custom"), Some("value"));
    assert_eq!(response.header("X-Other"), None);
}

#[test]
fn test_response_redirect_helper() {
    let response = Response::redirect("/docs/");

    assert_eq!(response.status, StatusCode::MovedPermanently);
    assert_eq!(response.header("Location"), Some("/docs/"));
    assert_eq!(response.mime_type.as_deref(), Some("text/html"));
    assert!(!response.body.is_empty());
}

#[test]
fn test_response_redirect_escapes_html_body() {
    let response = Response::redirect("/x\"><script>/");

    assert_eq!(response.header("Location"), Some("/x\"><script>/"));
    let Body::Bytes(body) = response.body else {
        panic!("expected an in-memory body");
    };
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("href=\"/x&quot;&gt;&lt;script&gt;/\""));
    assert!(!body.contains("<script>"));
}

#[test]
fn test_response_error_helper() {
    let response = Response::error(StatusCode::NotFound, "gone");

    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.mime_type.as_deref(), Some("text/plain"));
}
