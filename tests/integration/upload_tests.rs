//! Upload integration tests.
//!
//! Tests verify:
//! - Uploads are posted to the signed `/upload` URL
//! - Remote URLs go out as a form field, files and streams as multipart
//! - Service replies are surfaced as-is
//! - Garbage replies and unreachable services become error results

use std::io::{Cursor, Write};

use axum::http::StatusCode;

use vault8::upload::UploadConfig;
use vault8::{Client, UploadDispatcher, UploadPayload, UploadResult};

use super::test_utils::{
    unreachable_base_url, TestServer, CURRENT_TIME, PUBLIC_KEY, SECRET_KEY, UNTIL_TIME,
    UPLOAD_QUERY,
};

const SUCCESS_REPLY: &str = r#"{"response":"success","image_uid":"731f70564f9145d79282f8267c4495ee","image_name":"kitten.png"}"#;
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";

fn dispatcher(client: Client) -> UploadDispatcher {
    UploadDispatcher::new(client, &UploadConfig::default()).unwrap()
}

// =============================================================================
// Payloads
// =============================================================================

#[tokio::test]
async fn test_upload_remote_url() {
    let server = TestServer::start(StatusCode::OK, SUCCESS_REPLY).await;
    let uploader = dispatcher(server.client());

    let result = uploader
        .upload(
            UploadPayload::remote_url("https://example.com/kitten.png"),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    assert!(result.is_success());
    assert_eq!(result.image_uid(), Some("731f70564f9145d79282f8267c4495ee"));
    assert_eq!(result.field("image_name"), Some("kitten.png"));

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/upload");
    assert_eq!(request.query, UPLOAD_QUERY);
    assert!(request
        .content_type
        .starts_with("application/x-www-form-urlencoded"));
    assert_eq!(
        request.body_text(),
        "url=https%3A%2F%2Fexample.com%2Fkitten.png"
    );
}

#[tokio::test]
async fn test_upload_local_file() {
    let server = TestServer::start(StatusCode::OK, SUCCESS_REPLY).await;
    let uploader = dispatcher(server.client());

    let mut file = tempfile::Builder::new()
        .prefix("kitten")
        .suffix(".png")
        .tempfile()
        .unwrap();
    file.write_all(PNG_BYTES).unwrap();
    file.flush().unwrap();

    let file_name = file
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned();

    let result = uploader
        .upload(
            UploadPayload::local_file(file.path()),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;
    assert!(result.is_success());

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.query, UPLOAD_QUERY);
    assert!(request.content_type.starts_with("multipart/form-data"));

    let body = request.body_text();
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(&format!(r#"filename="{}""#, file_name)));
    assert!(body.contains("image/png"));
    assert!(body.contains("fake image data"));
}

#[tokio::test]
async fn test_upload_stream() {
    let server = TestServer::start(StatusCode::OK, SUCCESS_REPLY).await;
    let uploader = dispatcher(server.client());

    let payload = UploadPayload::stream("drawing.gif", Cursor::new(b"GIF89a pixels".to_vec()));
    let result = uploader.upload(payload, CURRENT_TIME, UNTIL_TIME).await;
    assert!(result.is_success());

    let requests = server.requests().await;
    let body = requests[0].body_text();
    assert!(body.contains(r#"filename="drawing.gif""#));
    assert!(body.contains("image/gif"));
    assert!(body.contains("GIF89a pixels"));
}

#[tokio::test]
async fn test_custom_upload_path_is_used() {
    let server = TestServer::start(StatusCode::OK, SUCCESS_REPLY).await;
    let uploader = dispatcher(server.client()).with_upload_path("/images/upload");

    let result = uploader
        .upload(
            UploadPayload::remote_url("https://example.com/a.jpg"),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    // Only `/upload` is routed, so the empty 404 body is normalized.
    assert_eq!(result, UploadResult::error());
    assert!(server.requests().await.is_empty());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_service_rejection_is_passed_through() {
    let reply = r#"{"response":"error","message":"Unsupported format"}"#;
    let server = TestServer::start(StatusCode::UNPROCESSABLE_ENTITY, reply).await;
    let uploader = dispatcher(server.client());

    let result = uploader
        .upload(
            UploadPayload::remote_url("https://example.com/file.txt"),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    assert!(!result.is_success());
    assert_eq!(result.field("response"), Some("error"));
    assert_eq!(result.field("message"), Some("Unsupported format"));
}

#[tokio::test]
async fn test_non_json_reply_is_normalized() {
    let server = TestServer::start(StatusCode::INTERNAL_SERVER_ERROR, "Server error").await;
    let uploader = dispatcher(server.client());

    let result = uploader
        .upload(
            UploadPayload::remote_url("https://example.com/kitten.png"),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    assert_eq!(result, UploadResult::error());
    assert_eq!(server.requests().await.len(), 1);
}

#[tokio::test]
async fn test_unreachable_service() {
    let client = Client::create(PUBLIC_KEY, SECRET_KEY, &unreachable_base_url()).unwrap();
    let uploader = dispatcher(client);

    let result = uploader
        .upload(
            UploadPayload::remote_url("https://example.com/kitten.png"),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    assert!(!result.is_success());
    assert_eq!(result.field("response"), Some("error"));
    assert!(result.field("message").is_some());
}

#[tokio::test]
async fn test_missing_file_is_reported_without_request() {
    let server = TestServer::start(StatusCode::OK, SUCCESS_REPLY).await;
    let uploader = dispatcher(server.client());
    let dir = tempfile::tempdir().unwrap();

    let result = uploader
        .upload(
            UploadPayload::local_file(dir.path().join("missing.png")),
            CURRENT_TIME,
            UNTIL_TIME,
        )
        .await;

    assert!(!result.is_success());
    assert!(result.field("message").unwrap().contains("missing.png"));
    assert!(server.requests().await.is_empty());
}
