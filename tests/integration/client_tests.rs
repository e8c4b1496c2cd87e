//! Signing integration tests.
//!
//! Tests verify:
//! - Reference URLs and tokens are reproduced byte for byte
//! - Absent time bounds vanish from tokens and query strings
//! - Generated URLs verify against their own path and window
//! - Reserved and non-ASCII names are signed exactly as they are sent
//! - Clients can be shared across threads

use std::sync::Arc;
use std::thread;

use vault8::signing::{serialize, FilterArg};
use vault8::{
    Client, FilterGroup, HashAlgorithm, InputError, QueryEncoding, SegmentEncoding, TokenError,
    ValidityWindow, DEFAULT_FILE_NAME, DEFAULT_UPLOAD_PATH,
};

use super::test_utils::{reference_client, CURRENT_TIME, UNTIL_TIME, UPLOAD_QUERY};

const UID: &str = "731f70564f9145d79282f8267c4495ee";

/// Resource ids and file names that URL parsing would split or rewrite.
const AWKWARD_NAMES: [(&str, &str); 8] = [
    ("a?b", "john.jpg"),
    ("a#b", "john.jpg"),
    ("abc", "x?y.jpg"),
    ("abc", "x#y.jpg"),
    ("abc", "../x.jpg"),
    ("..", "x.jpg"),
    ("abc", "my photo.jpg"),
    ("abc", "caf\u{e9}.jpg"),
];

fn window() -> ValidityWindow {
    ValidityWindow::between(CURRENT_TIME, UNTIL_TIME)
}

// =============================================================================
// Reference Values
// =============================================================================

#[test]
fn test_upload_url_matches_reference() {
    let url = reference_client()
        .upload_url(DEFAULT_UPLOAD_PATH, CURRENT_TIME, UNTIL_TIME)
        .unwrap();
    assert_eq!(url, format!("http://lvh.me:3000/upload?{}", UPLOAD_QUERY));
}

#[test]
fn test_signed_image_urls_match_reference() {
    let client = reference_client();

    let url = client.image_url(UID, &[], "john.jpg", window()).unwrap();
    assert_eq!(
        url,
        "http://lvh.me:3000/731f70564f9145d79282f8267c4495ee/john.jpg?p=public&s=3d87dbc06452c086ce554ccec3452af69748cd8f&time=1799955192&until=1799958792"
    );

    let signed = client
        .signed_url("/afnanfl12331/image.jpg", ValidityWindow::unbounded())
        .unwrap();
    assert_eq!(
        signed,
        "http://lvh.me:3000/afnanfl12331/image.jpg?p=public&s=8f6dc24cb5d5125be035a9276e49887b32f72955"
    );
}

#[test]
fn test_filtered_paths_sign_like_reference() {
    let client = reference_client();
    let filters = vec![
        FilterGroup::single("grayscale", ""),
        FilterGroup::single("blur", "1"),
    ];

    let path = client.image_path(UID, &filters, "john.jpg").unwrap();
    assert_eq!(path, "/731f70564f9145d79282f8267c4495ee/grayscale,blur-1/john.jpg");
    assert_eq!(
        client.encode_token(&path, ValidityWindow::unbounded()),
        "211f94a1fa78307143ac40a1ac23f442f36f55b8"
    );
}

#[test]
fn test_encode_token_reference_values() {
    let client = reference_client();
    let path = "/image_uid/grayscale/name.jpeg";

    assert_eq!(
        client.encode_token(path, window()),
        "cadcb87ef4d88708f5de366b010b58d5b01574ad"
    );
    assert_eq!(
        client.encode_token(path, ValidityWindow::starting_at(CURRENT_TIME)),
        "36dbd3b870e661fd72e0e18e612e6eb4b51efae2"
    );
    assert_eq!(
        client.encode_token(path, ValidityWindow::until(UNTIL_TIME)),
        "ce72e88293f35d2f4b3ec7b5c357e59d8db8f173"
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_unsigned_image_url_has_no_query() {
    let url = reference_client()
        .image_url(UID, &[], DEFAULT_FILE_NAME, ValidityWindow::unbounded())
        .unwrap();
    assert_eq!(
        url,
        "http://lvh.me:3000/731f70564f9145d79282f8267c4495ee/image.jpg"
    );
}

#[test]
fn test_half_open_window_is_signed() {
    let url = reference_client()
        .image_url(UID, &[], "john.jpg", ValidityWindow::until(UNTIL_TIME))
        .unwrap();
    assert!(url.contains("?p=public&s="));
    assert!(url.ends_with("&until=1799958792"));
    assert!(!url.contains("time="));
}

#[test]
fn test_filter_order_changes_url() {
    let client = reference_client();
    let ab = vec![FilterGroup::single("a", 1), FilterGroup::single("b", 2)];
    let ba = vec![FilterGroup::single("b", 2), FilterGroup::single("a", 1)];

    assert_ne!(serialize(&ab), serialize(&ba));
    assert_ne!(
        client.image_url(UID, &ab, "x.jpg", window()).unwrap(),
        client.image_url(UID, &ba, "x.jpg", window()).unwrap()
    );
}

#[test]
fn test_composed_filters() {
    let filters = vec![
        FilterGroup::single("resize_fill", FilterArg::list([150, 140])),
        FilterGroup::single("grayscale", FilterArg::Flag),
        FilterGroup::single("watermark", vec!["logo20", "center", "l"]),
    ];
    assert_eq!(
        reference_client().merged_filters(&filters).as_deref(),
        Some("resize_fill-150-140,grayscale,watermark-logo20-center-l")
    );
}

#[test]
fn test_empty_resource_id_is_rejected() {
    assert_eq!(
        reference_client().image_url("", &[], "john.jpg", window()),
        Err(InputError::EmptyResourceId)
    );
}

#[test]
fn test_determinism_across_clients() {
    let a = reference_client();
    let b = reference_client();
    let filters = vec![FilterGroup::single("blur", 3)];

    assert_eq!(
        a.image_url(UID, &filters, "john.jpg", window()).unwrap(),
        b.image_url(UID, &filters, "john.jpg", window()).unwrap()
    );
}

#[test]
fn test_round_trip_through_url() {
    let client = reference_client();
    let filters = vec![FilterGroup::single("resize_fill", [150, 140])];

    for window in [
        window(),
        ValidityWindow::starting_at(CURRENT_TIME),
        ValidityWindow::until(UNTIL_TIME),
    ] {
        let url = client.image_url(UID, &filters, "john.jpg", window).unwrap();
        assert!(client.verify_url(&url).is_ok(), "did not verify: {}", url);
    }
}

#[test]
fn test_url_from_other_secret_fails_verification() {
    let other = Client::create("public", "not-private", "http://lvh.me:3000").unwrap();
    let url = other
        .upload_url(DEFAULT_UPLOAD_PATH, CURRENT_TIME, UNTIL_TIME)
        .unwrap();
    assert_eq!(reference_client().verify_url(&url), Err(TokenError::Mismatch));
}

#[test]
fn test_sha256_deployment() {
    let client = reference_client().with_hash_algorithm(HashAlgorithm::Sha256);
    let url = client
        .upload_url(DEFAULT_UPLOAD_PATH, CURRENT_TIME, UNTIL_TIME)
        .unwrap();
    assert_eq!(
        url,
        "http://lvh.me:3000/upload?p=public&s=b46cdd6f109a8ea869cbef0e42ab833367e107ad825db4039b64263f26036b2d&time=1799955192&until=1799958792"
    );
    assert!(client.verify_url(&url).is_ok());
    assert_eq!(reference_client().verify_url(&url), Err(TokenError::Mismatch));
}

#[test]
fn test_percent_encoded_query_values() {
    let client = Client::create("pub&key", "private", "http://lvh.me:3000")
        .unwrap()
        .with_query_encoding(QueryEncoding::PercentEncode);
    let url = client
        .signed_url("/upload", ValidityWindow::unbounded())
        .unwrap();
    assert!(url.starts_with("http://lvh.me:3000/upload?p=pub%26key&s="));
    assert!(client.verify_url(&url).is_ok());
}

// =============================================================================
// Reserved Characters
// =============================================================================

#[test]
fn test_verbatim_names_that_would_be_rewritten_are_rejected() {
    let client = reference_client();

    for (resource_id, file_name) in AWKWARD_NAMES {
        for window in [window(), ValidityWindow::unbounded()] {
            let result = client.image_url(resource_id, &[], file_name, window);
            assert!(
                matches!(result, Err(InputError::InvalidPath { .. })),
                "{}/{} gave {:?}",
                resource_id,
                file_name,
                result
            );
        }
    }
}

#[test]
fn test_verbatim_names_round_trip_when_url_safe() {
    let client = reference_client();
    let filters = vec![FilterGroup::single("blur", 2)];

    let url = client
        .image_url("a/b", &filters, "photo_1-final.jpg", window())
        .unwrap();
    assert!(url.starts_with("http://lvh.me:3000/a/b/blur-2/photo_1-final.jpg?p=public&s="));
    assert!(client.verify_url(&url).is_ok());
}

#[test]
fn test_percent_encoded_names_round_trip() {
    let client = reference_client().with_segment_encoding(SegmentEncoding::PercentEncode);
    let filters = vec![FilterGroup::single("resize_fill", [150, 140])];

    for (resource_id, file_name) in AWKWARD_NAMES {
        if resource_id == ".." {
            continue;
        }
        let path = client.image_path(resource_id, &filters, file_name).unwrap();
        let url = client
            .image_url(resource_id, &filters, file_name, window())
            .unwrap();

        assert!(
            url.starts_with(&format!("http://lvh.me:3000{}?p=public&s=", path)),
            "{} is not sent as {}",
            url,
            path
        );
        assert!(client.verify_url(&url).is_ok(), "did not verify: {}", url);
    }
}

#[test]
fn test_percent_encoded_unsigned_url_keeps_path() {
    let client = reference_client().with_segment_encoding(SegmentEncoding::PercentEncode);
    let url = client
        .image_url("a?b", &[], "caf\u{e9} au lait.jpg", ValidityWindow::unbounded())
        .unwrap();
    assert_eq!(url, "http://lvh.me:3000/a%3Fb/caf%C3%A9%20au%20lait.jpg");
}

#[test]
fn test_relative_upload_path_is_rejected() {
    let client = Client::create("public", "private", "http://lvh.me:3000/api/").unwrap();
    assert!(matches!(
        client.upload_url("upload", CURRENT_TIME, UNTIL_TIME),
        Err(InputError::InvalidPath { .. })
    ));
}

#[test]
fn test_shared_across_threads() {
    let client = Arc::new(reference_client());
    let expected = client
        .upload_url(DEFAULT_UPLOAD_PATH, CURRENT_TIME, UNTIL_TIME)
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                client
                    .upload_url(DEFAULT_UPLOAD_PATH, CURRENT_TIME, UNTIL_TIME)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
