//! End-to-end tests: full router, real temp-dir disk state, mocked email API.

mod utils;

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use utils::{create_test_config, spawn_test_server};

#[test_log::test(tokio::test)]
async fn test_upload_and_fetch_roundtrip() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    let payload = vec![7u8; 2048];
    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(payload.clone()).file_name("photo.png").mime_type("image/png"),
    );

    let response = server.post("/uploadFile").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let file = body["file"].as_str().unwrap().to_string();
    assert!(file.starts_with("/uploads/"), "unexpected path: {file}");
    assert!(file.ends_with("-photo.png"), "unexpected path: {file}");

    // Stored bytes come back byte-identical
    let fetched = server.get(&file).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.into_bytes().to_vec(), payload);
}

#[test_log::test(tokio::test)]
async fn test_upload_sanitizes_original_filename() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"quote".to_vec()).file_name("steel quote (final)!.pdf"),
    );

    let response = server.post("/uploadFile").multipart(form).await;
    response.assert_status_ok();

    let body: Value = response.json();
    let file = body["file"].as_str().unwrap();
    assert!(file.ends_with("-steelquotefinal.pdf"), "unexpected path: {file}");
}

#[test_log::test(tokio::test)]
async fn test_upload_without_file_field_is_rejected() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/uploadFile").multipart(form).await;
    response.assert_status_bad_request();
}

#[test_log::test(tokio::test)]
async fn test_fetch_of_absent_upload_is_not_found() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    server.get("/uploads/01011999-missing.png").await.assert_status_not_found();
}

#[test_log::test(tokio::test)]
async fn test_save_list_delete_flow() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    // Empty list reads as empty text, not an error
    let response = server.get("/emails.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "");

    server
        .post("/saveEmail")
        .json(&json!({"email": "a@x.com"}))
        .await
        .assert_status_ok();
    server
        .post("/saveEmail")
        .json(&json!({"email": "b@x.com"}))
        .await
        .assert_status_ok();

    // Duplicate add is rejected (case-insensitively) and stores nothing
    server
        .post("/saveEmail")
        .json(&json!({"email": "A@X.com"}))
        .await
        .assert_status_bad_request();

    // Malformed addresses are rejected
    for bad in ["not-an-email", "a@b", "@b.com"] {
        server
            .post("/saveEmail")
            .json(&json!({"email": bad}))
            .await
            .assert_status_bad_request();
    }

    let response = server.get("/emails.txt").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "a@x.com\nb@x.com\n");

    // Case-insensitive delete of a single address
    let response = server.delete("/deleteEmail").json(&json!({"email": "A@X.COM"})).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["emails"], json!(["b@x.com"]));

    // Deleting an absent address is a 404 and leaves the list unchanged
    server
        .delete("/deleteEmail")
        .json(&json!({"email": "zzz@x.com"}))
        .await
        .assert_status_not_found();
    assert_eq!(server.get("/emails.txt").await.text(), "b@x.com\n");
}

#[test_log::test(tokio::test)]
async fn test_bulk_delete_via_post() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        server
            .post("/saveEmail")
            .json(&json!({"email": email}))
            .await
            .assert_status_ok();
    }

    let response = server
        .post("/deleteEmail")
        .json(&json!({"emails": ["a@x.com", "c@x.com"]}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["emails"], json!(["b@x.com"]));
}

#[test_log::test(tokio::test)]
async fn test_upload_fans_out_to_recipients_despite_one_failure() {
    let mock_server = MockServer::start().await;

    // One recipient's delivery fails...
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .and(body_partial_json(json!({"template_params": {"to_name": "b@x.com"}})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    // ...the other two succeed
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = create_test_config(&dir);
    config.email.api_url = format!("{}/api/v1.0/email/send", mock_server.uri()).parse().unwrap();
    let server = spawn_test_server(config).await;

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        server
            .post("/saveEmail")
            .json(&json!({"email": email}))
            .await
            .assert_status_ok();
    }

    let form = MultipartForm::new().add_part("file", Part::bytes(b"quote".to_vec()).file_name("quote.pdf"));
    let response = server.post("/uploadFile").multipart(form).await;

    // The upload response is unaffected by the upstream failure
    response.assert_status_ok();

    // The fan-out runs detached; poll until all three calls have landed
    for _ in 0..50 {
        let received = mock_server.received_requests().await.unwrap_or_default();
        if received.len() >= 3 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[test_log::test(tokio::test)]
async fn test_upload_with_empty_recipient_list_sends_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let mut config = create_test_config(&dir);
    config.email.api_url = format!("{}/api/v1.0/email/send", mock_server.uri()).parse().unwrap();
    let server = spawn_test_server(config).await;

    let form = MultipartForm::new().add_part("file", Part::bytes(b"quote".to_vec()).file_name("quote.pdf"));
    server.post("/uploadFile").multipart(form).await.assert_status_ok();

    // Give the detached fan-out task a moment; it must not issue any call
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_root_status() {
    let dir = tempdir().unwrap();
    let server = spawn_test_server(create_test_config(&dir)).await;

    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("File Upload and Email API"));
}
