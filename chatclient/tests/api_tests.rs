use chatclient::api::{shared_file_message, Api};
use chatclient::ClientError;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn login_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = Api::new(&server.uri());

    api.login(" alice ", "secret").await.unwrap();
}

#[tokio::test]
async fn login_rejection_carries_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Account locked."
        })))
        .mount(&server)
        .await;

    let api = Api::new(&format!("{}/", server.uri()));
    let err = api.login("alice", "wrong").await.unwrap_err();

    assert!(matches!(&err, ClientError::Login(reason) if reason == "Account locked."));
}

#[tokio::test]
async fn login_rejection_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let api = Api::new(&server.uri());
    let err = api.login("alice", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "login failed: Invalid username or password.");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let api = Api::new(&server.uri());

    assert!(matches!(
        api.login("alice", "  ").await,
        Err(ClientError::Login(_))
    ));
    assert!(matches!(api.login("", "pw").await, Err(ClientError::Login(_))));
}

#[tokio::test]
async fn upload_returns_stored_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("hello upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "url": "/uploads/notes.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello upload").unwrap();

    let api = Api::new(&server.uri());
    let url = api.upload(file.path()).await.unwrap();

    assert_eq!(url, format!("{}/uploads/notes.txt", server.uri()));
}

#[tokio::test]
async fn upload_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let file = tempfile::NamedTempFile::new().unwrap();
    let api = Api::new(&server.uri());

    assert!(matches!(
        api.upload(file.path()).await,
        Err(ClientError::Upload(_))
    ));
}

#[test]
fn relative_urls_resolve_against_api() {
    let api = Api::new("http://chat.local:5000/");

    assert_eq!(
        api.resolve_url("/uploads/a.png"),
        "http://chat.local:5000/uploads/a.png"
    );
    assert_eq!(api.resolve_url("https://cdn/a.png"), "https://cdn/a.png");
}

#[tokio::test]
async fn upload_of_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let api = Api::new("http://127.0.0.1:1");

    assert!(matches!(
        api.upload(&dir.path().join("missing.txt")).await,
        Err(ClientError::Io(_))
    ));
}

#[test]
fn shared_file_message_renders_as_link() {
    let message = shared_file_message("notes.txt", "http://files.local/uploads/notes.txt");
    assert_eq!(
        message,
        "Shared a file: [notes.txt](http://files.local/uploads/notes.txt)"
    );

    assert_eq!(
        common::markdown::render(&message),
        "Shared a file: <a href=\"http://files.local/uploads/notes.txt\">notes.txt</a>"
    );
}

#[test]
fn shared_file_names_render_verbatim() {
    let message = shared_file_message("my_file_v2.png", "http://h/uploads/my_file_v2.png");

    assert_eq!(
        common::markdown::render(&message),
        "Shared a file: <a href=\"http://h/uploads/my%5Ffile%5Fv2.png\">my&#95;file&#95;v2.png</a>"
    );
}
