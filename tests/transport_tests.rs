//! Integration tests for the transmission client against a mock delivery service.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mailcompose::compose::{assemble, ComposeRequest, EmailBody};
use mailcompose::error::ComposeError;
use mailcompose::ingest::IngestionSession;
use mailcompose::model::payload::Payload;
use mailcompose::transport::TransmissionClient;

fn payload() -> Payload {
    let request = ComposeRequest::new(
        "sender@example.com",
        "to@example.com",
        "Hello",
        EmailBody::Html {
            html: "<p>hello</p>".into(),
        },
    )
    .with_source("tests")
    .with_template_id("default");
    assemble(&request, &IngestionSession::new(1024)).unwrap()
}

#[tokio::test]
async fn test_successful_send_returns_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({
            "source": "tests",
            "payload": { "to": "to@example.com", "html": "<p>hello</p>" },
            "additionalInfo": { "isText": false, "template_id": "default" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "queued", "id": 7 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TransmissionClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
    let response = client.send(&payload()).await.expect("send should succeed");

    assert_eq!(response["status"], "queued");
    assert_eq!(response["id"], 7);
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let client = TransmissionClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
    assert!(client.send(&payload()).await.unwrap().is_null());
}

#[tokio::test]
async fn test_server_message_is_preferred() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "message": "Invalid recipient", "error": "E_RCPT" })),
        )
        .mount(&mock_server)
        .await;

    let client = TransmissionClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.send(&payload()).await.unwrap_err();
    match err {
        ComposeError::Transmission { status, message } => {
            assert_eq!(status, Some(422));
            assert_eq!(message, "Invalid recipient");
        }
        other => panic!("expected Transmission, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_reason_when_body_has_no_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "code": 1 })))
        .mount(&mock_server)
        .await;

    let client = TransmissionClient::new(mock_server.uri(), Duration::from_secs(5)).unwrap();
    let err = client.send(&payload()).await.unwrap_err();
    assert!(matches!(
        err,
        ComposeError::Transmission { status: Some(500), ref message } if message == "Internal Server Error"
    ));
}

#[tokio::test]
async fn test_hung_service_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = TransmissionClient::new(mock_server.uri(), Duration::from_millis(200)).unwrap();
    let err = client.send(&payload()).await.unwrap_err();
    match err {
        ComposeError::Transmission { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("timed out"), "got: {message}");
        }
        other => panic!("expected Transmission, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let client = TransmissionClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let err = client.send(&payload()).await.unwrap_err();
    assert!(matches!(err, ComposeError::Transmission { status: None, .. }));
}
