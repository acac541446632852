//! HTTP contract tests for the Ohmyfin client
//!
//! Runs the real reqwest transport against a local mock server:
//! - Paths, methods, KEY header and JSON bodies
//! - Status-code branching and error payload mapping
//! - Transport failures (timeout, connection refused)

use chrono::NaiveDate;
use ohmyfin::{
    ChangeRequest, ChangeStatus, Client, ClientConfig, Error, FieldStatus, Role, SsiRequest,
    TrackRequest, TransactionStatus, TransportError, ValidateRequest,
};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "integration-key";

fn client_for(server: &MockServer) -> Client {
    Client::new(ClientConfig::new(API_KEY).with_base_url(server.uri())).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

#[tokio::test]
async fn test_track_round_trip() {
    let server = MockServer::start().await;
    let uetr = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .and(header("KEY", API_KEY))
        .and(body_json(json!({
            "uetr": uetr,
            "amount": 250.75,
            "date": "2024-01-15",
            "currency": "USD"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "rejected",
            "lastupdate": "2024-01-16",
            "details": [
                {"id": 1, "bank": "Deutsche Bank", "swift": "DEUTDEFF", "status": "success",
                 "reason": "", "route": "DEUTDEFF -> CHASUS33"},
                {"id": 2, "bank": "JPMorgan Chase", "swift": "CHASUS33", "status": "rejected",
                 "reason": "Beneficiary account closed", "route": "CHASUS33 -> BOFAUS3N"}
            ],
            "limits": {"daily": 99, "monthly": 999, "annual": 9999}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .track(&TrackRequest::by_uetr(&uetr, dec!(250.75), date(), "USD"))
        .await
        .unwrap();

    assert_eq!(result.status, TransactionStatus::Rejected);
    assert_eq!(result.lastupdate, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    assert_eq!(result.details.len(), 2);
    assert_eq!(result.details[1].swift, "CHASUS33");
    assert_eq!(result.details[1].reason, "Beneficiary account closed");
    assert_eq!(result.limits.monthly, 999);
}

#[tokio::test]
async fn test_track_by_reference() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .and(body_json(json!({
            "ref": "PAY-2024-0001",
            "amount": 10000.0,
            "date": "2024-01-15",
            "currency": "EUR"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "unknown",
            "lastupdate": "2024-01-15",
            "details": [],
            "limits": {"daily": 1, "monthly": 1, "annual": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .track(&TrackRequest::by_reference(
            "PAY-2024-0001",
            dec!(10000),
            date(),
            "EUR",
        ))
        .await
        .unwrap();

    assert_eq!(result.status, TransactionStatus::Unknown);
}

#[tokio::test]
async fn test_validate_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/validate"))
        .and(header("KEY", API_KEY))
        .and(body_json(json!({
            "beneficiary_bic": "DEUTDEFF",
            "currency": "EUR",
            "beneficiary_iban": "DE89370400440532013000",
            "correspondent_bic": "COBADEFF"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beneficiary_bic": {"status": "ok"},
            "beneficiary_iban": {"status": "ok"},
            "correspondent_bic": {"status": "error", "details": "no relationship in EUR"},
            "avg_business_days": 1,
            "available_correspondents": [{"corresBIC": "DEUTDEFF", "is_preferred": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .validate(
            &ValidateRequest::new("DEUTDEFF", "EUR", "DE89370400440532013000")
                .correspondent_bic("COBADEFF"),
        )
        .await
        .unwrap();

    let correspondent = result.correspondent_bic.unwrap();
    assert_eq!(correspondent.status, FieldStatus::Error);
    assert_eq!(correspondent.details.as_deref(), Some("no relationship in EUR"));
    assert_eq!(result.avg_business_days, 1);
    assert!(result.available_correspondents[0].is_preferred);
}

#[tokio::test]
async fn test_validate_422_field_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/validate"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "invalid bic",
            "errors": {"beneficiary_bic": ["must be 8 or 11 characters"]}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .validate(&ValidateRequest::new("DEUT", "EUR", "DE89370400440532013000"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    let errors = err.field_errors().unwrap();
    assert!(errors["beneficiary_bic"].contains(&"must be 8 or 11 characters".to_string()));
}

#[tokio::test]
async fn test_get_ssi_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ssi"))
        .and(query_param("swift", "DEUTDEFF"))
        .and(query_param("currency", "USD"))
        .and(header("KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correspondents": [
                {"id": 11, "bank": "Citibank N.A.", "swift": "CITIUS33", "currency": "USD",
                 "account": "36072477", "is_preferred": false},
                {"id": 12, "bank": "JPMorgan Chase", "swift": "CHASUS33", "currency": "USD",
                 "account": "001-1-234567", "is_preferred": true}
            ],
            "currencies": ["USD", "EUR", "GBP"],
            "limits": {"daily": 50, "monthly": 500, "annual": 5000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .get_ssi(&SsiRequest::new("DEUTDEFF", "USD"))
        .await
        .unwrap();

    assert_eq!(result.correspondents.len(), 2);
    assert_eq!(result.correspondents[0].swift, "CITIUS33");
    assert_eq!(result.preferred().unwrap().swift, "CHASUS33");
    assert!(result.currencies.contains("GBP"));
    assert_eq!(result.limits.unwrap().daily, 50);
}

#[tokio::test]
async fn test_change_round_trip() {
    let server = MockServer::start().await;
    let uetr = Uuid::new_v4().to_string();

    Mock::given(method("POST"))
        .and(path("/api/change"))
        .and(header("KEY", API_KEY))
        .and(body_json(json!({
            "uetr": uetr,
            "amount": 10000.0,
            "date": "2024-01-15",
            "currency": "USD",
            "status": "on hold",
            "role": "intermediary",
            "swift": "CHASUS33",
            "message": "Compliance review"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Status updated"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = ChangeRequest::new(
        &uetr,
        dec!(10000),
        date(),
        "USD",
        "on_hold".parse::<ChangeStatus>().unwrap(),
        "intermediary".parse::<Role>().unwrap(),
    )
    .swift("CHASUS33")
    .message("Compliance review");

    let ack = client_for(&server).change(&request).await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Status updated"));
}

#[tokio::test]
async fn test_server_error_with_html_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .track(&TrackRequest::by_uetr(
            Uuid::new_v4().to_string(),
            dec!(1),
            date(),
            "USD",
        ))
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status_code,
            errors,
            ..
        } => {
            assert_eq!(status_code, 500);
            assert!(errors.is_empty());
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/track"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = Client::new(
        ClientConfig::new(API_KEY)
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200)),
    )
    .unwrap();

    let err = client
        .track(&TrackRequest::by_uetr(
            Uuid::new_v4().to_string(),
            dec!(1),
            date(),
            "USD",
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind then drop to get a port with nothing listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = Client::new(
        ClientConfig::new(API_KEY).with_base_url(format!("http://127.0.0.1:{}", port)),
    )
    .unwrap();

    let err = client
        .get_ssi(&SsiRequest::new("DEUTDEFF", "EUR"))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}
