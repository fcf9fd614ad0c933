//! Envelope decoding and error mapping for the console API client.
//!
//! These tests do not need a running API; they exercise the response and
//! error shapes directly.

use assert_matches::assert_matches;
use serde_json::json;

use stationdesk_client::api::Envelope;
use stationdesk_client::{ClientConfig, ClientError, StationApi};
use stationdesk_core::error::ServiceError;
use stationdesk_core::station::StationRecord;

#[test]
fn successful_envelope_yields_data() {
    let envelope: Envelope<StationRecord> = serde_json::from_value(json!({
        "isSuccess": true,
        "data": { "id": 7, "name": "Kim Ma post", "type": 0 }
    }))
    .unwrap();

    let record = envelope.into_data().unwrap();
    assert_eq!(record.id, 7);
    assert!(record.wards.is_empty());
    assert!(record.parent_station.is_none());
}

#[test]
fn unsuccessful_envelope_carries_the_message() {
    let envelope: Envelope<StationRecord> = serde_json::from_value(json!({
        "isSuccess": false,
        "message": "name already taken"
    }))
    .unwrap();

    assert_matches!(
        envelope.into_data(),
        Err(ClientError::Unsuccessful(message)) if message == "name already taken"
    );
}

#[test]
fn successful_envelope_without_data_is_an_error() {
    let envelope: Envelope<StationRecord> =
        serde_json::from_value(json!({ "isSuccess": true })).unwrap();
    assert_matches!(envelope.into_data(), Err(ClientError::MissingData));
}

#[test]
fn client_errors_fold_into_service_errors() {
    assert_eq!(
        ServiceError::from(ClientError::Api {
            status: 422,
            body: "bad ward".into()
        }),
        ServiceError::Rejected {
            status: 422,
            message: "bad ward".into()
        }
    );
    assert_matches!(
        ServiceError::from(ClientError::Unsuccessful("nope".into())),
        ServiceError::Rejected { status: 200, .. }
    );
    assert_matches!(
        ServiceError::from(ClientError::MissingData),
        ServiceError::Decode(_)
    );
}

#[test]
fn urls_join_base_and_path() {
    let api = StationApi::new(ClientConfig::new("http://localhost:8080/api/")).unwrap();
    assert_eq!(api.base_url(), "http://localhost:8080/api");
    assert_eq!(api.url("/station/7"), "http://localhost:8080/api/station/7");
    assert_eq!(api.url("photo"), "http://localhost:8080/api/photo");
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    use stationdesk_core::services::StationDirectory;

    let mut config = ClientConfig::new("http://127.0.0.1:9");
    config.request_timeout = std::time::Duration::from_secs(2);
    let api = StationApi::new(config).unwrap();

    assert_matches!(api.get(1).await, Err(ServiceError::Transport(_)));
}
