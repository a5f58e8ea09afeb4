use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domru_api::api::{EventsApi, IntercomApi, SortOrder, TemporalCodesApi};
use domru_api::{ApiError, Client, ClientConfig};

fn token_body(access: &str, refresh: &str, operator_id: i64) -> serde_json::Value {
    json!({
        "operatorId": operator_id,
        "operatorName": "Dom.ru",
        "tokenType": "Bearer",
        "accessToken": access,
        "expiresIn": 300,
        "refreshToken": refresh,
        "refreshExpiresIn": 5_184_000,
    })
}

fn subscriber_place_body() -> serde_json::Value {
    json!({
        "id": 100,
        "subscriberType": "owner",
        "subscriberState": "active",
        "place": {
            "id": 10,
            "address": {
                "index": null,
                "region": "Московская обл.",
                "district": null,
                "city": "Москва",
                "locality": null,
                "street": "Ленина",
                "house": "1",
                "building": null,
                "apartment": "12",
                "visibleAddress": "Ленина, д. 1",
                "groupName": "Подъезд 1"
            },
            "location": { "longitude": 37.6176, "latitude": 55.7558 },
            "operatorId": 2,
            "autoArmingState": false,
            "autoArmingRadius": 100
        },
        "subscriber": {
            "id": 7,
            "name": "Alice",
            "accountId": "acc-7",
            "nickName": null
        },
        "guardCallOut": { "active": false, "phoneNumber": "+70000000000" },
        "payment": { "useLink": false },
        "provider": "domru",
        "blocked": false
    })
}

fn device_body(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "operatorId": 2,
        "name": "Подъезд 1",
        "forpostGroupId": "fg-1",
        "forpostAccountId": null,
        "type": "DOOR",
        "allowOpen": true,
        "openMethod": "ACCESS_CONTROL",
        "allowVideo": true,
        "allowCallMobile": true,
        "allowSlideshow": false,
        "previewAvailable": true,
        "videoDownloadAvailable": false,
        "timeZone": 3,
        "quota": 0,
        "externalCameraId": "cam-1",
        "externalDeviceId": null
    })
}

fn event_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "placeId": 10,
        "eventTypeName": "accessControlOpen",
        "timestamp": "2024-05-01T10:00:00Z",
        "message": "Дверь открыта",
        "source": { "type": "accessControl", "id": 20 },
        "value": { "type": "bool", "value": true },
        "eventStatusValue": null,
        "actions": []
    })
}

async fn client_for(server: &MockServer, config: ClientConfig) -> Client {
    Client::new(
        config
            .base_url(format!("{}/", server.uri()))
            .timeout(Duration::from_secs(2)),
    )
    .expect("client")
}

#[tokio::test]
async fn refresh_flow_transparently_retries_after_401() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v2/session/refresh"))
        .and(header("Authorization", "Bearer refresh-1"))
        .and(header("Operator", "1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("acc-1", "refresh-2", 1234)))
        .expect(1)
        .mount(&server)
        .await;

    // Only the refreshed bearer token reaches the data.
    Mock::given(method("GET"))
        .and(path("/rest/v3/subscriber-places"))
        .and(header("Authorization", "Bearer acc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [subscriber_place_body()] })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v3/subscriber-places"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::with_refresh_token("refresh-1", 1234)).await;

    let places = client.list_places().await.expect("places");
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].place.id, 10);
    assert_eq!(places[0].place.address.visible_address, "Ленина, д. 1");
    assert_eq!(places[0].place.address.district, None);

    // The rotated refresh token is observable for external persistence.
    let session = client.session().await;
    assert_eq!(session.access_token.as_deref(), Some("acc-1"));
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-2"));
    assert_eq!(session.operator_id, Some(1234));
}

#[tokio::test]
async fn password_flow_sends_login_timestamp_and_hashes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v2/auth/alice/password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("acc-1", "refresh-1", 7)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/places/10/accesscontrols"))
        .and(header("Authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [device_body(20)] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/places/10/accesscontrols"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::with_password("alice", "password")).await;

    let devices = client.list_devices(10).await.expect("devices");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_type, "DOOR");
    assert!(devices[0].forpost_account_id.is_none());

    let requests = server.received_requests().await.expect("requests");
    let auth_request = requests
        .iter()
        .find(|r| r.url.path() == "/auth/v2/auth/alice/password")
        .expect("auth request");
    let body: serde_json::Value = serde_json::from_slice(&auth_request.body).expect("auth body");

    assert_eq!(body["login"], "alice");
    // hash1 is a stable function of the password alone.
    assert_eq!(body["hash1"], "W6ph5Mm5Pz8GgiULbPgzG37mj9g=");
    let hash2 = body["hash2"].as_str().expect("hash2");
    assert_eq!(hash2.len(), 32);
    assert!(hash2.chars().all(|c| c.is_ascii_hexdigit()));
    let timestamp = body["timestamp"].as_str().expect("timestamp");
    assert!(timestamp.ends_with('Z'));
    assert!(timestamp.contains('.'));
}

#[tokio::test]
async fn status_531_with_code_6007_is_device_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/places/10/accesscontrols/20/actions"))
        .respond_with(
            ResponseTemplate::new(531)
                .set_body_json(json!({ "errorCode": 6007, "errorMessage": "offline" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    match client.open_intercom(10, 20).await {
        Err(ApiError::DeviceUnavailable(message)) => assert_eq!(message, "offline"),
        other => panic!("expected DeviceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn status_500_with_code_6005_is_temporary_code_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/temporal-codes"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "errorCode": 6005, "errorMessage": "rejected" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    match client.list_temporal_codes(&[20]).await {
        Err(ApiError::TemporaryCodeFailed(message)) => assert_eq!(message, "rejected"),
        other => panic!("expected TemporaryCodeFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_success_body_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v3/subscriber-places"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    match client.list_places().await {
        Err(ApiError::Unknown { status, .. }) => assert_eq!(status, 200),
        other => panic!("expected Unknown, got {:?}", other),
    }
}

#[tokio::test]
async fn anonymous_client_fails_with_auth_data_required() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v3/subscriber-places"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    match client.list_places().await {
        Err(err @ ApiError::AuthDataRequired(_)) => {
            assert!(err.requires_login());
            assert!(err.to_string().contains("login/password"));
        }
        other => panic!("expected AuthDataRequired, got {:?}", other),
    }
}

#[tokio::test]
async fn persistent_401_exhausts_the_retry_budget() {
    let server = MockServer::start().await;

    // The refresh endpoint keeps minting tokens the resource keeps rejecting.
    Mock::given(method("GET"))
        .and(path("/auth/v2/session/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("acc-1", "refresh-2", 1234)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v3/subscriber-places"))
        .respond_with(ResponseTemplate::new(401))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(
        &server,
        ClientConfig::with_refresh_token("refresh-1", 1234).max_auth_retries(2),
    )
    .await;

    match client.list_places().await {
        Err(ApiError::AuthRetriesExhausted { attempts }) => assert_eq!(attempts, 2),
        other => panic!("expected AuthRetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn list_events_sends_page_sort_and_place_ids() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/events/search"))
        .and(query_param("page", "1"))
        .and(query_param("sort", "occurredAt,ASC"))
        .and(body_json(json!({ "placeIds": [1, 2, 3] })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "content": [event_body("e1"), event_body("e2")] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    let events = client
        .list_events(&[1, 2, 3], 1, SortOrder::Asc)
        .await
        .expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "e1");
    assert_eq!(events[0].source.source_type, "accessControl");
    assert!(events[0].value.value);
}

#[tokio::test]
async fn list_temporal_codes_joins_device_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/temporal-codes"))
        .and(query_param("accessControlIds", "20,21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "code": "482913",
                "updateDate": "2024-05-01T10:00:00Z",
                "accessControlId": 20,
                "type": "GUEST"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    let codes = client.list_temporal_codes(&[20, 21]).await.expect("codes");
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].code, "482913");
    assert_eq!(codes[0].access_control_id, 20);
}

#[tokio::test]
async fn open_intercom_posts_the_open_action() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/places/10/accesscontrols/20/actions"))
        .and(body_json(json!({ "name": "accessControlOpen" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "status": true, "errorCode": null, "errorMessage": null }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ClientConfig::anonymous()).await;

    let result = client.open_intercom(10, 20).await.expect("open result");
    assert!(result.status);
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn connection_failure_is_client_connector() {
    // Bind and drop a listener so the port refuses connections.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = Client::new(
        ClientConfig::anonymous()
            .base_url(format!("http://{addr}/"))
            .timeout(Duration::from_secs(2)),
    )
    .expect("client");

    match client.list_places().await {
        Err(ApiError::ClientConnector(_)) => {}
        other => panic!("expected ClientConnector, got {:?}", other),
    }
}
