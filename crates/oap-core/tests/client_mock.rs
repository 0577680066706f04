//! Access client behavior against a mock backend.

use oap_core::client::{
    AccessClient, ApproveJoinRequest, JoinRequestQuery, NewJoinRequest, RejectJoinRequest,
};
use oap_core::config::{BackendConfig, BackendOverrides};
use oap_core::error::ApiErrorKind;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AccessClient {
    AccessClient::new(BackendConfig::resolve(&BackendOverrides {
        base_url: Some(server.uri()),
        anon_key: Some("test-anon-key".to_string()),
        ..Default::default()
    }))
}

fn created_row() -> serde_json::Value {
    json!([{
        "join_request_id": 7,
        "tenant_id": 1,
        "employee_id": "E123",
        "requested_role": "viewer",
        "email": "E123@saudiags.com",
        "status": "pending",
    }])
}

#[tokio::test]
async fn test_submit_sends_derived_fields_and_auth_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/join_requests"))
        .and(header("apikey", "test-anon-key"))
        .and(header("authorization", "Bearer test-anon-key"))
        .and(header("content-type", "application/json"))
        .and(header("prefer", "return=representation"))
        .and(body_json(json!({
            "tenant_id": 1,
            "employee_id": "E123",
            "requested_role": "viewer",
            "email": "E123@saudiags.com",
            "username": "E123",
            "full_name": "E123",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_row()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let rows = client
        .submit_join_request(&NewJoinRequest {
            tenant_id: 1,
            employee_id: " E123 ".to_string(),
            requested_role: "viewer".to_string(),
            note: None,
        })
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].join_request_id, 7);
    assert_eq!(rows[0].email.as_deref(), Some("E123@saudiags.com"));
}

#[tokio::test]
async fn test_submit_includes_trimmed_note_when_present() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/join_requests"))
        .and(body_partial_json(json!({"note": "please expedite"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_row()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .submit_join_request(&NewJoinRequest {
            tenant_id: 1,
            employee_id: "E123".to_string(),
            requested_role: "viewer".to_string(),
            note: Some("  please expedite  ".to_string()),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_submit_blank_employee_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/join_requests"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created_row()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .submit_join_request(&NewJoinRequest {
            tenant_id: 1,
            employee_id: "   ".to_string(),
            requested_role: "viewer".to_string(),
            note: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Validation);
}

#[tokio::test]
async fn test_list_builds_filtered_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/join_requests"))
        .and(query_param("select", "*"))
        .and(query_param("tenant_id", "eq.42"))
        .and(query_param("status", "eq.pending"))
        .and(query_param("order", "join_request_id.desc"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let rows = client
        .list_join_requests(&JoinRequestQuery {
            tenant_id: Some(42),
            status: Some("pending".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_list_status_all_omits_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/join_requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .list_join_requests(&JoinRequestQuery {
            status: Some("all".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or("");
    assert!(
        !query.contains("status="),
        "status filter should be omitted, got query: {query}"
    );
}

#[tokio::test]
async fn test_approve_maps_params_to_rpc_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/approve_join_request"))
        .and(body_json(json!({
            "p_join_request_id": 5,
            "p_approved_by_user_id": "admin-1",
            "p_role": "editor",
            "p_password_hash": "bcrypt$abc",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .approve_join_request(&ApproveJoinRequest {
            join_request_id: 5,
            approved_by_user_id: "admin-1".to_string(),
            role: "editor".to_string(),
            password_hash: "bcrypt$abc".to_string(),
        })
        .await
        .unwrap();

    // 204 with an empty body resolves to no payload, not an error.
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_reject_sends_null_reason_when_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/reject_join_request"))
        .and(body_json(json!({
            "p_join_request_id": 5,
            "p_rejected_by_user_id": "admin-1",
            "p_reason": null,
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client
        .reject_join_request(&RejectJoinRequest {
            join_request_id: 5,
            rejected_by_user_id: "admin-1".to_string(),
            reason: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_password_reset_rpcs_use_plain_param_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/create_password_reset_request"))
        .and(body_json(json!({"employee_id_or_email": "E123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"queued": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/reset_password_with_token"))
        .and(body_json(json!({
            "reset_token": "tok-1",
            "new_password_hash": "bcrypt$new",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let queued = client
        .create_password_reset_request("E123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(queued, json!({"queued": true}));

    client
        .reset_password_with_token("tok-1", "bcrypt$new")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_body_message_field_becomes_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/join_requests"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "bad role"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .submit_join_request(&NewJoinRequest {
            tenant_id: 1,
            employee_id: "E123".to_string(),
            requested_role: "nope".to_string(),
            note: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Status);
    assert_eq!(err.message, "bad role");
    assert_eq!(err.status, Some(400));
    assert_eq!(err.payload, Some(json!({"message": "bad role"})));
}

#[tokio::test]
async fn test_error_body_without_known_fields_synthesizes_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/join_requests"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .list_join_requests(&JoinRequestQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.message, "API error 500: {}");
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn test_non_json_body_is_a_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/join_requests"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .list_join_requests(&JoinRequestQuery::default())
        .await
        .unwrap_err();

    // Body parsing happens before the status check, as the callers expect.
    assert_eq!(err.kind, ApiErrorKind::Parse);
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let client = AccessClient::new(BackendConfig::resolve(&BackendOverrides {
        // Port 1 is never listening.
        base_url: Some("http://127.0.0.1:1".to_string()),
        anon_key: Some("test-anon-key".to_string()),
        ..Default::default()
    }));

    let err = client
        .list_join_requests(&JoinRequestQuery::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
}
