use super::*;
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use server_api::ApiContext;
use shared::{
    domain::{Party, PartyId},
    error::{ApiError, ErrorCode},
    protocol::{party_route, DeleteAck},
};
use storage::MemoryPartyStore;
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(Arc::new(AppState {
        api: ApiContext::new(MemoryPartyStore::new()),
    }))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}

async fn create(app: &Router, body: Value) -> Party {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/parties", body))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = test_app()
        .oneshot(empty_request("GET", "/healthz"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn acme_lifecycle_over_http() {
    let app = test_app();

    let created = create(&app, json!({ "name": "Acme" })).await;
    assert_eq!(created.name, "Acme");

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/parties"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let listed: Vec<Party> = read_json(response).await;
    assert_eq!(listed, vec![created.clone()]);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &party_route(created.id),
            json!({ "phone": "123" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Party = read_json(response).await;
    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.phone.as_deref(), Some("123"));

    let response = app
        .clone()
        .oneshot(empty_request("GET", &party_route(created.id)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Party = read_json(response).await;
    assert_eq!(fetched, updated);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &party_route(created.id)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let ack: DeleteAck = read_json(response).await;
    assert_eq!(ack, DeleteAck { success: true });

    let response = app
        .clone()
        .oneshot(empty_request("GET", &party_route(created.id)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(empty_request("GET", "/parties"))
        .await
        .expect("response");
    let listed: Vec<Party> = read_json(response).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn delete_response_body_is_success_flag() {
    let app = test_app();
    let created = create(&app, json!({ "name": "Acme" })).await;

    let response = app
        .oneshot(empty_request("DELETE", &party_route(created.id)))
        .await
        .expect("response");
    let body: Value = read_json(response).await;
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn unknown_ids_return_not_found_envelope() {
    let app = test_app();
    let existing = create(&app, json!({ "name": "Acme" })).await;
    let missing = PartyId::new_v4();

    for request in [
        empty_request("GET", &party_route(missing)),
        json_request("PUT", &party_route(missing), json!({ "phone": "1" })),
        empty_request("DELETE", &party_route(missing)),
        empty_request("GET", "/parties/not-a-uuid"),
    ] {
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let err: ApiError = read_json(response).await;
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.ends_with("not found"));
    }

    let response = app
        .oneshot(empty_request("GET", "/parties"))
        .await
        .expect("response");
    let listed: Vec<Party> = read_json(response).await;
    assert_eq!(listed, vec![existing]);
}

#[tokio::test]
async fn post_ignores_client_supplied_id() {
    let app = test_app();
    let chosen = PartyId::new_v4();
    let created = create(&app, json!({ "id": chosen.to_string(), "name": "Acme" })).await;
    assert_ne!(created.id, chosen);
}

#[tokio::test]
async fn put_cannot_change_id() {
    let app = test_app();
    let created = create(&app, json!({ "name": "Acme" })).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &party_route(created.id),
            json!({ "id": PartyId::new_v4().to_string(), "email": "a@b.test" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Party = read_json(response).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.email.as_deref(), Some("a@b.test"));
}

#[tokio::test]
async fn unknown_keys_are_rejected_before_the_store() {
    let app = test_app();
    let created = create(&app, json!({ "name": "Acme" })).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &party_route(created.id),
            json!({ "website": "acme.test" }),
        ))
        .await
        .expect("response");
    assert!(response.status().is_client_error());
    let err: ApiError = read_json(response).await;
    assert_eq!(err.code, ErrorCode::Validation);

    let response = app
        .oneshot(json_request("POST", "/parties", json!({ "phone": "1" })))
        .await
        .expect("response");
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let app = test_app();
    let huge = "x".repeat(MAX_BODY_BYTES + 1);
    let response = app
        .oneshot(json_request("POST", "/parties", json!({ "name": huge })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn alternate_uuid_spellings_do_not_resolve() {
    let app = test_app();
    let created = create(&app, json!({ "name": "Acme" })).await;
    let canonical = created.id.to_string();

    for alias in [
        format!("urn:uuid:{canonical}"),
        canonical.to_uppercase(),
        canonical.replace('-', ""),
    ] {
        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/parties/{alias}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{alias}");
    }

    let response = app
        .oneshot(empty_request("GET", &party_route(created.id)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
