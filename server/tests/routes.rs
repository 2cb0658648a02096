//! Tests for the façade's HTTP routes.

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use credibil_facade::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::{BASE_URL, Facade};
use tower::ServiceExt;

fn app(provider: &Facade) -> Router {
    let config = Config {
        issuer_url: "https://issuer.example".to_string(),
        verifier_url: "https://verifier.example".to_string(),
        vc_repo_url: "https://catalog.example".to_string(),
        base_url: Some(BASE_URL.to_string()),
    };
    facade_server::router(config, provider.clone())
}

async fn send(provider: &Facade, request: Request<Body>) -> (StatusCode, String) {
    let response = app(provider).oneshot(request).await.expect("should respond");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("should read body").to_bytes();
    (status, String::from_utf8(bytes.to_vec()).expect("should be utf-8"))
}

async fn get(provider: &Facade, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(provider, request).await;
    (status, serde_json::from_str(&body).expect("should be json"))
}

async fn post_json(provider: &Facade, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(provider, request).await;
    (status, serde_json::from_str(&body).expect("should be json"))
}

#[tokio::test]
async fn root() {
    let provider = Facade::new();
    let (status, body) = get(&provider, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "EWC Issuer Api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn no_cache() {
    let provider = Facade::new();
    let request = Request::get("/").body(Body::empty()).unwrap();
    let response = app(&provider).oneshot(request).await.unwrap();
    assert_eq!(response.headers()[CACHE_CONTROL], "no-cache, no-store");
}

// Should issue an offer, relay the wallet's offer fetch and report the
// session as read.
#[tokio::test]
async fn issuance_flow() {
    let provider = Facade::new();

    let (status, body) = get(&provider, "/issue?sessionId=s1&credentialType=VerifiableId").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionId"], "s1");
    assert!(body["qr"].as_str().unwrap().starts_with("data:image/png;base64,"));
    let offer_uri = body["credentialOfferUri"].as_str().unwrap();
    assert!(offer_uri.starts_with("openid-credential-offer://facade.example/?"));
    assert!(offer_uri.contains("credential_offer_uri=https%3A%2F%2Ffacade.example%2Fproxy%2Foffer"));

    let (status, body) = get(&provider, "/issue/status?sessionId=s1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OK", "sessionId": "s1", "status": "Pending"}));

    let offer_id = provider.upstream.issued()[0].offer_id.clone();
    let (status, body) = get(&provider, &format!("/proxy/offer?id={offer_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credential_issuer"], BASE_URL);

    let (_, body) = get(&provider, "/api/issue/status?sessionId=s1").await;
    assert_eq!(body["status"], "Read");
}

#[tokio::test]
async fn issue_failures() {
    let provider = Facade::new();

    let (status, body) = get(&provider, "/issue?credentialType=VerifiableId").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"status": "fail", "reason": "Query parameter sessionId required!"}));

    let (status, body) = get(&provider, "/issue?sessionId=s1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "status": "fail",
            "reason": "Query parameter credentialType required!",
            "sessionId": "s1"
        })
    );

    let (status, body) = get(&provider, "/issue?sessionId=s1&credentialType=Unknown").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (status, body) =
        get(&provider, "/issue?sessionId=s1&credentialType=UnavailableCredential").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["reason"].as_str().unwrap().contains("HTTP error! Status: 503"));
    assert_eq!(body["sessionId"], "s1");

    let (status, _) = get(&provider, "/issue?sessionId=s1&credentialType=VerifiableId").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get(&provider, "/issue?sessionId=s1&credentialType=VerifiableId").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "Session ID s1 already used");

    let (status, body) = get(&provider, "/issue/status").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "Missing sessionId in query parameters.");

    let (status, body) = get(&provider, "/issue/status?sessionId=unknown").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["sessionId"], "unknown");
}

// The verifier's success redirect completes the session.
#[tokio::test]
async fn verification_flow() {
    let provider = Facade::new();

    let (status, body) =
        get(&provider, "/api/verify?sessionId=v1&credentialType=VerifiableId").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["verificationUri"].as_str().unwrap().starts_with("openid4vp://"));

    let (request, state) = provider.upstream.verifications().remove(0);
    assert_eq!(request.success_redirect_uri, format!("{BASE_URL}/verify/callback/success/$id"));

    let request =
        Request::get(format!("/verify/callback/success/{state}")).body(Body::empty()).unwrap();
    let (status, page) = send(&provider, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Success</h1>"));

    let (_, body) = get(&provider, "/verify/status?sessionId=v1").await;
    assert_eq!(body, json!({"message": "OK", "sessionId": "v1", "status": "Completed"}));
}

#[tokio::test]
async fn verification_error_callback() {
    let provider = Facade::new();

    get(&provider, "/verify?sessionId=v1&credentialType=VerifiableId").await;
    let (_, state) = provider.upstream.verifications().remove(0);

    let request =
        Request::get(format!("/api/verify/callback/error/{state}")).body(Body::empty()).unwrap();
    let (status, page) = send(&provider, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("<h1>Error</h1>"));

    let (_, body) = get(&provider, "/verify/status?sessionId=v1").await;
    assert_eq!(body["status"], "Failed");
}

// An unknown session still renders the landing page.
#[tokio::test]
async fn unknown_callback() {
    let provider = Facade::new();

    let request = Request::get("/verify/callback/success/unknown").body(Body::empty()).unwrap();
    let (status, page) = send(&provider, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Success"));
}

#[tokio::test]
async fn update_status() {
    let provider = Facade::new();

    get(&provider, "/verify?sessionId=v1&credentialType=VerifiableId").await;
    let (_, state) = provider.upstream.verifications().remove(0);

    let (status, body) =
        post_json(&provider, "/verify/status", &json!({"id": state, "state": "Completed"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Update successful"}));

    let (status, _) =
        post_json(&provider, "/verify/updateStatus", &json!({"id": state, "state": "Failed"}))
            .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&provider, "/verify/status?sessionId=v1").await;
    assert_eq!(body["status"], "Failed");

    let (status, body) =
        post_json(&provider, "/verify/status", &json!({"id": state, "state": "Done"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing or invalid 'state' parameter"}));

    let (status, body) = post_json(&provider, "/verify/status", &json!({"state": "Failed"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing or invalid 'id' parameter"}));

    let (status, body) =
        post_json(&provider, "/verify/status", &json!({"id": "unknown", "state": "Failed"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

// Status updates are read as JSON whatever the content type.
#[tokio::test]
async fn update_status_untyped_body() {
    let provider = Facade::new();

    get(&provider, "/verify?sessionId=v1&credentialType=VerifiableId").await;
    let (_, state) = provider.upstream.verifications().remove(0);

    let body = json!({"id": state, "state": "Completed"});
    let request = Request::post("/verify/status").body(Body::from(body.to_string())).unwrap();
    let (status, body) = send(&provider, request).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body, json!({"message": "Update successful"}));

    let (_, body) = get(&provider, "/verify/status?sessionId=v1").await;
    assert_eq!(body["status"], "Completed");

    let request = Request::post("/verify/status").body(Body::from("not json")).unwrap();
    let (status, body) = send(&provider, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": "Missing or invalid 'id' parameter"})
    );
}

#[tokio::test]
async fn proxy_failures() {
    let provider = Facade::new();

    let (status, body) = get(&provider, "/proxy/offer").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing or invalid 'id' query parameter"}));

    let (status, body) = get(&provider, "/proxy/offer?id=unknown").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("HTTP error! Status: 404"));
}

#[tokio::test]
async fn credential_relay() {
    let provider = Facade::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/proxy/credential")
        .header(AUTHORIZATION, "Bearer token-123")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"format": "vc+sd-jwt"}).to_string()))
        .unwrap();
    let (status, body) = send(&provider, request).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["authorization"], "Bearer token-123");
    assert_eq!(body["request"]["format"], "vc+sd-jwt");
}

#[tokio::test]
async fn metadata() {
    let provider = Facade::new();

    let (status, body) = get(&provider, "/.well-known/openid-credential-issuer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issuer"], BASE_URL);
    assert_eq!(body["credential_issuer"], BASE_URL);

    let (status, body) = get(&provider, "/api/.well-known/openid-credential-issuer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issuer"], BASE_URL);
}
