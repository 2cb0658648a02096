//! # Route Handlers

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use axum::Json;
use axum::body::Bytes;
use credibil_facade::provider::Provider;
use credibil_facade::status::set_verification_status;
use credibil_facade::{
    CredentialRequest, ForwardHeaders, IssueRequest, IssueResponse, IssueStatusRequest,
    IssueStatusResponse, MetadataRequest, OfferRequest, Request, UpdateStatusRequest,
    UpdateStatusResponse, VerificationState, VerifyRequest, VerifyResponse, VerifyStatusRequest,
    VerifyStatusResponse,
};
use serde_json::{Value, json};

use crate::AppState;
use crate::response::{HarnessResult, ProxyResult};

pub async fn root() -> Json<Value> {
    Json(json!({"name": "EWC Issuer Api", "version": env!("CARGO_PKG_VERSION")}))
}

// Create a credential offer for the harness.
pub async fn issue<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap, Query(request): Query<IssueRequest>,
) -> HarnessResult<IssueResponse> {
    let base_url = state.config.base_url(&headers);
    let session_id = request.session_id.clone();
    let result = credibil_facade::handle(&base_url, request, &state.provider).await;
    HarnessResult::new(session_id, result)
}

pub async fn issue_status<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap,
    Query(request): Query<IssueStatusRequest>,
) -> HarnessResult<IssueStatusResponse> {
    let base_url = state.config.base_url(&headers);
    let session_id = request.session_id.clone();
    let result = credibil_facade::handle(&base_url, request, &state.provider).await;
    HarnessResult::new(session_id, result)
}

// Create a verification request for the harness.
pub async fn verify<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap, Query(request): Query<VerifyRequest>,
) -> HarnessResult<VerifyResponse> {
    let base_url = state.config.base_url(&headers);
    let session_id = request.session_id.clone();
    let result = credibil_facade::handle(&base_url, request, &state.provider).await;
    HarnessResult::new(session_id, result)
}

pub async fn verify_status<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap,
    Query(request): Query<VerifyStatusRequest>,
) -> HarnessResult<VerifyStatusResponse> {
    let base_url = state.config.base_url(&headers);
    let session_id = request.session_id.clone();
    let result = credibil_facade::handle(&base_url, request, &state.provider).await;
    HarnessResult::new(session_id, result)
}

// Set the state of a verification session. The body is read as JSON whatever
// its content type. A body that is not valid JSON is treated as empty so the
// caller gets a parameter error.
pub async fn update_status<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap, body: Bytes,
) -> ProxyResult<UpdateStatusResponse> {
    let base_url = state.config.base_url(&headers);
    let request: UpdateStatusRequest = serde_json::from_slice(&body).unwrap_or_default();
    credibil_facade::handle(&base_url, request, &state.provider).await.into()
}

// Landing page for the verifier's success redirect.
pub async fn callback_success<P: Provider>(
    State(state): State<AppState<P>>, Path(id): Path<String>,
) -> impl IntoResponse {
    callback(&state.provider, &id, VerificationState::Completed).await;
    Html(page("Success", "Verification completed. You can close this page."))
}

// Landing page for the verifier's error redirect.
pub async fn callback_error<P: Provider>(
    State(state): State<AppState<P>>, Path(id): Path<String>,
) -> impl IntoResponse {
    callback(&state.provider, &id, VerificationState::Failed).await;
    Html(page("Error", "Verification failed. You can close this page."))
}

async fn callback(provider: &impl Provider, id: &str, state: VerificationState) {
    if let Err(e) = set_verification_status(provider, id, state).await {
        tracing::error!("failed to set verification {id} to {state}: {e}");
    }
}

fn page(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head><meta charset="utf-8" /><title>{title}</title></head>
    <body>
        <h1>{title}</h1>
        <p>{message}</p>
    </body>
</html>
"#
    )
}

// Relay a wallet's credential offer fetch.
pub async fn offer<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap, Query(request): Query<OfferRequest>,
) -> ProxyResult<Value> {
    let base_url = state.config.base_url(&headers);
    credibil_facade::handle(&base_url, request, &state.provider).await.into()
}

// Relay a wallet's credential request.
pub async fn credential<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap, body: String,
) -> ProxyResult<Value> {
    let base_url = state.config.base_url(&headers);
    let request = Request {
        body: CredentialRequest { body },
        headers: ForwardHeaders(headers),
    };
    credibil_facade::handle(&base_url, request, &state.provider).await.into()
}

pub async fn metadata<P: Provider>(
    State(state): State<AppState<P>>, headers: HeaderMap,
) -> ProxyResult<Value> {
    let base_url = state.config.base_url(&headers);
    credibil_facade::handle(&base_url, MetadataRequest, &state.provider).await.into()
}
