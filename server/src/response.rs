//! # Axum Responses
//!
//! Harness endpoints answer failures with
//! `{"status": "fail", "reason": ..., "sessionId": ...}`. Proxy, metadata
//! and status-update endpoints answer with `{"error": ...}`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use credibil_facade::Result;
use serde::Serialize;
use serde_json::{Map, Value};

/// Axum response wrapper for harness endpoints.
pub struct HarnessResult<T> {
    session_id: Option<String>,
    result: Result<credibil_facade::Response<T>>,
}

impl<T> HarnessResult<T> {
    /// Wrap a handler result for the harness session `session_id`.
    pub const fn new(
        session_id: Option<String>, result: Result<credibil_facade::Response<T>>,
    ) -> Self {
        Self { session_id, result }
    }
}

impl<T: Serialize> IntoResponse for HarnessResult<T> {
    fn into_response(self) -> Response {
        match self.result {
            Ok(r) => (r.status, Json(r.body)).into_response(),
            Err(e) => {
                tracing::warn!("harness request failed: {e}");
                let mut body = Map::new();
                body.insert("status".to_string(), Value::from("fail"));
                body.insert("reason".to_string(), Value::from(e.to_string()));
                if let Some(session_id) = self.session_id {
                    body.insert("sessionId".to_string(), Value::from(session_id));
                }
                (e.status(), Json(Value::Object(body))).into_response()
            }
        }
    }
}

/// Axum response wrapper for proxy endpoints.
pub struct ProxyResult<T>(Result<credibil_facade::Response<T>>);

impl<T: Serialize> IntoResponse for ProxyResult<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(r) => (r.status, Json(r.body)).into_response(),
            Err(e) => {
                tracing::warn!("proxy request failed: {e}");
                (e.status(), Json(e.to_json())).into_response()
            }
        }
    }
}

impl<T> From<Result<credibil_facade::Response<T>>> for ProxyResult<T> {
    fn from(val: Result<credibil_facade::Response<T>>) -> Self {
        Self(val)
    }
}
