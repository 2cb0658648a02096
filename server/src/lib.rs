//! # Façade HTTP API
//!
//! Axum routes for the test harness, wallet-facing proxy and verifier
//! callback endpoints. Every route is also served under `/api`.

mod handlers;
mod provider;
mod response;
mod store;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::{get, post};
use credibil_facade::Config;
use credibil_facade::provider::Provider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub use self::provider::ServerProvider;
pub use self::store::MemoryStore;

/// Shared state handed to every route.
#[derive(Clone, Debug)]
pub struct AppState<P> {
    config: Arc<Config>,
    provider: P,
}

/// Build the façade's router.
pub fn router<P: Provider + 'static>(config: Config, provider: P) -> Router {
    let state = AppState {
        config: Arc::new(config),
        provider,
    };

    Router::new()
        .route("/", get(handlers::root))
        .merge(routes())
        .nest("/api", routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_methods(Any).allow_origin(Any).allow_headers(Any))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store"),
        ))
        .with_state(state)
}

fn routes<P: Provider + 'static>() -> Router<AppState<P>> {
    Router::new()
        .route("/issue", get(handlers::issue::<P>))
        .route("/issue/status", get(handlers::issue_status::<P>))
        .route("/verify", get(handlers::verify::<P>))
        .route(
            "/verify/status",
            get(handlers::verify_status::<P>).post(handlers::update_status::<P>),
        )
        .route("/verify/updateStatus", post(handlers::update_status::<P>))
        .route("/verify/callback/success/{id}", get(handlers::callback_success::<P>))
        .route("/verify/callback/error/{id}", get(handlers::callback_error::<P>))
        .route("/proxy/offer", get(handlers::offer::<P>))
        .route("/proxy/credential", post(handlers::credential::<P>))
        .route("/.well-known/openid-credential-issuer", get(handlers::metadata::<P>))
}
