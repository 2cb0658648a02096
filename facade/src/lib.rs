//! A conformance-test façade for `OpenID4VC` credential issuance and
//! verification.
//!
//! The façade sits between a test harness, an upstream credential issuer and
//! an upstream verifier. It asks the upstream services to mint offers and
//! verification requests, rewrites the URLs they return so wallets talk to the
//! façade rather than the upstream services, and tracks the lifecycle of each
//! issuance or verification session in a [`provider::SessionStore`].
//!
//! Requests are processed by passing a typed request body to [`handle`]
//! together with the façade's externally visible base URL and a
//! [`provider::Provider`] implementation.

pub mod client;
pub mod config;
pub mod identity;
pub mod provider;
pub mod qr;
pub mod requestor;
pub mod rewrite;
pub mod session;
pub mod types;

mod api;
mod error;
mod handlers;

pub use self::api::{Body, ForwardHeaders, Handler, Headers, NoHeaders, Request, Response};
pub use self::client::HttpUpstream;
pub use self::config::Config;
pub use self::error::Error;
pub use self::handlers::*;
pub use self::types::*;
