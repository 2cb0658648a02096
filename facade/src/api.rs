//! # API
//!
//! Request and response envelopes shared by every handler. A request body is
//! paired with (optional) headers and routed to its [`Handler`]
//! implementation by [`crate::handle`].

use std::fmt::Debug;
use std::ops::Deref;

use http::{HeaderMap, StatusCode};

/// A request to process.
#[derive(Clone, Debug)]
pub struct Request<B, H = NoHeaders>
where
    B: Body,
    H: Headers,
{
    /// The request to process.
    pub body: B,

    /// Headers associated with this request.
    pub headers: H,
}

impl<B: Body> From<B> for Request<B> {
    fn from(body: B) -> Self {
        Self {
            body,
            headers: NoHeaders,
        }
    }
}

/// Handler response.
#[derive(Clone, Debug)]
pub struct Response<T> {
    /// Response HTTP status code.
    pub status: StatusCode,

    /// The endpoint-specific response.
    pub body: T,
}

impl<T> From<T> for Response<T> {
    fn from(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }
}

impl<T> Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

/// Request handler.
///
/// Implemented for each `Request<XxxRequest>` so the request can be
/// dispatched by [`crate::handle`].
pub trait Handler<U, P> {
    /// The error type returned by the handler.
    type Error;

    /// Process the request. `base_url` is the façade's externally visible
    /// base URL, used whenever a URL handed back to the caller must point at
    /// the façade.
    fn handle(
        self, base_url: &str, provider: &P,
    ) -> impl Future<Output = Result<impl Into<Response<U>>, Self::Error>> + Send;
}

/// Marker trait for request bodies.
pub trait Body: Clone + Debug + Send + Sync {}

/// Marker trait for request headers.
pub trait Headers: Clone + Debug + Send + Sync {}

/// Empty headers for handlers that do not need any.
#[derive(Clone, Debug)]
pub struct NoHeaders;
impl Headers for NoHeaders {}

/// Raw inbound headers, forwarded to an upstream service.
#[derive(Clone, Debug, Default)]
pub struct ForwardHeaders(pub HeaderMap);
impl Headers for ForwardHeaders {}

impl From<HeaderMap> for ForwardHeaders {
    fn from(headers: HeaderMap) -> Self {
        Self(headers)
    }
}
