//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are plain data. `PlacesClient` builds an
//! `HttpRequest`, hands it to whatever `Transport` it was constructed with,
//! and interprets the `HttpResponse` that comes back. Callers that want to do
//! their own I/O can skip the transport entirely and pair the client's
//! `build_*` methods with `PlacesClient::parse_response`.
//!
//! Every call to the places API is a `POST` with a JSON body, so the request
//! type carries no method.

use std::future::Future;

use crate::error::TransportError;

pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_CLIENT: &str = "X-BingApis-SDK-Client";
pub const HEADER_CLIENT_VERSION: &str = "X-BingApis-SDK-ClientVersion";
pub const HEADER_CLIENT_REQUEST_ID: &str = "X-BingApis-SDK-ClientRequestId";
pub const HEADER_IDENTITY: &str = "X-BingApis-SDK-Identity";

pub const CLIENT_NAME: &str = "bing-places-rust";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A `POST` request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL: active base endpoint plus operation path.
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Serialized JSON envelope.
    pub body: String,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok` data; only failures
/// that produced no response at all (connection, TLS, I/O) belong in `Err`.
/// The client makes exactly one attempt per call and imposes no timeout, so
/// any such policy lives in the implementation.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
