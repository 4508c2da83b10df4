//! Upstream request forwarding.
//!
//! # Responsibilities
//! - Rewrite inbound URIs to target a collaborator's authority
//! - Send requests over the shared pooled client
//! - Relay upstream responses verbatim; map transport failures to 502
//! - Record per-request metrics
//!
//! # Design Decisions
//! - Responses stream through; bodies are never buffered here
//! - The server adds no retry or timeout policy of its own: what the
//!   upstream answers is what the caller gets

use std::str::FromStr;
use std::time::Instant;

use axum::{
    body::Body,
    http::{
        uri::{Authority, Scheme},
        Error as HttpError, Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use thiserror::Error;

use crate::observability::metrics;

/// Shared pooled HTTP client used for all upstream traffic.
pub type HttpClient = Client<HttpConnector, Body>;

/// Errors raised while setting up or probing an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{upstream} upstream unreachable: {source}")]
    Unreachable {
        upstream: &'static str,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
}

/// Extract the `host:port` authority from a configured upstream URL.
pub fn authority_of(url_str: &str) -> Result<Authority, UpstreamError> {
    let url = url::Url::parse(url_str).map_err(|e| UpstreamError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" {
        return Err(UpstreamError::InvalidUrl {
            url: url_str.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }

    let host = url.host_str().ok_or_else(|| UpstreamError::InvalidUrl {
        url: url_str.to_string(),
        reason: "missing host".to_string(),
    })?;

    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Authority::from_str(&authority).map_err(|e| UpstreamError::InvalidUrl {
        url: url_str.to_string(),
        reason: e.to_string(),
    })
}

/// Build an absolute URI for a path-and-query on an upstream.
pub fn upstream_uri(authority: &Authority, path_and_query: &str) -> Result<Uri, HttpError> {
    Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(authority.clone())
        .path_and_query(path_and_query)
        .build()
}

/// Rewrite an inbound request URI to point at the upstream authority,
/// preserving the original path and query.
fn rewrite_uri(uri: &Uri, authority: &Authority) -> Option<Uri> {
    let mut parts = uri.clone().into_parts();
    parts.scheme = Some(Scheme::HTTP);
    parts.authority = Some(authority.clone());
    Uri::from_parts(parts).ok()
}

/// Send an already-targeted request and relay whatever comes back.
pub async fn send(client: &HttpClient, upstream: &'static str, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();

    match client.request(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), upstream, start);
            relay(response)
        }
        Err(error) => {
            tracing::error!(upstream, error = %error, "Upstream request failed");
            metrics::record_request(&method, StatusCode::BAD_GATEWAY.as_u16(), upstream, start);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Forward an inbound request to the upstream verbatim.
pub async fn forward(
    client: &HttpClient,
    authority: &Authority,
    upstream: &'static str,
    request: Request<Body>,
) -> Response {
    let (mut parts, body) = request.into_parts();

    match rewrite_uri(&parts.uri, authority) {
        Some(uri) => parts.uri = uri,
        None => {
            tracing::warn!(upstream, uri = %parts.uri, "Unroutable request URI");
            return (StatusCode::BAD_GATEWAY, "Unroutable request URI").into_response();
        }
    }

    send(client, upstream, Request::from_parts(parts, body)).await
}

/// Convert an upstream response into an axum response, streaming the body.
fn relay(response: hyper::Response<hyper::body::Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body)).into_response()
}
