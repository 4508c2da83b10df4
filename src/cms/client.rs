//! HTTP client for the CMS upstream.

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Authority, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::cms::auth::{AuthenticatedUser, SessionEnvelope};
use crate::http::proxy::{self, HttpClient, UpstreamError};
use crate::http::server::AppState;
use crate::webhooks::WebhookRequest;

/// Session endpoint answering "who is this request".
const SESSION_PATH: &str = "/api/users/me";

/// Admin interface mount on the CMS.
const ADMIN_PATH: &str = "/admin";

/// Largest session response the client will read.
const SESSION_BODY_LIMIT: usize = 64 * 1024;

/// Client for the content-management backend.
///
/// Owns nothing but the upstream address and the shared connection pool;
/// users, sessions, and payment-event verification all live on the other
/// side of it.
pub struct CmsClient {
    authority: Authority,
    client: HttpClient,
}

impl CmsClient {
    pub fn new(url: &str, client: HttpClient) -> Result<Self, UpstreamError> {
        Ok(Self {
            authority: proxy::authority_of(url)?,
            client,
        })
    }

    /// URL of the admin interface, for the startup log.
    pub fn admin_url(&self) -> String {
        format!("http://{}{}", self.authority, ADMIN_PATH)
    }

    /// Probe the CMS once at startup. Any transport failure is fatal; an
    /// HTTP error status still proves the upstream is there.
    pub async fn init(&self) -> Result<(), UpstreamError> {
        let uri = proxy::upstream_uri(&self.authority, ADMIN_PATH).map_err(|e| {
            UpstreamError::InvalidUrl {
                url: self.admin_url(),
                reason: e.to_string(),
            }
        })?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| UpstreamError::InvalidUrl {
                url: self.admin_url(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|source| UpstreamError::Unreachable {
                upstream: "cms",
                source,
            })?;

        tracing::info!(
            status = %response.status(),
            admin_url = %self.admin_url(),
            "CMS initialized"
        );
        Ok(())
    }

    /// Ask the CMS who the caller is, forwarding their credentials.
    ///
    /// Returns `None` on any failure: missing session, non-2xx answer,
    /// decode problems, or an unreachable CMS.
    pub async fn current_user(&self, headers: &HeaderMap) -> Option<AuthenticatedUser> {
        let uri = proxy::upstream_uri(&self.authority, SESSION_PATH).ok()?;

        let mut builder = Request::builder().method(Method::GET).uri(uri);
        for name in [header::COOKIE, header::AUTHORIZATION] {
            if let Some(value) = headers.get(&name) {
                builder = builder.header(name.clone(), value.clone());
            }
        }

        let request = builder.body(Body::empty()).ok()?;
        let response = self.client.request(request).await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let body = Body::new(response.into_body());
        let bytes = axum::body::to_bytes(body, SESSION_BODY_LIMIT).await.ok()?;
        let envelope: SessionEnvelope = serde_json::from_slice(&bytes).ok()?;
        envelope.user
    }

    /// Forward a request to the CMS verbatim (admin interface).
    pub async fn forward(&self, request: Request<Body>) -> Response {
        proxy::forward(&self.client, &self.authority, "cms", request).await
    }

    /// Relay a captured webhook event to the CMS's verifier, byte for byte.
    ///
    /// All inbound headers except `Host` travel with it, so the signature
    /// header reaches the verifier untouched.
    pub async fn relay_payment_event(
        &self,
        forward_path: &str,
        event: WebhookRequest,
        headers: &HeaderMap,
    ) -> Response {
        let uri = match proxy::upstream_uri(&self.authority, forward_path) {
            Ok(uri) => uri,
            Err(error) => {
                tracing::error!(forward_path, error = %error, "Bad webhook forward path");
                return (StatusCode::BAD_GATEWAY, "Bad webhook forward path").into_response();
            }
        };

        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(request_headers) = builder.headers_mut() {
            for (name, value) in headers {
                if name != &header::HOST {
                    request_headers.insert(name.clone(), value.clone());
                }
            }
        }

        match builder.body(Body::from(event.raw_body)) {
            Ok(request) => proxy::send(&self.client, "cms", request).await,
            Err(error) => {
                tracing::error!(error = %error, "Failed to build webhook relay request");
                (StatusCode::BAD_GATEWAY, "Failed to relay webhook").into_response()
            }
        }
    }
}

/// Handler behind `/admin` and `/admin/{*path}`.
pub async fn admin_passthrough(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.cms.forward(request).await
}
