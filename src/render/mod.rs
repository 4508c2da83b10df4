//! Server-side rendering delegate.
//!
//! # Responsibilities
//! - Carry page renders (explicit path + parsed query) to the renderer
//! - Forward everything the specific routes did not claim (catch-all)
//!
//! # Design Decisions
//! - The renderer is an upstream process; no page is produced locally
//! - Catch-all forwarding is verbatim: method, path, query, headers, body

use axum::{
    body::Body,
    extract::State,
    http::{header, uri::Authority, HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::proxy::{self, HttpClient, UpstreamError};
use crate::http::server::AppState;

/// Client for the rendering upstream.
pub struct RenderClient {
    authority: Authority,
    client: HttpClient,
}

impl RenderClient {
    pub fn new(url: &str, client: HttpClient) -> Result<Self, UpstreamError> {
        Ok(Self {
            authority: proxy::authority_of(url)?,
            client,
        })
    }

    /// Render a specific page with an already-parsed query string.
    ///
    /// Used by routes that gate or inspect a request before delegating;
    /// the query pairs are re-encoded exactly as parsed.
    pub async fn render_page(
        &self,
        page: &str,
        query: &[(String, String)],
        headers: &HeaderMap,
    ) -> Response {
        let mut target = page.to_string();
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            target.push('?');
            target.push_str(&encoded);
        }

        let uri = match proxy::upstream_uri(&self.authority, &target) {
            Ok(uri) => uri,
            Err(error) => {
                tracing::error!(page, error = %error, "Bad render target");
                return (StatusCode::BAD_GATEWAY, "Bad render target").into_response();
            }
        };

        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(request_headers) = builder.headers_mut() {
            for (name, value) in headers {
                if name != &header::HOST {
                    request_headers.insert(name.clone(), value.clone());
                }
            }
        }

        match builder.body(Body::empty()) {
            Ok(request) => proxy::send(&self.client, "render", request).await,
            Err(error) => {
                tracing::error!(page, error = %error, "Failed to build render request");
                (StatusCode::BAD_GATEWAY, "Failed to delegate render").into_response()
            }
        }
    }

    /// Forward a request to the renderer verbatim.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        proxy::forward(&self.client, &self.authority, "render", request).await
    }
}

/// Catch-all handler: everything no specific route claimed.
pub async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.render.forward(request).await
}
