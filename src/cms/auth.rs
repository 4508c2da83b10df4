//! Authentication middleware backed by the CMS session capability.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::http::server::AppState;

/// Identity the CMS attaches to a request.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Shape of the CMS session endpoint's answer.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionEnvelope {
    #[serde(default)]
    pub user: Option<AuthenticatedUser>,
}

/// Resolve the caller's identity and attach it as a request extension.
///
/// The request always proceeds: routes behind this middleware decide for
/// themselves what an absent identity means.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(user) = state.cms.current_user(request.headers()).await {
        tracing::debug!(user = %user.id, "Authenticated request");
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}
