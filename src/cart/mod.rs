//! Authenticated cart route.
//!
//! One path, one gate: `/cart` requires an identity from the CMS. Without
//! one the caller is sent to sign-in with the original destination in the
//! query; with one the render delegate takes over.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::cms::auth::{authenticate, AuthenticatedUser};
use crate::http::server::AppState;

/// Build the cart sub-router, gated by the CMS auth middleware.
pub fn setup_cart_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(cart_page))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

/// Sign-in redirect target carrying the original destination.
fn sign_in_redirect(origin: &str) -> String {
    format!("/sign-in?origin={origin}")
}

async fn cart_page(State(state): State<AppState>, request: Request<Body>) -> Response {
    if request.extensions().get::<AuthenticatedUser>().is_none() {
        return Redirect::to(&sign_in_redirect("cart")).into_response();
    }

    let query: Vec<(String, String)> = request
        .uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    state
        .render
        .render_page("/cart", &query, request.headers())
        .await
}
