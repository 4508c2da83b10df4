//! Remote-procedure namespace exposed under `/api/trpc`.
//!
//! # Data Flow
//! ```text
//! ANY /api/trpc/{procedure}
//!     → rpc_handler (build context from request head)
//!     → router.rs (table lookup, call procedure)
//!     → result envelope {"result":{"data":…}}
//!       or error envelope {"error":{…}} on unknown procedure
//! ```
//!
//! # Design Decisions
//! - Procedure table compiled once at startup, immutable at runtime
//! - One placeholder query only; no validation, no state

pub mod router;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub use router::{app_router, RpcContext, RpcError, RpcRouter};

use crate::http::server::AppState;

/// Handler behind `/api/trpc/{procedure}`.
pub async fn rpc_handler(
    State(state): State<AppState>,
    Path(procedure): Path<String>,
    request: Request<Body>,
) -> Response {
    let (head, _body) = request.into_parts();
    let ctx = RpcContext { head };

    match state.rpc.dispatch(&procedure, &ctx) {
        Ok(data) => Json(json!({ "result": { "data": data } })).into_response(),
        Err(RpcError::NotFound(name)) => {
            tracing::debug!(procedure = %name, "Unknown procedure");
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": {
                        "code": "NOT_FOUND",
                        "message": format!("No procedure `{name}` on this router"),
                    }
                })),
            )
                .into_response()
        }
    }
}
