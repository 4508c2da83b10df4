//! Payment-provider webhook intake.
//!
//! # Responsibilities
//! - Capture the exact byte sequence of the event body before anything
//!   parses it
//! - Pair it with the provider's signature header
//! - Hand both to the externally-defined verifier (the CMS upstream) and
//!   relay its answer
//!
//! # Design Decisions
//! - Signature verification never happens here: it needs the provider
//!   secret, which only the verifier holds
//! - The body is treated as opaque bytes end to end; it does not have to
//!   be valid JSON to pass through

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::Response,
};

use crate::http::server::AppState;

/// A webhook event as received: the unparsed body plus the signature that
/// covers it. Both stay together for the lifetime of the request.
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    /// The exact bytes the provider sent.
    pub raw_body: Bytes,
    /// Provider signature over those bytes, if present.
    pub signature: Option<HeaderValue>,
}

impl WebhookRequest {
    /// Capture an event from the inbound request parts.
    pub fn capture(headers: &HeaderMap, signature_header: &str, body: Bytes) -> Self {
        Self {
            raw_body: body,
            signature: headers.get(signature_header).cloned(),
        }
    }
}

/// Handler behind the webhook intake path.
///
/// `Bytes` hands us the body without interpretation; the capture happens
/// before any JSON layer could touch the stream.
pub async fn stripe_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let event = WebhookRequest::capture(&headers, &state.webhook.signature_header, body);

    tracing::debug!(
        bytes = event.raw_body.len(),
        signed = event.signature.is_some(),
        "Webhook event received"
    );

    state
        .cms
        .relay_payment_event(&state.webhook.forward_path, event, &headers)
        .await
}
