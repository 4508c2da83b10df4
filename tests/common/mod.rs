//! Shared utilities for integration testing.
//!
//! Mock upstreams stand in for the CMS and the renderer: every request
//! they receive is recorded (method, target, headers, exact body bytes)
//! and answered with a canned or programmable response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    tx: mpsc::UnboundedSender<RecordedRequest>,
    respond: Responder,
}

/// Start a mock upstream that answers everything with a fixed response.
#[allow(dead_code)]
pub async fn start_upstream(
    addr: SocketAddr,
    status: u16,
    body: &'static str,
) -> mpsc::UnboundedReceiver<RecordedRequest> {
    start_programmable_upstream(addr, move |_| (status, body.to_string())).await
}

/// Start a mock upstream whose responses depend on the request.
#[allow(dead_code)]
pub async fn start_programmable_upstream<F>(
    addr: SocketAddr,
    respond: F,
) -> mpsc::UnboundedReceiver<RecordedRequest>
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let state = MockState {
        tx,
        respond: Arc::new(respond),
    };

    let app = Router::new().fallback(record).with_state(state);
    let listener = TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    rx
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        target: parts
            .uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| parts.uri.path().to_string()),
        headers: parts
            .headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).to_string(),
                )
            })
            .collect(),
        body: bytes.to_vec(),
    };

    let (status, response_body) = (state.respond)(&recorded);
    let _ = state.tx.send(recorded);

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::OK),
        response_body,
    )
        .into_response()
}

/// Drain every request a mock has recorded so far.
#[allow(dead_code)]
pub fn drain(rx: &mut mpsc::UnboundedReceiver<RecordedRequest>) -> Vec<RecordedRequest> {
    let mut seen = Vec::new();
    while let Ok(recorded) = rx.try_recv() {
        seen.push(recorded);
    }
    seen
}
