//! Procedure table and dispatch.

use std::collections::HashMap;

use axum::http::request::Parts;
use serde_json::Value;
use thiserror::Error;

/// Context handed to every procedure: the inbound request head.
pub struct RpcContext {
    pub head: Parts,
}

/// Dispatch errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RpcError {
    #[error("no procedure `{0}` on this router")]
    NotFound(String),
}

/// A read-only procedure.
pub type QueryFn = fn(&RpcContext) -> Result<Value, RpcError>;

/// Immutable table of named procedures.
///
/// Built once at startup and shared read-only; lookups are a plain
/// `HashMap` probe with no locking.
pub struct RpcRouter {
    procedures: HashMap<&'static str, QueryFn>,
}

impl RpcRouter {
    pub fn new() -> Self {
        Self {
            procedures: HashMap::new(),
        }
    }

    /// Register a query procedure under `name`.
    pub fn query(mut self, name: &'static str, procedure: QueryFn) -> Self {
        self.procedures.insert(name, procedure);
        self
    }

    /// Call a procedure by name.
    pub fn dispatch(&self, name: &str, ctx: &RpcContext) -> Result<Value, RpcError> {
        match self.procedures.get(name) {
            Some(procedure) => procedure(ctx),
            None => Err(RpcError::NotFound(name.to_string())),
        }
    }
}

impl Default for RpcRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// The application's procedure namespace: a single placeholder query.
pub fn app_router() -> RpcRouter {
    RpcRouter::new().query("anyApiRoute", |_ctx| {
        Ok(Value::String("Hello from API".to_string()))
    })
}
