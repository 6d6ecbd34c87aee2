pub mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ConsoleError;
use crate::models::{RunStatusReport, SummaryDocument};

/// Request/response interface to the remote assessment platform. The
/// platform itself (scan engine, storage, auth) lives behind this boundary;
/// the console only sees these four operations. Tests substitute a scripted
/// implementation.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// `GET /summary`
    async fn fetch_summary(&self) -> Result<SummaryDocument, ConsoleError>;

    /// `GET /modules/{name}` — payload shape varies by module kind, so the
    /// raw value is returned and resolved by the detail formatters.
    async fn fetch_module_detail(&self, module: &str) -> Result<Value, ConsoleError>;

    /// `POST /assessments` — returns the new run identifier.
    async fn start_assessment(&self) -> Result<String, ConsoleError>;

    /// `GET /assessments/{id}`
    async fn poll_assessment(&self, run_id: &str) -> Result<RunStatusReport, ConsoleError>;
}
