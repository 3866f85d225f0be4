//! Gateway trait and response envelope parsing.
//!
//! The [`GenerationGateway`] trait is the boundary to the external
//! generation service. One `invoke` is one round trip; gateways never
//! retry on their own. Built-in implementations: [`HttpGateway`],
//! [`MockGateway`].
//!
//! ## Architecture
//!
//! ```text
//! StepController ──► RequestBuilder ──► GenerationRequest
//!                                              │
//!                              GenerationGateway::invoke()
//!                                              │
//!                               ┌──────────────┴──────────────┐
//!                          HttpGateway                    MockGateway
//!                   POST /api/generate/{stage}        scripted responses
//! ```

pub mod http;
pub mod mock;

pub use http::{HttpGateway, HttpGatewayBuilder};
pub use mock::MockGateway;

use crate::error::GenerationFailure;
use crate::request::GenerationRequest;
use crate::types::Stage;
use async_trait::async_trait;
use serde_json::Value;

/// Abstraction over the generation service.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn GenerationGateway>`.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Perform one generation round trip, returning the candidate strings.
    async fn invoke(
        &self,
        request: &GenerationRequest,
    ) -> std::result::Result<Vec<String>, GenerationFailure>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Extract the candidate list for `stage` from a success envelope.
///
/// The envelope must carry `"status": "success"` and the stage's array field
/// (`ideas`, `titles`, `thumbnail_texts`, `hooks`) holding strings.
pub fn parse_envelope(
    stage: Stage,
    envelope: &Value,
) -> std::result::Result<Vec<String>, GenerationFailure> {
    let status = envelope.get("status").and_then(Value::as_str);
    if status != Some("success") {
        return Err(GenerationFailure::Rejected {
            status: status.unwrap_or("<missing>").to_string(),
            message: envelope
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    let field = stage
        .response_field()
        .ok_or_else(|| GenerationFailure::Decode(format!("stage '{}' has no candidates", stage)))?;

    match envelope.get(field) {
        None | Some(Value::Null) => Err(GenerationFailure::MissingField { field }),
        Some(items) => Ok(serde_json::from_value(items.clone())?),
    }
}
