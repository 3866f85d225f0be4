//! Mock gateway for testing without a live generation service.
//!
//! [`MockGateway`] returns pre-configured outcomes in order and records
//! every request it receives, so presentation layers and downstream crates
//! can drive a full workflow deterministically.
//!
//! # Example
//!
//! ```
//! use content_wizard::gateway::MockGateway;
//!
//! let mock = MockGateway::fixed(vec!["Idea A".to_string(), "Idea B".to_string()]);
//! assert_eq!(mock.call_count(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::GenerationGateway;
use crate::error::GenerationFailure;
use crate::request::GenerationRequest;

type Outcome = std::result::Result<Vec<String>, GenerationFailure>;

/// A test gateway that returns canned outcomes in order.
///
/// Cycles back to the beginning when all outcomes have been consumed.
/// With [`gated`](Self::gated), each call waits for a permit on the
/// returned [`Notify`] before answering, which holds it in flight.
#[derive(Debug)]
pub struct MockGateway {
    outcomes: Vec<Outcome>,
    index: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockGateway {
    /// Create a mock with the given outcomes.
    ///
    /// An empty list makes every call succeed with no candidates.
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Create a mock that always returns the same candidates.
    pub fn fixed(candidates: Vec<String>) -> Self {
        Self::new(vec![Ok(candidates)])
    }

    /// Create a mock that always fails with `failure`.
    pub fn failing(failure: GenerationFailure) -> Self {
        Self::new(vec![Err(failure)])
    }

    /// Hold each call until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn next_outcome(&self) -> Outcome {
        if self.outcomes.is_empty() {
            return Ok(Vec::new());
        }
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.outcomes.len();
        self.outcomes[idx].clone()
    }
}

#[async_trait]
impl GenerationGateway for MockGateway {
    async fn invoke(&self, request: &GenerationRequest) -> Outcome {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }
        self.next_outcome()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
