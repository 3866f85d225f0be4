//! Event hooks for the presentation layer.
//!
//! Provides an optional, non-intrusive way to observe the wizard. The
//! controller emits events when a generation starts and settles, when the
//! stage advances, and when the user's choices change. Implement
//! [`EventHandler`] to refresh a UI, record analytics, or drive a spinner.

use crate::types::{Language, Stage, Tone};
use std::sync::Arc;

/// Events emitted by the [`StepController`](crate::controller::StepController).
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// A generation call was issued.
    GenerationStarted {
        stage: Stage,
        /// Gateway name (e.g. `"http"`, `"mock"`).
        gateway: &'static str,
    },
    /// A generation call settled.
    GenerationFinished {
        stage: Stage,
        /// Whether the call succeeded.
        ok: bool,
        /// Number of candidates loaded (0 on failure).
        candidates: usize,
    },
    /// The workflow moved forward one stage.
    StageAdvanced { from: Stage, to: Stage },
    /// The user picked a candidate.
    SelectionMade { stage: Stage, item: String },
    /// Topic, tone, or language changed.
    InputsChanged {
        topic: String,
        tone: Tone,
        language: Language,
    },
}

/// Handler for wizard events.
///
/// This is entirely optional -- the controller works without one.
///
/// # Example
///
/// ```
/// use content_wizard::events::{EventHandler, WizardEvent};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: WizardEvent) {
///         match event {
///             WizardEvent::GenerationStarted { stage, .. } => println!("generating {}...", stage),
///             WizardEvent::StageAdvanced { to, .. } => println!("now at step {}", to.step_number()),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the controller emits an event.
    fn on_event(&self, event: WizardEvent);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: WizardEvent) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use content_wizard::events::{FnEventHandler, WizardEvent};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: WizardEvent| {
///     if let WizardEvent::StageAdvanced { from, to } = event {
///         println!("{} -> {}", from, to);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(WizardEvent) + Send + Sync>(pub F);

impl<F: Fn(WizardEvent) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: WizardEvent) {
        (self.0)(event);
    }
}
