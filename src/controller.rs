//! The step wizard state machine.
//!
//! [`StepController`] owns one workflow instance: the current [`Stage`], the
//! [`Status`] of the last generation, and the [`SelectionState`]. The
//! presentation layer forwards intents (`select`, `generate`, input changes)
//! and reads back [`WizardSnapshot`]s.
//!
//! `generate()` holds the state lock only to check guards and to apply the
//! outcome, never across the gateway call, so `select()` and the input
//! setters keep working while a call is in flight.

use crate::{
    config::WizardConfig,
    error::Result,
    events::{emit, EventHandler, WizardEvent},
    gateway::{GenerationGateway, HttpGateway},
    request::RequestBuilder,
    state::{ContentSummary, SelectionState},
    types::{Language, Stage, Status, Tone},
    WizardError,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Read-only view of the workflow for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardSnapshot {
    pub stage: Stage,
    pub status: Status,
    pub state: SelectionState,
}

impl WizardSnapshot {
    /// The chosen values, once the workflow has reached `Summary`.
    pub fn summary(&self) -> Option<ContentSummary> {
        (self.stage == Stage::Summary).then(|| self.state.summary())
    }
}

#[derive(Debug)]
struct Inner {
    stage: Stage,
    status: Status,
    state: SelectionState,
}

/// Drives one workflow instance through ideas → title → thumbnail → hook → summary.
///
/// # Example
///
/// ```
/// use content_wizard::{MockGateway, Stage, StepController};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let gateway = Arc::new(MockGateway::fixed(vec!["Idea A".into(), "Idea B".into()]));
/// let wizard = StepController::new(gateway);
/// wizard.set_topic("home espresso");
///
/// assert_eq!(wizard.generate().await.unwrap(), Stage::Title);
/// wizard.select(Stage::Ideas, "Idea A").unwrap();
/// # });
/// ```
pub struct StepController {
    gateway: Arc<dyn GenerationGateway>,
    inner: Mutex<Inner>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl std::fmt::Debug for StepController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("StepController")
            .field("gateway", &self.gateway.name())
            .field("stage", &inner.stage)
            .field("status", &inner.status)
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

impl StepController {
    /// Start a fresh workflow at `(Ideas, Idle)` with default inputs.
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self {
            gateway,
            inner: Mutex::new(Inner {
                stage: Stage::Ideas,
                status: Status::Idle,
                state: SelectionState::default(),
            }),
            event_handler: None,
        }
    }

    /// Start a workflow backed by the HTTP gateway described by `config`.
    pub fn from_config(config: &WizardConfig) -> Result<Self> {
        let gateway = HttpGateway::from_config(config)?;
        let controller = Self::new(Arc::new(gateway));
        {
            let mut inner = controller.lock();
            inner.state.tone = config.tone;
            inner.state.language = config.language;
        }
        Ok(controller)
    }

    /// Set the event handler.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn current_stage(&self) -> Stage {
        self.lock().stage
    }

    pub fn status(&self) -> Status {
        self.lock().status.clone()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let inner = self.lock();
        WizardSnapshot {
            stage: inner.stage,
            status: inner.status.clone(),
            state: inner.state.clone(),
        }
    }

    pub fn set_topic(&self, topic: impl Into<String>) {
        self.update_inputs(|state| state.topic = topic.into());
    }

    pub fn set_tone(&self, tone: Tone) {
        self.update_inputs(|state| state.tone = tone);
    }

    pub fn set_language(&self, language: Language) {
        self.update_inputs(|state| state.language = language);
    }

    /// Record `item` as the selection for `stage`.
    ///
    /// Does not move the workflow. Allowed while a generation is in flight.
    pub fn select(&self, stage: Stage, item: &str) -> Result<()> {
        {
            let mut inner = self.lock();
            let next = inner.state.with_selection(stage, item).inspect_err(|_| {
                debug!(%stage, item, "rejected selection outside current candidates");
            })?;
            inner.state = next;
        }
        debug!(%stage, item, "selection recorded");
        emit(
            &self.event_handler,
            WizardEvent::SelectionMade {
                stage,
                item: item.to_string(),
            },
        );
        Ok(())
    }

    /// Generate candidates for the current stage and advance on success.
    ///
    /// Returns the new stage. On gateway failure, the stage and selections
    /// are left as they were and the status becomes [`Status::Error`];
    /// calling again reissues the same request.
    pub async fn generate(&self) -> Result<Stage> {
        let request = {
            let mut inner = self.lock();
            if inner.status.is_loading() {
                return Err(WizardError::AlreadyInProgress);
            }
            let stage = inner.stage;
            if !stage.is_generative() {
                return Err(WizardError::WorkflowComplete);
            }
            let missing = || WizardError::PrerequisiteMissing {
                stage,
                requires: stage.prerequisite().unwrap_or(stage),
            };
            if !inner.state.is_prerequisite_satisfied(stage) {
                debug!(%stage, "generation blocked on missing selection");
                return Err(missing());
            }
            let request = RequestBuilder::build(stage, &inner.state).ok_or_else(missing)?;
            inner.status = Status::Loading;
            request
        };
        let stage = request.stage;
        let mut in_flight = InFlight {
            inner: &self.inner,
            settled: false,
        };

        debug!(%stage, gateway = self.gateway.name(), payload = ?request.payload, "issuing generation request");
        emit(
            &self.event_handler,
            WizardEvent::GenerationStarted {
                stage,
                gateway: self.gateway.name(),
            },
        );

        let outcome = self.gateway.invoke(&request).await;
        in_flight.settle();

        match outcome {
            Ok(candidates) => {
                let count = candidates.len();
                let next = stage.next().unwrap_or(stage);
                {
                    let mut inner = self.lock();
                    inner.state = inner.state.with_candidates(stage, candidates);
                    inner.status = Status::Idle;
                    inner.stage = next;
                }
                info!(from = %stage, to = %next, candidates = count, "stage advanced");
                emit(
                    &self.event_handler,
                    WizardEvent::GenerationFinished {
                        stage,
                        ok: true,
                        candidates: count,
                    },
                );
                emit(
                    &self.event_handler,
                    WizardEvent::StageAdvanced {
                        from: stage,
                        to: next,
                    },
                );
                Ok(next)
            }
            Err(failure) => {
                self.lock().status = Status::Error {
                    message: failure.to_string(),
                };
                warn!(%stage, kind = ?failure.kind(), error = %failure, "generation failed");
                emit(
                    &self.event_handler,
                    WizardEvent::GenerationFinished {
                        stage,
                        ok: false,
                        candidates: 0,
                    },
                );
                Err(failure.into())
            }
        }
    }

    fn update_inputs(&self, apply: impl FnOnce(&mut SelectionState)) {
        let (topic, tone, language) = {
            let mut inner = self.lock();
            apply(&mut inner.state);
            (
                inner.state.topic.clone(),
                inner.state.tone,
                inner.state.language,
            )
        };
        debug!(%tone, %language, "workflow inputs changed");
        emit(
            &self.event_handler,
            WizardEvent::InputsChanged {
                topic,
                tone,
                language,
            },
        );
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Resets `Loading` to `Idle` if a `generate()` future is dropped mid-call.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.status.is_loading() {
            inner.status = Status::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, GenerationFailure};
    use crate::events::FnEventHandler;
    use crate::gateway::{parse_envelope, MockGateway};
    use crate::request::RequestPayload;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok, assert_pending, assert_ready_ok, task};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn wizard(mock: MockGateway) -> (StepController, Arc<MockGateway>) {
        let mock = Arc::new(mock);
        (StepController::new(mock.clone()), mock)
    }

    fn recording(controller: StepController) -> (StepController, Arc<Mutex<Vec<WizardEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let controller = controller.with_event_handler(Arc::new(FnEventHandler(
            move |event: WizardEvent| sink.lock().unwrap().push(event),
        )));
        (controller, seen)
    }

    #[test]
    fn test_fresh_controller_is_empty() {
        let (ctl, mock) = wizard(MockGateway::new(Vec::new()));
        assert_eq!(ctl.current_stage(), Stage::Ideas);
        assert_eq!(ctl.status(), Status::Idle);

        let snap = ctl.snapshot();
        for stage in Stage::ALL {
            assert!(snap.state.candidates(stage).is_none());
            assert!(snap.state.selection(stage).is_none());
        }
        assert!(snap.summary().is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_ideas_advances_to_title() {
        let (ctl, mock) = wizard(MockGateway::new(vec![parse_envelope(
            Stage::Ideas,
            &json!({"status": "success", "ideas": ["A", "B"]}),
        )]));
        ctl.set_topic("urban beekeeping");

        let stage = assert_ok!(ctl.generate().await);
        assert_eq!(stage, Stage::Title);

        let snap = ctl.snapshot();
        assert_eq!(snap.stage, Stage::Title);
        assert_eq!(snap.status, Status::Idle);
        assert_eq!(snap.state.ideas, Some(strings(&["A", "B"])));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].payload,
            RequestPayload::Ideas {
                topic: "urban beekeeping".into(),
                tone: Tone::Engaging,
                language: Language::English,
            }
        );
    }

    #[tokio::test]
    async fn test_title_without_idea_is_blocked() {
        let (ctl, mock) = wizard(MockGateway::fixed(strings(&["A", "B"])));
        ctl.generate().await.unwrap();
        let before = ctl.snapshot();

        let err = assert_err!(ctl.generate().await);
        assert_eq!(
            err,
            WizardError::PrerequisiteMissing {
                stage: Stage::Title,
                requires: Stage::Ideas
            }
        );
        assert_eq!(ctl.snapshot(), before);
        assert_eq!(ctl.current_stage(), Stage::Title);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_thumbnail_without_title_is_blocked() {
        let (ctl, mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A"])),
            Ok(strings(&["T1"])),
        ]));
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        ctl.generate().await.unwrap();
        assert_eq!(ctl.current_stage(), Stage::Thumbnail);
        let before = ctl.snapshot();

        let err = assert_err!(ctl.generate().await);
        assert_eq!(
            err,
            WizardError::PrerequisiteMissing {
                stage: Stage::Thumbnail,
                requires: Stage::Title
            }
        );
        assert_eq!(ctl.snapshot(), before);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_select_idea_then_generate_titles() {
        let (ctl, mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A", "B"])),
            parse_envelope(Stage::Title, &json!({"status": "success", "titles": ["T1"]})),
        ]));
        ctl.set_tone(Tone::Funny);
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();

        assert_eq!(ctl.generate().await.unwrap(), Stage::Thumbnail);

        let snap = ctl.snapshot();
        assert_eq!(snap.state.selected_idea.as_deref(), Some("A"));
        assert_eq!(snap.state.titles, Some(strings(&["T1"])));
        assert_eq!(snap.stage, Stage::Thumbnail);
        assert_eq!(
            mock.requests()[1].payload,
            RequestPayload::Title {
                idea: "A".into(),
                tone: Tone::Funny,
                language: Language::English,
            }
        );
    }

    #[tokio::test]
    async fn test_error_envelope_on_hook_leaves_state_untouched() {
        let (ctl, _mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A"])),
            Ok(strings(&["T1"])),
            Ok(strings(&["BIG"])),
            parse_envelope(Stage::Hook, &json!({"status": "error"})),
        ]));
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        ctl.generate().await.unwrap();
        ctl.select(Stage::Title, "T1").unwrap();
        ctl.generate().await.unwrap();
        assert_eq!(ctl.current_stage(), Stage::Hook);
        let before = ctl.snapshot();

        let err = assert_err!(ctl.generate().await);
        match err {
            WizardError::Generation(ref failure) => {
                assert_eq!(failure.kind(), FailureKind::MalformedResponse)
            }
            ref other => panic!("expected generation failure, got {other:?}"),
        }

        let after = ctl.snapshot();
        assert_eq!(after.stage, Stage::Hook);
        assert_eq!(after.state, before.state);
        assert!(after.state.hooks.is_none());
        assert_eq!(
            after.status,
            Status::Error {
                message: err.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_retry_reissues_same_request() {
        let (ctl, mock) = wizard(MockGateway::new(vec![
            Err(GenerationFailure::HttpStatus {
                status: 429,
                message: "rate limited".into(),
            }),
            Ok(strings(&["A"])),
        ]));
        ctl.set_topic("tides");

        let err = assert_err!(ctl.generate().await);
        assert!(matches!(err, WizardError::Generation(ref f) if f.kind() == FailureKind::TransportError));
        assert_eq!(ctl.current_stage(), Stage::Ideas);
        assert_eq!(ctl.status().error_message(), Some("HTTP 429: rate limited"));

        assert_eq!(ctl.generate().await.unwrap(), Stage::Title);
        assert_eq!(ctl.status(), Status::Idle);

        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test]
    async fn test_successful_generate_clears_stage_selection() {
        // Every call answers with the same list, so the title candidates
        // repeat the ideas; the title slot still starts unselected.
        let (ctl, _mock) = wizard(MockGateway::fixed(strings(&["A", "B"])));
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        ctl.generate().await.unwrap();

        let snap = ctl.snapshot();
        assert_eq!(snap.state.titles, Some(strings(&["A", "B"])));
        assert!(snap.state.selected_title.is_none());
        assert_eq!(snap.state.selected_idea.as_deref(), Some("A"));
    }

    #[test]
    fn test_select_unknown_item_fails_without_mutation() {
        let (ctl, _mock) = wizard(MockGateway::fixed(strings(&["A", "B"])));
        tokio_test::block_on(ctl.generate()).unwrap();
        let before = ctl.snapshot();

        let err = assert_err!(ctl.select(Stage::Ideas, "C"));
        assert_eq!(
            err,
            WizardError::InvalidSelection {
                stage: Stage::Ideas,
                item: "C".into()
            }
        );
        assert!(ctl.select(Stage::Title, "A").is_err());
        assert!(ctl.select(Stage::Summary, "A").is_err());
        assert_eq!(ctl.snapshot(), before);
    }

    #[test]
    fn test_generate_while_loading_is_rejected() {
        let (mock, gate) = MockGateway::fixed(strings(&["A", "B"])).gated();
        let (ctl, mock) = wizard(mock);

        let mut first = task::spawn(ctl.generate());
        assert_pending!(first.poll());
        assert_eq!(ctl.status(), Status::Loading);

        let err = tokio_test::block_on(ctl.generate()).unwrap_err();
        assert_eq!(err, WizardError::AlreadyInProgress);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(ctl.status(), Status::Loading);

        gate.notify_one();
        let stage = assert_ready_ok!(first.poll());
        assert_eq!(stage, Stage::Title);
        assert_eq!(ctl.status(), Status::Idle);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_select_and_inputs_allowed_while_loading() {
        let (mock, gate) = MockGateway::new(vec![Ok(strings(&["A", "B"])), Ok(strings(&["T1"]))]).gated();
        let (ctl, mock) = wizard(mock);

        gate.notify_one();
        tokio_test::block_on(ctl.generate()).unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();

        let mut titles = task::spawn(ctl.generate());
        assert_pending!(titles.poll());

        // Re-pick the idea and switch language mid-flight.
        ctl.select(Stage::Ideas, "B").unwrap();
        ctl.set_language(Language::Polish);

        gate.notify_one();
        assert_eq!(assert_ready_ok!(titles.poll()), Stage::Thumbnail);

        // The in-flight request was built before the changes.
        assert_eq!(
            mock.requests()[1].payload,
            RequestPayload::Title {
                idea: "A".into(),
                tone: Tone::Engaging,
                language: Language::English,
            }
        );
        let snap = ctl.snapshot();
        assert_eq!(snap.state.selected_idea.as_deref(), Some("B"));
        assert_eq!(snap.state.language, Language::Polish);
        assert_eq!(snap.state.titles, Some(strings(&["T1"])));
    }

    #[test]
    fn test_dropped_generation_returns_to_idle() {
        let (mock, _gate) = MockGateway::fixed(strings(&["A"])).gated();
        let (ctl, mock) = wizard(mock);

        let mut pending = task::spawn(ctl.generate());
        assert_pending!(pending.poll());
        assert_eq!(ctl.status(), Status::Loading);
        drop(pending);

        assert_eq!(ctl.status(), Status::Idle);
        assert_eq!(ctl.current_stage(), Stage::Ideas);
        assert!(ctl.snapshot().state.ideas.is_none());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_full_walkthrough_reaches_summary() {
        let (ctl, mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["Idea A", "Idea B"])),
            Ok(strings(&["Title 1", "Title 2"])),
            Ok(strings(&["WATCH THIS"])),
            Ok(strings(&["Hook 1", "Hook 2"])),
        ]));
        ctl.set_topic("rust for beginners");

        assert_eq!(ctl.generate().await.unwrap(), Stage::Title);
        ctl.select(Stage::Ideas, "Idea B").unwrap();
        assert_eq!(ctl.generate().await.unwrap(), Stage::Thumbnail);
        ctl.select(Stage::Title, "Title 2").unwrap();
        assert_eq!(ctl.generate().await.unwrap(), Stage::Hook);
        ctl.select(Stage::Thumbnail, "WATCH THIS").unwrap();
        assert_eq!(ctl.generate().await.unwrap(), Stage::Summary);

        let partial = ctl.snapshot().summary().unwrap();
        assert!(!partial.is_complete());

        // Hooks are picked on the summary step.
        ctl.select(Stage::Hook, "Hook 1").unwrap();
        let summary = ctl.snapshot().summary().unwrap();
        assert!(summary.is_complete());
        assert_eq!(summary.idea.as_deref(), Some("Idea B"));
        assert_eq!(summary.title.as_deref(), Some("Title 2"));
        assert_eq!(summary.thumbnail_text.as_deref(), Some("WATCH THIS"));
        assert_eq!(summary.hook.as_deref(), Some("Hook 1"));

        // Thumbnail and hook both key off the selected title.
        let requests = mock.requests();
        assert_eq!(requests[2].stage, Stage::Thumbnail);
        assert_eq!(requests[3].stage, Stage::Hook);
        assert_eq!(requests[2].payload, requests[3].payload);

        let err = assert_err!(ctl.generate().await);
        assert_eq!(err, WizardError::WorkflowComplete);
        assert_eq!(ctl.current_stage(), Stage::Summary);
        assert_eq!(mock.call_count(), 4);
    }

    #[tokio::test]
    async fn test_reselecting_idea_keeps_later_titles() {
        let (ctl, _mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A", "B"])),
            Ok(strings(&["T1"])),
        ]));
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        ctl.generate().await.unwrap();

        ctl.select(Stage::Ideas, "B").unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.state.titles, Some(strings(&["T1"])));
        assert_eq!(snap.stage, Stage::Thumbnail);
    }

    #[tokio::test]
    async fn test_guard_failures_keep_status() {
        let (ctl, _mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A"])),
            Err(GenerationFailure::MissingField { field: "titles" }),
        ]));
        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        assert!(ctl.generate().await.is_err());
        let status = ctl.status();
        assert!(status.error_message().is_some());

        assert!(ctl.select(Stage::Ideas, "nope").is_err());
        assert_eq!(ctl.status(), status);
    }

    #[tokio::test]
    async fn test_events_emitted_in_order() {
        let (ctl, _mock) = wizard(MockGateway::new(vec![
            Ok(strings(&["A"])),
            Err(GenerationFailure::Timeout {
                url: "http://gen".into(),
            }),
        ]));
        let (ctl, seen) = recording(ctl);

        ctl.generate().await.unwrap();
        ctl.select(Stage::Ideas, "A").unwrap();
        ctl.generate().await.unwrap_err();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                WizardEvent::GenerationStarted {
                    stage: Stage::Ideas,
                    gateway: "mock"
                },
                WizardEvent::GenerationFinished {
                    stage: Stage::Ideas,
                    ok: true,
                    candidates: 1
                },
                WizardEvent::StageAdvanced {
                    from: Stage::Ideas,
                    to: Stage::Title
                },
                WizardEvent::SelectionMade {
                    stage: Stage::Ideas,
                    item: "A".into()
                },
                WizardEvent::GenerationStarted {
                    stage: Stage::Title,
                    gateway: "mock"
                },
                WizardEvent::GenerationFinished {
                    stage: Stage::Title,
                    ok: false,
                    candidates: 0
                },
            ]
        );
    }

    #[test]
    fn test_from_config_applies_defaults() {
        let config = WizardConfig::new("http://localhost:8000")
            .with_tone(Tone::Professional)
            .with_language(Language::Polish);
        let ctl = StepController::from_config(&config).unwrap();
        let snap = ctl.snapshot();
        assert_eq!(snap.state.tone, Tone::Professional);
        assert_eq!(snap.state.language, Language::Polish);
        assert_eq!(snap.stage, Stage::Ideas);

        assert!(StepController::from_config(&WizardConfig::new("nope")).is_err());
    }
}
