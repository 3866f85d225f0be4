//! Mapping from the current stage and selections to an outbound request.

use crate::{
    state::SelectionState,
    types::{Language, Stage, Tone},
};
use serde::Serialize;

/// JSON body for a generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Ideas {
        topic: String,
        tone: Tone,
        language: Language,
    },
    Title {
        idea: String,
        tone: Tone,
        language: Language,
    },
    /// Shared by the thumbnail and hook endpoints.
    FromTitle {
        title: String,
        tone: Tone,
        language: Language,
    },
}

/// A single generation call: which stage, and what to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub stage: Stage,
    pub payload: RequestPayload,
}

impl GenerationRequest {
    /// Endpoint path for this request's stage.
    pub fn path(&self) -> &'static str {
        // Requests are only built for generative stages.
        self.stage.endpoint().unwrap_or_default()
    }
}

/// Builds [`GenerationRequest`]s from controller state.
pub struct RequestBuilder;

impl RequestBuilder {
    /// Build the request for `stage`.
    ///
    /// Returns `None` for `Summary`, or when the stage's prerequisite
    /// selection is absent. The controller checks the guard first, so the
    /// second case does not occur in practice.
    pub fn build(stage: Stage, state: &SelectionState) -> Option<GenerationRequest> {
        let tone = state.tone;
        let language = state.language;
        let payload = match stage {
            Stage::Ideas => RequestPayload::Ideas {
                topic: state.topic.clone(),
                tone,
                language,
            },
            Stage::Title => RequestPayload::Title {
                idea: state.selected_idea.clone()?,
                tone,
                language,
            },
            Stage::Thumbnail | Stage::Hook => RequestPayload::FromTitle {
                title: state.selected_title.clone()?,
                tone,
                language,
            },
            Stage::Summary => return None,
        };
        Some(GenerationRequest { stage, payload })
    }
}
