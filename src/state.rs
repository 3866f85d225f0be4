//! Per-workflow selection record.
//!
//! [`SelectionState`] holds the generated candidates and the user's choice
//! for each generative stage, plus the workflow-scoped inputs (topic, tone,
//! language). Its operations are pure: they take `&self` and return a new
//! record, so they can be tested without a gateway or controller.

use crate::{
    error::Result,
    types::{Language, Stage, Tone},
    WizardError,
};
use serde::{Deserialize, Serialize};

/// Candidates and selections for one workflow instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub topic: String,
    pub tone: Tone,
    pub language: Language,

    pub ideas: Option<Vec<String>>,
    pub selected_idea: Option<String>,
    pub titles: Option<Vec<String>>,
    pub selected_title: Option<String>,
    pub thumbnail_texts: Option<Vec<String>>,
    pub selected_thumbnail: Option<String>,
    pub hooks: Option<Vec<String>>,
    pub selected_hook: Option<String>,
}

/// The chosen values shown on the summary step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub idea: Option<String>,
    pub title: Option<String>,
    pub thumbnail_text: Option<String>,
    pub hook: Option<String>,
}

impl ContentSummary {
    /// Whether every stage has a chosen value.
    pub fn is_complete(&self) -> bool {
        self.idea.is_some()
            && self.title.is_some()
            && self.thumbnail_text.is_some()
            && self.hook.is_some()
    }
}

impl SelectionState {
    /// Empty state for a new workflow.
    pub fn new(topic: impl Into<String>, tone: Tone, language: Language) -> Self {
        Self {
            topic: topic.into(),
            tone,
            language,
            ..Self::default()
        }
    }

    /// Current candidates for `stage`, if any have been generated.
    pub fn candidates(&self, stage: Stage) -> Option<&[String]> {
        match stage {
            Stage::Ideas => self.ideas.as_deref(),
            Stage::Title => self.titles.as_deref(),
            Stage::Thumbnail => self.thumbnail_texts.as_deref(),
            Stage::Hook => self.hooks.as_deref(),
            Stage::Summary => None,
        }
    }

    /// The user's choice for `stage`, if made.
    pub fn selection(&self, stage: Stage) -> Option<&str> {
        match stage {
            Stage::Ideas => self.selected_idea.as_deref(),
            Stage::Title => self.selected_title.as_deref(),
            Stage::Thumbnail => self.selected_thumbnail.as_deref(),
            Stage::Hook => self.selected_hook.as_deref(),
            Stage::Summary => None,
        }
    }

    /// Record `item` as the selection for `stage`.
    ///
    /// Fails with [`WizardError::InvalidSelection`] unless `item` is one of
    /// the stage's currently loaded candidates.
    pub fn with_selection(&self, stage: Stage, item: &str) -> Result<Self> {
        let is_candidate = self
            .candidates(stage)
            .is_some_and(|items| items.iter().any(|c| c == item));
        if !is_candidate {
            return Err(WizardError::InvalidSelection {
                stage,
                item: item.to_string(),
            });
        }

        let mut next = self.clone();
        if let Some((_, selected)) = next.slot_mut(stage) {
            *selected = Some(item.to_string());
        }
        Ok(next)
    }

    /// Replace `stage`'s candidates and clear its selection.
    ///
    /// The selection is cleared even when the old value appears among the
    /// new candidates. `Summary` has no candidates, so it is returned as-is.
    pub fn with_candidates(&self, stage: Stage, items: Vec<String>) -> Self {
        let mut next = self.clone();
        if let Some((candidates, selected)) = next.slot_mut(stage) {
            *candidates = Some(items);
            *selected = None;
        }
        next
    }

    /// Whether `stage` may invoke generation given the current selections.
    pub fn is_prerequisite_satisfied(&self, stage: Stage) -> bool {
        match stage.prerequisite() {
            Some(required) => self.selection(required).is_some(),
            None => stage.is_generative(),
        }
    }

    /// The chosen values for the summary step.
    pub fn summary(&self) -> ContentSummary {
        ContentSummary {
            idea: self.selected_idea.clone(),
            title: self.selected_title.clone(),
            thumbnail_text: self.selected_thumbnail.clone(),
            hook: self.selected_hook.clone(),
        }
    }

    fn slot_mut(&mut self, stage: Stage) -> Option<(&mut Option<Vec<String>>, &mut Option<String>)> {
        match stage {
            Stage::Ideas => Some((&mut self.ideas, &mut self.selected_idea)),
            Stage::Title => Some((&mut self.titles, &mut self.selected_title)),
            Stage::Thumbnail => Some((&mut self.thumbnail_texts, &mut self.selected_thumbnail)),
            Stage::Hook => Some((&mut self.hooks, &mut self.selected_hook)),
            Stage::Summary => None,
        }
    }
}
