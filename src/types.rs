use crate::{error::Result, WizardError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One position in the fixed, ordered workflow.
///
/// The derived ordering is the workflow order; advancement is strictly
/// forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Ideas,
    Title,
    Thumbnail,
    Hook,
    Summary,
}

impl Stage {
    /// All stages in workflow order.
    pub const ALL: [Stage; 5] = [
        Stage::Ideas,
        Stage::Title,
        Stage::Thumbnail,
        Stage::Hook,
        Stage::Summary,
    ];

    /// The following stage, or `None` at `Summary`.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Ideas => Some(Stage::Title),
            Stage::Title => Some(Stage::Thumbnail),
            Stage::Thumbnail => Some(Stage::Hook),
            Stage::Hook => Some(Stage::Summary),
            Stage::Summary => None,
        }
    }

    /// 1-based step number.
    pub fn step_number(self) -> usize {
        self as usize + 1
    }

    /// Whether this stage has a generation call.
    pub fn is_generative(self) -> bool {
        self != Stage::Summary
    }

    /// Stage whose selection must be made before this stage can generate.
    pub fn prerequisite(self) -> Option<Stage> {
        match self {
            Stage::Title => Some(Stage::Ideas),
            Stage::Thumbnail | Stage::Hook => Some(Stage::Title),
            Stage::Ideas | Stage::Summary => None,
        }
    }

    /// HTTP path of the generation endpoint.
    pub fn endpoint(self) -> Option<&'static str> {
        match self {
            Stage::Ideas => Some("/api/generate/ideas"),
            Stage::Title => Some("/api/generate/title"),
            Stage::Thumbnail => Some("/api/generate/thumbnail"),
            Stage::Hook => Some("/api/generate/hook"),
            Stage::Summary => None,
        }
    }

    /// Name of the candidate array in a success envelope.
    pub fn response_field(self) -> Option<&'static str> {
        match self {
            Stage::Ideas => Some("ideas"),
            Stage::Title => Some("titles"),
            Stage::Thumbnail => Some("thumbnail_texts"),
            Stage::Hook => Some("hooks"),
            Stage::Summary => None,
        }
    }

    /// The thing chosen at this stage, with its article ("an idea").
    pub(crate) fn noun(self) -> &'static str {
        match self {
            Stage::Ideas => "an idea",
            Stage::Title => "a title",
            Stage::Thumbnail => "a thumbnail text",
            Stage::Hook => "a hook",
            Stage::Summary => "a summary",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Stage::Ideas => "ideas",
            Stage::Title => "title",
            Stage::Thumbnail => "thumbnail",
            Stage::Hook => "hook",
            Stage::Summary => "summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| WizardError::InvalidConfig(format!("unknown stage '{}'", s)))
    }
}

/// Tone passed through to every generation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Engaging,
    Professional,
    Funny,
    Educational,
    Dramatic,
    Casual,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Engaging,
        Tone::Professional,
        Tone::Funny,
        Tone::Educational,
        Tone::Dramatic,
        Tone::Casual,
    ];

    /// Wire id sent to the generation service.
    pub fn id(self) -> &'static str {
        match self {
            Tone::Engaging => "engaging",
            Tone::Professional => "professional",
            Tone::Funny => "funny",
            Tone::Educational => "educational",
            Tone::Dramatic => "dramatic",
            Tone::Casual => "casual",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tone {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.id() == wanted)
            .ok_or_else(|| WizardError::InvalidConfig(format!("unknown tone '{}'", s)))
    }
}

/// Output language tag. Carried through to the service; no translation here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Polish,
}

impl Language {
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Polish => "Polish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "polish" | "pl" => Ok(Language::Polish),
            _ => Err(WizardError::InvalidConfig(format!(
                "unknown language '{}'",
                s
            ))),
        }
    }
}

/// Controller status exposed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    /// A generation call is in flight.
    Loading,
    /// The last generation call failed.
    Error { message: String },
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }

    /// Message of the last failure, if the status is `Error`.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Status::Error { message } => Some(message),
            _ => None,
        }
    }
}
