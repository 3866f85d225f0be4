use crate::types::Stage;
use thiserror::Error;

/// Errors produced by the step controller and its collaborators.
///
/// None of these are fatal: the workflow instance stays usable and the
/// caller may fix the cause and try again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    /// The item is not among the stage's currently loaded candidates.
    #[error("'{item}' is not one of the current {stage} options")]
    InvalidSelection { stage: Stage, item: String },

    /// Generation was requested before the required earlier selection was made.
    #[error("Please select {} first", .requires.noun())]
    PrerequisiteMissing {
        /// Stage whose generation was attempted.
        stage: Stage,
        /// Stage whose selection is required.
        requires: Stage,
    },

    /// A generation call is already in flight for this workflow.
    #[error("A generation request is already in progress")]
    AlreadyInProgress,

    /// The workflow reached the summary stage; nothing left to generate.
    #[error("The workflow is complete; there is nothing left to generate")]
    WorkflowComplete,

    /// The generation service call failed.
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Two-way classification of gateway failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection errors, timeouts, and non-2xx HTTP responses.
    TransportError,
    /// A 2xx response whose envelope or payload is unusable.
    MalformedResponse,
}

/// Failures surfaced by a [`GenerationGateway`](crate::gateway::GenerationGateway).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationFailure {
    /// Could not reach the service (connection refused, DNS, reset, etc.).
    #[error("Failed to reach generation service at {url}: {message}")]
    Connection { url: String, message: String },

    /// The round trip exceeded the configured timeout.
    #[error("Generation service at {url} timed out")]
    Timeout { url: String },

    /// The service answered with a non-success status code.
    #[error("HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code (e.g. 429, 500).
        status: u16,
        /// `detail` from the error body when present, else the raw body.
        message: String,
    },

    /// The envelope's `status` was not `"success"`.
    #[error("Generation service reported status '{status}'{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Rejected {
        status: String,
        message: Option<String>,
    },

    /// The expected candidate array was absent from the envelope.
    #[error("Response is missing the '{field}' field")]
    MissingField { field: &'static str },

    /// The body was not valid JSON or had the wrong shape.
    #[error("Could not decode generation response: {0}")]
    Decode(String),
}

impl GenerationFailure {
    /// Which of the two failure families this belongs to.
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationFailure::Connection { .. }
            | GenerationFailure::Timeout { .. }
            | GenerationFailure::HttpStatus { .. } => FailureKind::TransportError,
            GenerationFailure::Rejected { .. }
            | GenerationFailure::MissingField { .. }
            | GenerationFailure::Decode(_) => FailureKind::MalformedResponse,
        }
    }
}

impl From<serde_json::Error> for GenerationFailure {
    fn from(err: serde_json::Error) -> Self {
        GenerationFailure::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;
