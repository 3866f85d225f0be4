//! # Content Wizard
//!
//! Step wizard state machine for a fixed content-production workflow:
//! **idea → title → thumbnail text → hook → summary**. Each generative step
//! asks an external service for candidate options; the user picks one before
//! the next step can generate.
//!
//! Rendering belongs to your presentation layer. This crate tracks where the
//! workflow is, what has been generated and chosen, and what may happen next.
//!
//! ## Core Concepts
//!
//! - **[`StepController`]** — the state machine. `generate()` checks the
//!   guard, calls the gateway once, and advances only on success;
//!   `select()` records a choice against the loaded candidates.
//! - **[`SelectionState`]** — pure per-stage record of candidates and
//!   selections plus topic, tone, and language.
//! - **[`RequestBuilder`]** — maps the current stage and state to a
//!   [`GenerationRequest`].
//! - **[`GenerationGateway`]** — object-safe boundary to the generation
//!   service. Built-ins: [`HttpGateway`], [`MockGateway`].
//! - **[`EventHandler`](events::EventHandler)** — optional hook for UI updates.
//!
//! ## Quick Start
//!
//! ```no_run
//! use content_wizard::{Stage, StepController, WizardConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WizardConfig::from_env()?;
//!     let wizard = StepController::from_config(&config)?;
//!     wizard.set_topic("home espresso");
//!
//!     wizard.generate().await?;
//!     let ideas = wizard.snapshot().state.ideas.unwrap_or_default();
//!     wizard.select(Stage::Ideas, &ideas[0])?;
//!     wizard.generate().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod gateway;
pub mod request;
pub mod state;
pub mod types;

pub use config::WizardConfig;
pub use controller::{StepController, WizardSnapshot};
pub use error::{FailureKind, GenerationFailure, Result, WizardError};
pub use gateway::{GenerationGateway, HttpGateway, MockGateway};
pub use request::{GenerationRequest, RequestBuilder, RequestPayload};
pub use state::{ContentSummary, SelectionState};
pub use types::{Language, Stage, Status, Tone};
