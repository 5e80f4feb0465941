//! Aspirin Synthesis Lab - an interactive, step-gated synthesis walkthrough.
//!
//! This crate holds all state and logic for an educational simulation of
//! aspirin synthesis: adding salicylic acid, acetic anhydride and sulfuric acid
//! in order, stirring, heating, filtering and crystallizing. The host only
//! forwards clicks, advances time and paints what the crate describes.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: Configuration, chemical reference data, steps and scripts
//! - `compute`: Step controller, timers, particle effects and the session
//! - `scene`: Presentation snapshot, canvas draw commands and presenters
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use aspirin_synthesis::{
//!     compute::SynthesisSession,
//!     schema::{Reagent, SynthesisConfig, SynthesisStep, UserAction},
//! };
//!
//! let mut session = SynthesisSession::new(SynthesisConfig::default());
//!
//! // Reagents must go in in order
//! for reagent in Reagent::EXPECTED_ORDER {
//!     session.handle(&UserAction::AddReagent { reagent }).unwrap();
//! }
//!
//! // Stir, then let the timed action finish
//! session.handle(&UserAction::ClickBeaker).unwrap();
//! session.advance(Duration::from_millis(3000));
//!
//! assert_eq!(session.step(), SynthesisStep::Heat);
//! ```

pub mod compute;
pub mod scene;
pub mod schema;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use compute::{ActionError, ParticleSystem, StepController, SynthesisSession};
pub use scene::{DrawCommand, Presenter, SceneView, TextPresenter};
pub use schema::{LabScript, Reagent, SynthesisConfig, SynthesisStep, UserAction};
