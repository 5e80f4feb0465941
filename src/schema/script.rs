//! Walkthrough scripts: a sequence of user actions separated by waits.
//!
//! Scripts drive the native CLI and headless tests the same way a user drives
//! the browser page, one click at a time.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{LoadError, Reagent};

/// A single user interaction with the lab bench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UserAction {
    /// Click a reagent flask.
    AddReagent { reagent: Reagent },
    /// Click the beaker (stir or heat, depending on the step).
    ClickBeaker,
    /// Click the Buchner funnel.
    Filter,
    /// Click the ice bath.
    Crystallize,
    /// Click any element to show its details in the info panel.
    Inspect { name: String },
}

/// An action followed by a pause before the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub action: UserAction,
    /// Time to let pass after the action, in milliseconds.
    #[serde(default)]
    pub wait_ms: u64,
}

impl ScriptStep {
    pub fn new(action: UserAction, wait_ms: u64) -> Self {
        Self { action, wait_ms }
    }

    #[inline]
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// Ordered list of scripted interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabScript {
    pub steps: Vec<ScriptStep>,
}

impl Default for LabScript {
    /// The correct procedure, with waits long enough for every timed action
    /// under the default timings.
    fn default() -> Self {
        let mut steps: Vec<ScriptStep> = Reagent::EXPECTED_ORDER
            .into_iter()
            .map(|reagent| ScriptStep::new(UserAction::AddReagent { reagent }, 1000))
            .collect();

        steps.extend([
            ScriptStep::new(UserAction::ClickBeaker, 3100),
            ScriptStep::new(UserAction::ClickBeaker, 3100),
            ScriptStep::new(
                UserAction::Inspect {
                    name: "Aspirin".to_string(),
                },
                0,
            ),
            ScriptStep::new(UserAction::Filter, 1600),
            ScriptStep::new(UserAction::Crystallize, 4000),
        ]);

        Self { steps }
    }
}

impl LabScript {
    /// Parse a script from JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a script from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Sum of all waits.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(ScriptStep::wait).sum()
    }
}
