//! Snapshot of everything the page shows outside the canvas.

use serde::Serialize;

use crate::compute::{CrystalSpeck, EquipmentState, ReactionFlags, TimedAction};
use crate::schema::{ElementInfo, InstructionStatus, Reagent, SynthesisStep};

/// An interactive element on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "reagent")]
pub enum Element {
    Flask(Reagent),
    Beaker,
    BuchnerFunnel,
    IceBath,
}

/// A CSS keyframe animation applied to an element while its action runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementAnimation {
    pub element: Element,
    pub action: TimedAction,
    /// CSS `animation` shorthand.
    pub css: &'static str,
}

impl ElementAnimation {
    pub fn for_action(action: TimedAction) -> Self {
        let (element, css) = match action {
            TimedAction::Stir => (Element::Beaker, "stirring 0.8s ease-in-out 3"),
            TimedAction::Heat => (Element::Beaker, "heating 3s ease-in-out"),
            TimedAction::Filter => (Element::BuchnerFunnel, "shake 1.5s ease-in-out"),
            TimedAction::Cool => (Element::IceBath, "pulse 2s ease-in-out"),
        };
        Self {
            element,
            action,
            css,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Error,
    Success,
}

/// A transient message toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMessage {
    pub id: u64,
    pub text: String,
    pub kind: FeedbackKind,
    /// Set once the message starts fading out.
    pub fading: bool,
}

/// A flask flying toward the beaker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransferView {
    pub reagent: Reagent,
    /// Animation progress in [0, 1].
    pub progress: f32,
}

/// What the canvas shows inside the beaker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum BeakerDisplay {
    /// Layered reagents, bottom layer first.
    Reagents(Vec<Reagent>),
    /// The reacted mixture.
    Aspirin,
    /// Crystallized product.
    Crystals(Vec<CrystalSpeck>),
}

impl Default for BeakerDisplay {
    fn default() -> Self {
        BeakerDisplay::Reagents(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstructionView {
    pub text: &'static str,
    pub status: InstructionStatus,
}

/// Non-canvas page state for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub step: SynthesisStep,
    pub step_index: usize,
    pub instructions: Vec<InstructionView>,
    pub reagents: Vec<Reagent>,
    pub flags: ReactionFlags,
    pub equipment: EquipmentState,
    pub animations: Vec<ElementAnimation>,
    pub transfers: Vec<TransferView>,
    pub feedback: Vec<FeedbackMessage>,
    pub info_panel: ElementInfo,
    pub particle_count: usize,
}

impl SceneView {
    /// Instruction list for the given current step.
    pub fn instructions_for(step: SynthesisStep) -> Vec<InstructionView> {
        SynthesisStep::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| InstructionView {
                text: s.instruction(),
                status: step.status_of(i),
            })
            .collect()
    }

    /// CSS animation currently applied to `element`, if any.
    pub fn animation_of(&self, element: Element) -> Option<&'static str> {
        self.animations
            .iter()
            .find(|a| a.element == element)
            .map(|a| a.css)
    }
}
