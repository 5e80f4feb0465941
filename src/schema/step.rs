//! The fixed linear sequence of synthesis steps.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One stage of the procedure, in order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SynthesisStep {
    #[default]
    AddSalicylic,
    AddAceticAnhydride,
    AddSulfuric,
    Stir,
    Heat,
    Filter,
    Cool,
    Done,
}

/// Presentation status of an instruction list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionStatus {
    Completed,
    Current,
    Upcoming,
}

impl SynthesisStep {
    pub const ALL: [SynthesisStep; 8] = [
        SynthesisStep::AddSalicylic,
        SynthesisStep::AddAceticAnhydride,
        SynthesisStep::AddSulfuric,
        SynthesisStep::Stir,
        SynthesisStep::Heat,
        SynthesisStep::Filter,
        SynthesisStep::Cool,
        SynthesisStep::Done,
    ];

    /// Zero-based position in the sequence.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step. `Done` is terminal.
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(SynthesisStep::Done)
    }

    /// Whether this step consists of adding a reagent.
    #[inline]
    pub fn is_reagent_step(self) -> bool {
        self < SynthesisStep::Stir
    }

    /// Instruction text for the step list.
    pub fn instruction(self) -> &'static str {
        match self {
            SynthesisStep::AddSalicylic => "Add salicylic acid to the beaker",
            SynthesisStep::AddAceticAnhydride => "Add acetic anhydride to the beaker",
            SynthesisStep::AddSulfuric => "Add a few drops of sulfuric acid as catalyst",
            SynthesisStep::Stir => "Stir the mixture",
            SynthesisStep::Heat => "Heat the mixture in the water bath",
            SynthesisStep::Filter => "Filter the product with the Buchner funnel",
            SynthesisStep::Cool => "Cool in the ice bath to crystallize",
            SynthesisStep::Done => "Aspirin synthesis complete",
        }
    }

    /// Status of the instruction at `index` while this step is current.
    pub fn status_of(self, index: usize) -> InstructionStatus {
        match index.cmp(&self.index()) {
            std::cmp::Ordering::Less => InstructionStatus::Completed,
            std::cmp::Ordering::Equal => InstructionStatus::Current,
            std::cmp::Ordering::Greater => InstructionStatus::Upcoming,
        }
    }
}

impl fmt::Display for SynthesisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.index(), self.instruction())
    }
}
