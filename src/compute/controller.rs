//! Step controller - gates user actions along the synthesis sequence.
//!
//! Owns the step index, the reagent log and the reaction flags. Every action
//! either succeeds and moves the state forward, or fails with an
//! [`ActionError`] and leaves the state untouched.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{Expired, TimerHandle, TimerQueue};
use crate::schema::{Reagent, SynthesisStep, TimingConfig};

/// An action that runs for a fixed duration before the step advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimedAction {
    Stir,
    Heat,
    Filter,
    Cool,
}

impl TimedAction {
    pub const ALL: [TimedAction; 4] = [
        TimedAction::Stir,
        TimedAction::Heat,
        TimedAction::Filter,
        TimedAction::Cool,
    ];

    /// Step during which this action can be started.
    pub fn step(self) -> SynthesisStep {
        match self {
            TimedAction::Stir => SynthesisStep::Stir,
            TimedAction::Heat => SynthesisStep::Heat,
            TimedAction::Filter => SynthesisStep::Filter,
            TimedAction::Cool => SynthesisStep::Cool,
        }
    }

    pub fn duration(self, timing: &TimingConfig) -> Duration {
        match self {
            TimedAction::Stir => timing.stir(),
            TimedAction::Heat => timing.heat(),
            TimedAction::Filter => timing.filter(),
            TimedAction::Cool => timing.cool(),
        }
    }
}

impl fmt::Display for TimedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimedAction::Stir => "stirring",
            TimedAction::Heat => "heating",
            TimedAction::Filter => "filtering",
            TimedAction::Cool => "cooling",
        })
    }
}

/// Transient reaction flags plus the sticky completion flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionFlags {
    pub stirring: bool,
    pub heating: bool,
    pub filtering: bool,
    pub cooling: bool,
    /// Set when heating finishes; never cleared.
    pub complete: bool,
}

impl ReactionFlags {
    pub fn is_active(&self, action: TimedAction) -> bool {
        match action {
            TimedAction::Stir => self.stirring,
            TimedAction::Heat => self.heating,
            TimedAction::Filter => self.filtering,
            TimedAction::Cool => self.cooling,
        }
    }

    fn set(&mut self, action: TimedAction, value: bool) {
        let flag = match action {
            TimedAction::Stir => &mut self.stirring,
            TimedAction::Heat => &mut self.heating,
            TimedAction::Filter => &mut self.filtering,
            TimedAction::Cool => &mut self.cooling,
        };
        *flag = value;
    }

    /// The timed action currently running, if any.
    pub fn in_progress(&self) -> Option<TimedAction> {
        TimedAction::ALL.into_iter().find(|a| self.is_active(*a))
    }
}

/// Invalid action for the current state. Never fatal, never mutates state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Incorrect step! You should add {expected} next")]
    WrongReagent { expected: Reagent, got: Reagent },
    #[error("All reagents have already been added")]
    AllReagentsAdded,
    #[error("Add all required chemicals first")]
    MissingReagents,
    #[error("Complete the previous steps first")]
    PreviousStepIncomplete,
    #[error("Complete the reaction first")]
    ReactionIncomplete,
    #[error("Complete the filtration step first")]
    FiltrationIncomplete,
    #[error("Wait for {0} to finish")]
    ActionInProgress(TimedAction),
    #[error("No {0} is in progress")]
    NotInProgress(TimedAction),
}

/// Which interactive elements currently accept clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentState {
    pub flasks_enabled: bool,
    pub beaker_clickable: bool,
    pub funnel_enabled: bool,
    pub ice_bath_enabled: bool,
}

/// Linear step controller for the synthesis procedure.
pub struct StepController {
    step: SynthesisStep,
    reagents: Vec<Reagent>,
    flags: ReactionFlags,
    timing: TimingConfig,
    timers: TimerQueue<TimedAction>,
    pending: Option<TimerHandle>,
}

impl StepController {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            step: SynthesisStep::default(),
            reagents: Vec::with_capacity(Reagent::EXPECTED_ORDER.len()),
            flags: ReactionFlags::default(),
            timing,
            timers: TimerQueue::new(),
            pending: None,
        }
    }

    #[inline]
    pub fn step(&self) -> SynthesisStep {
        self.step
    }

    /// Reagents added so far, in order.
    #[inline]
    pub fn reagents(&self) -> &[Reagent] {
        &self.reagents
    }

    #[inline]
    pub fn flags(&self) -> ReactionFlags {
        self.flags
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.flags.complete
    }

    /// Controller clock time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Time left on the running timed action.
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.and(self.timers.time_until_next())
    }

    fn has_all_reagents(&self) -> bool {
        self.reagents.len() == Reagent::EXPECTED_ORDER.len()
    }

    /// Add a reagent to the beaker. Only the next reagent in the fixed order is
    /// accepted.
    pub fn add_reagent(&mut self, reagent: Reagent) -> Result<SynthesisStep, ActionError> {
        let Some(&expected) = Reagent::EXPECTED_ORDER.get(self.step.index()) else {
            return Err(ActionError::AllReagentsAdded);
        };
        if reagent != expected {
            return Err(ActionError::WrongReagent {
                expected,
                got: reagent,
            });
        }

        self.reagents.push(reagent);
        self.step = self.step.next();
        debug!("Added {reagent}, now at step {}", self.step);
        Ok(self.step)
    }

    /// Beaker click: stirs or heats depending on the current step.
    pub fn click_beaker(&mut self) -> Result<TimedAction, ActionError> {
        if !self.has_all_reagents() {
            return Err(ActionError::MissingReagents);
        }
        match self.step {
            SynthesisStep::Stir => self.stir().map(|_| TimedAction::Stir),
            SynthesisStep::Heat => self.heat().map(|_| TimedAction::Heat),
            _ => Err(self.busy_or(ActionError::PreviousStepIncomplete)),
        }
    }

    /// Start stirring the full beaker.
    pub fn stir(&mut self) -> Result<(), ActionError> {
        self.start_beaker_action(TimedAction::Stir)
    }

    /// Start heating. Rejected until stirring has finished.
    pub fn heat(&mut self) -> Result<(), ActionError> {
        self.start_beaker_action(TimedAction::Heat)
    }

    fn start_beaker_action(&mut self, action: TimedAction) -> Result<(), ActionError> {
        if !self.has_all_reagents() {
            return Err(ActionError::MissingReagents);
        }
        if let Some(running) = self.flags.in_progress() {
            return Err(ActionError::ActionInProgress(running));
        }
        if self.step != action.step() {
            return Err(ActionError::PreviousStepIncomplete);
        }
        self.start(action);
        Ok(())
    }

    /// Whether the Buchner funnel can be used right now.
    pub fn can_filter(&self) -> bool {
        self.step == SynthesisStep::Filter
            && self.flags.complete
            && self.flags.in_progress().is_none()
    }

    /// Whether the ice bath can be used right now.
    pub fn can_crystallize(&self) -> bool {
        self.step == SynthesisStep::Cool
            && self.flags.complete
            && self.flags.in_progress().is_none()
    }

    /// Start vacuum filtration of the finished reaction.
    pub fn filter(&mut self) -> Result<(), ActionError> {
        if self.step != SynthesisStep::Filter || !self.flags.complete {
            return Err(ActionError::ReactionIncomplete);
        }
        if let Some(running) = self.flags.in_progress() {
            return Err(ActionError::ActionInProgress(running));
        }
        self.start(TimedAction::Filter);
        Ok(())
    }

    /// Start cooling in the ice bath.
    pub fn crystallize(&mut self) -> Result<(), ActionError> {
        if self.step != SynthesisStep::Cool || !self.flags.complete {
            return Err(ActionError::FiltrationIncomplete);
        }
        if let Some(running) = self.flags.in_progress() {
            return Err(ActionError::ActionInProgress(running));
        }
        self.start(TimedAction::Cool);
        Ok(())
    }

    fn busy_or(&self, err: ActionError) -> ActionError {
        self.flags
            .in_progress()
            .map_or(err, ActionError::ActionInProgress)
    }

    fn start(&mut self, action: TimedAction) {
        let duration = action.duration(&self.timing);
        self.flags.set(action, true);
        self.pending = Some(self.timers.schedule(duration, action));
        info!("Started {action} for {}ms", duration.as_millis());
    }

    /// Finish a timed action: clear its flag and advance one step.
    ///
    /// Finishing heating marks the reaction complete.
    pub fn advance_after_timed_action(
        &mut self,
        action: TimedAction,
    ) -> Result<SynthesisStep, ActionError> {
        if !self.flags.is_active(action) {
            return Err(ActionError::NotInProgress(action));
        }
        if let Some(handle) = self.pending.take() {
            self.timers.cancel(handle);
        }

        self.flags.set(action, false);
        if action == TimedAction::Heat {
            self.flags.complete = true;
        }
        self.step = self.step.next();
        info!("Finished {action}, now at step {}", self.step);
        Ok(self.step)
    }

    /// Advance the clock and apply every timed action that finished.
    ///
    /// Each entry carries the clock time at which the action was due, which
    /// may be earlier than the clock after a long `dt`.
    pub fn advance_time(&mut self, dt: Duration) -> Vec<Expired<TimedAction>> {
        let mut finished = Vec::new();
        for expired in self.timers.advance(dt) {
            self.pending = None;
            match self.advance_after_timed_action(expired.payload) {
                Ok(_) => finished.push(expired),
                Err(e) => warn!("Dropped stale timer: {e}"),
            }
        }
        finished
    }

    /// Enabled state of each interactive element.
    pub fn equipment(&self) -> EquipmentState {
        EquipmentState {
            flasks_enabled: self.step.is_reagent_step(),
            beaker_clickable: self.has_all_reagents(),
            funnel_enabled: self.step >= SynthesisStep::Filter && self.flags.complete,
            ice_bath_enabled: self.step >= SynthesisStep::Cool && self.flags.complete,
        }
    }

    /// Abandon any running action and return to the first step.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.timers.cancel(handle);
        }
        self.step = SynthesisStep::default();
        self.reagents.clear();
        self.flags = ReactionFlags::default();
        debug!("Controller reset");
    }
}
