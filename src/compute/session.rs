//! Synthesis session - the single owner of all lab state.
//!
//! The host forwards clicks through [`SynthesisSession::handle`] and calls
//! [`SynthesisSession::advance`] once per frame with the elapsed time. Every
//! side effect the page needs (animations, toasts, particles, beaker drawing)
//! is derived from session state in [`SynthesisSession::view`] and
//! [`SynthesisSession::draw_commands`].

use std::time::Duration;

use log::{info, warn};
use serde::Serialize;

use super::{
    ActionError, EffectKind, Expired, ParticleSystem, StepController, TimedAction, TimerQueue,
};
use crate::scene::{
    BeakerDisplay, DrawCommand, ElementAnimation, FeedbackKind, FeedbackMessage, Presenter,
    SceneView, TransferView, frame_commands,
};
use crate::schema::{ElementInfo, Reagent, SynthesisConfig, SynthesisStep, UserAction, lookup};

/// Message shown once the product has crystallized.
pub const COMPLETION_MESSAGE: &str = "Aspirin synthesis complete!";

/// Session-level timers for transient UI elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UiTimer {
    FeedbackFade(u64),
    FeedbackRemove(u64),
    TransferDone(u64),
}

#[derive(Debug, Clone, Copy)]
struct Transfer {
    id: u64,
    reagent: Reagent,
    started: Duration,
}

/// What happened during one [`SynthesisSession::advance`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    /// Timed actions that finished this frame, in order.
    pub finished: Vec<TimedAction>,
    /// Whether particles remain after this frame's particle step.
    pub particles_alive: bool,
}

fn default_info_panel() -> ElementInfo {
    ElementInfo {
        title: "Chemical Information".to_string(),
        formula: None,
        description: Some("Click on equipment to see details"),
    }
}

/// Interactive aspirin synthesis.
pub struct SynthesisSession {
    config: SynthesisConfig,
    controller: StepController,
    particles: ParticleSystem,
    ui_timers: TimerQueue<UiTimer>,
    feedback: Vec<FeedbackMessage>,
    transfers: Vec<Transfer>,
    animations: Vec<ElementAnimation>,
    beaker: BeakerDisplay,
    info_panel: ElementInfo,
    next_id: u64,
}

impl SynthesisSession {
    /// Create a session. The configuration is assumed validated.
    pub fn new(config: SynthesisConfig) -> Self {
        let controller = StepController::new(config.timing);
        let particles = ParticleSystem::new(config.canvas, config.random_seed);
        Self {
            config,
            controller,
            particles,
            ui_timers: TimerQueue::new(),
            feedback: Vec::new(),
            transfers: Vec::new(),
            animations: Vec::new(),
            beaker: BeakerDisplay::default(),
            info_panel: default_info_panel(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    #[inline]
    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    #[inline]
    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[inline]
    pub fn step(&self) -> SynthesisStep {
        self.controller.step()
    }

    #[inline]
    pub fn beaker(&self) -> &BeakerDisplay {
        &self.beaker
    }

    #[inline]
    pub fn feedback(&self) -> &[FeedbackMessage] {
        &self.feedback
    }

    /// Whether the procedure has reached its final step.
    pub fn is_finished(&self) -> bool {
        self.controller.step() == SynthesisStep::Done
    }

    /// Whether the host still needs to call `advance` for anything to change.
    pub fn is_idle(&self) -> bool {
        self.particles.is_empty()
            && self.ui_timers.is_empty()
            && self.controller.flags().in_progress().is_none()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Apply a user interaction.
    ///
    /// Rejected actions queue an error toast and leave the lab untouched.
    pub fn handle(&mut self, action: &UserAction) -> Result<(), ActionError> {
        let result = match action {
            UserAction::AddReagent { reagent } => self.add_reagent(*reagent),
            UserAction::ClickBeaker => self.click_beaker(),
            UserAction::Filter => self.filter(),
            UserAction::Crystallize => self.crystallize(),
            UserAction::Inspect { name } => {
                self.inspect(name);
                Ok(())
            }
        };

        if let Err(err) = &result {
            warn!("Rejected {action:?}: {err}");
            let now = self.ui_timers.now();
            self.notify(err.to_string(), FeedbackKind::Error, now);
        }
        result
    }

    fn add_reagent(&mut self, reagent: Reagent) -> Result<(), ActionError> {
        self.controller.add_reagent(reagent)?;

        let id = self.next_id();
        self.transfers.push(Transfer {
            id,
            reagent,
            started: self.ui_timers.now(),
        });
        self.ui_timers
            .schedule(self.config.timing.transfer(), UiTimer::TransferDone(id));
        self.beaker = BeakerDisplay::Reagents(self.controller.reagents().to_vec());
        Ok(())
    }

    fn click_beaker(&mut self) -> Result<(), ActionError> {
        let action = self.controller.click_beaker()?;
        self.on_started(action);
        Ok(())
    }

    fn filter(&mut self) -> Result<(), ActionError> {
        self.controller.filter()?;
        self.on_started(TimedAction::Filter);
        Ok(())
    }

    fn crystallize(&mut self) -> Result<(), ActionError> {
        self.controller.crystallize()?;
        self.on_started(TimedAction::Cool);
        Ok(())
    }

    /// Show details for a chemical or piece of equipment.
    pub fn inspect(&mut self, name: &str) {
        self.info_panel = lookup(name);
    }

    fn on_started(&mut self, action: TimedAction) {
        self.animations.push(ElementAnimation::for_action(action));

        let effects = &self.config.effects;
        let emission = match action {
            TimedAction::Stir => None,
            TimedAction::Heat => Some((EffectKind::Heat, effects.heat_particles)),
            TimedAction::Filter => Some((EffectKind::Filter, effects.filter_particles)),
            TimedAction::Cool => Some((EffectKind::Crystal, effects.crystal_particles)),
        };
        if let Some((kind, count)) = emission {
            self.particles.emit(kind, count);
        }
    }

    /// Apply the effects of an action that was due at `deadline`.
    fn on_finished(&mut self, action: TimedAction, deadline: Duration) {
        self.animations.retain(|a| a.action != action);
        match action {
            TimedAction::Heat => self.beaker = BeakerDisplay::Aspirin,
            TimedAction::Cool => {
                let area = self.config.canvas.beaker_rect();
                let specks = self
                    .particles
                    .scatter_specks(area, self.config.effects.crystal_specks);
                self.beaker = BeakerDisplay::Crystals(specks);
                info!("{COMPLETION_MESSAGE}");
                self.notify(
                    COMPLETION_MESSAGE.to_string(),
                    FeedbackKind::Success,
                    deadline,
                );
            }
            TimedAction::Stir | TimedAction::Filter => {}
        }
    }

    /// Show a toast as of clock time `shown_at`.
    fn notify(&mut self, text: String, kind: FeedbackKind, shown_at: Duration) {
        let id = self.next_id();
        self.feedback.push(FeedbackMessage {
            id,
            text,
            kind,
            fading: false,
        });
        self.ui_timers.schedule_at(
            shown_at + self.config.timing.feedback(),
            UiTimer::FeedbackFade(id),
        );
    }

    fn apply_ui_timer(&mut self, expired: Expired<UiTimer>) {
        match expired.payload {
            UiTimer::FeedbackFade(id) => {
                if let Some(msg) = self.feedback.iter_mut().find(|m| m.id == id) {
                    msg.fading = true;
                }
                let remove_at = expired.deadline + self.config.timing.feedback_fade();
                self.ui_timers
                    .schedule_at(remove_at, UiTimer::FeedbackRemove(id));
            }
            UiTimer::FeedbackRemove(id) => self.feedback.retain(|m| m.id != id),
            UiTimer::TransferDone(id) => self.transfers.retain(|t| t.id != id),
        }
    }

    /// Advance time by `dt` and step particles once.
    pub fn advance(&mut self, dt: Duration) -> FrameReport {
        let mut finished = Vec::new();
        for expired in self.controller.advance_time(dt) {
            self.on_finished(expired.payload, expired.deadline);
            finished.push(expired.payload);
        }

        let mut due = self.ui_timers.advance(dt);
        // Follow-up timers may already be past due after a long frame
        while !due.is_empty() {
            for expired in due {
                self.apply_ui_timer(expired);
            }
            due = self.ui_timers.advance(Duration::ZERO);
        }

        let particles_alive = self.particles.step();
        FrameReport {
            finished,
            particles_alive,
        }
    }

    /// Snapshot of the page state.
    pub fn view(&self) -> SceneView {
        let step = self.controller.step();
        let now = self.ui_timers.now();
        let transfer_ms = self.config.timing.transfer_ms.max(1) as f32;

        SceneView {
            step,
            step_index: step.index(),
            instructions: SceneView::instructions_for(step),
            reagents: self.controller.reagents().to_vec(),
            flags: self.controller.flags(),
            equipment: self.controller.equipment(),
            animations: self.animations.clone(),
            transfers: self
                .transfers
                .iter()
                .map(|t| TransferView {
                    reagent: t.reagent,
                    progress: ((now - t.started).as_millis() as f32 / transfer_ms).min(1.0),
                })
                .collect(),
            feedback: self.feedback.clone(),
            info_panel: self.info_panel.clone(),
            particle_count: self.particles.len(),
        }
    }

    /// Canvas commands for the current frame.
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        frame_commands(&self.config.canvas, &self.beaker, self.particles.particles())
    }

    /// Hand the current frame to a presenter.
    pub fn render<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        presenter.present(&self.view(), &self.draw_commands());
    }

    /// Resize the canvas for subsequent drawing and emissions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.canvas.width = width;
        self.config.canvas.height = height;
        self.particles.resize(width, height);
    }

    /// Restart the procedure from the first step.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.particles.clear();
        self.ui_timers.clear();
        self.feedback.clear();
        self.transfers.clear();
        self.animations.clear();
        self.beaker = BeakerDisplay::default();
        self.info_panel = default_info_panel();
        info!("Session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Element, TextPresenter};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn session() -> SynthesisSession {
        SynthesisSession::new(SynthesisConfig {
            random_seed: Some(7),
            ..Default::default()
        })
    }

    fn add_all(s: &mut SynthesisSession) {
        for reagent in Reagent::EXPECTED_ORDER {
            s.handle(&UserAction::AddReagent { reagent }).unwrap();
        }
    }

    /// Advance in 16ms frames.
    fn run_for(s: &mut SynthesisSession, total: u64) {
        let mut elapsed = 0;
        while elapsed < total {
            let dt = 16.min(total - elapsed);
            s.advance(ms(dt));
            elapsed += dt;
        }
    }

    #[test]
    fn test_rejection_queues_error_toast() {
        let mut s = session();
        let err = s
            .handle(&UserAction::AddReagent {
                reagent: Reagent::AceticAnhydride,
            })
            .unwrap_err();

        assert!(matches!(err, ActionError::WrongReagent { .. }));
        assert_eq!(s.feedback().len(), 1);
        assert_eq!(s.feedback()[0].kind, FeedbackKind::Error);
        assert_eq!(
            s.feedback()[0].text,
            "Incorrect step! You should add Salicylic Acid next"
        );
        assert_eq!(s.step(), SynthesisStep::AddSalicylic);
    }

    #[test]
    fn test_feedback_lifetime() {
        let mut s = session();
        s.handle(&UserAction::ClickBeaker).unwrap_err();

        s.advance(ms(2999));
        assert!(!s.feedback()[0].fading);
        s.advance(ms(1));
        assert!(s.feedback()[0].fading);
        s.advance(ms(499));
        assert_eq!(s.feedback().len(), 1);
        s.advance(ms(1));
        assert!(s.feedback().is_empty());
    }

    #[test]
    fn test_transfer_animation() {
        let mut s = session();
        s.handle(&UserAction::AddReagent {
            reagent: Reagent::SalicylicAcid,
        })
        .unwrap();
        s.advance(ms(500));

        let view = s.view();
        assert_eq!(view.transfers.len(), 1);
        assert!((view.transfers[0].progress - 0.5).abs() < 1e-6);
        assert_eq!(
            s.beaker(),
            &BeakerDisplay::Reagents(vec![Reagent::SalicylicAcid])
        );

        s.advance(ms(500));
        assert!(s.view().transfers.is_empty());
    }

    #[test]
    fn test_heating_emits_and_switches_beaker() {
        let mut s = session();
        add_all(&mut s);
        s.handle(&UserAction::ClickBeaker).unwrap();
        assert_eq!(
            s.view().animation_of(Element::Beaker),
            Some("stirring 0.8s ease-in-out 3")
        );
        assert!(s.particles().is_empty());

        run_for(&mut s, 3000);
        assert_eq!(s.view().animation_of(Element::Beaker), None);

        s.handle(&UserAction::ClickBeaker).unwrap();
        assert_eq!(s.particles().len(), 200);
        assert!(s.view().flags.heating);

        run_for(&mut s, 3000);
        assert_eq!(s.beaker(), &BeakerDisplay::Aspirin);
        assert!(s.controller().is_complete());
        assert_eq!(s.step(), SynthesisStep::Filter);
    }

    #[test]
    fn test_full_walkthrough() {
        let mut s = session();
        add_all(&mut s);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(&mut s, 3000);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(&mut s, 3000);

        s.handle(&UserAction::Filter).unwrap();
        assert_eq!(
            s.view().animation_of(Element::BuchnerFunnel),
            Some("shake 1.5s ease-in-out")
        );
        run_for(&mut s, 1500);

        s.handle(&UserAction::Crystallize).unwrap();
        run_for(&mut s, 2000);

        assert!(s.is_finished());
        assert!(matches!(s.beaker(), BeakerDisplay::Crystals(specks) if specks.len() == 50));
        let success: Vec<_> = s
            .feedback()
            .iter()
            .filter(|m| m.kind == FeedbackKind::Success)
            .collect();
        assert_eq!(success.len(), 1);
        assert_eq!(success[0].text, COMPLETION_MESSAGE);

        // Everything winds down on its own
        run_for(&mut s, 10_000);
        assert!(s.is_idle());
        assert!(s.feedback().is_empty());
    }

    /// Run the procedure up to the cooling step.
    fn to_cool(s: &mut SynthesisSession) {
        add_all(s);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(s, 3000);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(s, 3000);
        s.handle(&UserAction::Filter).unwrap();
        run_for(s, 1500);
        assert_eq!(s.step(), SynthesisStep::Cool);
    }

    fn success_toast(s: &SynthesisSession) -> Option<&FeedbackMessage> {
        s.feedback()
            .iter()
            .find(|m| m.kind == FeedbackKind::Success)
    }

    #[test]
    fn test_filter_and_crystal_effects() {
        let mut s = session();
        add_all(&mut s);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(&mut s, 3000);
        s.handle(&UserAction::ClickBeaker).unwrap();
        run_for(&mut s, 3000);
        // Heat particles live at most 150 frames
        assert!(s.particles().is_empty());

        s.handle(&UserAction::Filter).unwrap();
        assert_eq!(s.particles().len(), 150);
        assert!(s.view().animation_of(Element::BuchnerFunnel).is_some());
        run_for(&mut s, 1500);
        assert_eq!(s.view().animation_of(Element::BuchnerFunnel), None);

        s.handle(&UserAction::Crystallize).unwrap();
        let crystals = s
            .particles()
            .particles()
            .iter()
            .filter(|p| p.speed == 0.0)
            .count();
        assert_eq!(crystals, 300);
        assert_eq!(
            s.view().animation_of(Element::IceBath),
            Some("pulse 2s ease-in-out")
        );
        run_for(&mut s, 2000);
        assert_eq!(s.view().animation_of(Element::IceBath), None);
        assert!(s.view().animations.is_empty());
    }

    #[test]
    fn test_completion_toast_at_exact_deadline() {
        let mut s = session();
        to_cool(&mut s);
        s.handle(&UserAction::Crystallize).unwrap();

        s.advance(ms(2000));
        assert!(!success_toast(&s).unwrap().fading);
        s.advance(ms(2999));
        assert!(!success_toast(&s).unwrap().fading);
        s.advance(ms(1));
        assert!(success_toast(&s).unwrap().fading);
        s.advance(ms(499));
        assert!(success_toast(&s).is_some());
        s.advance(ms(1));
        assert!(success_toast(&s).is_none());
    }

    #[test]
    fn test_completion_toast_survives_long_frame() {
        let mut s = session();
        to_cool(&mut s);
        s.handle(&UserAction::Crystallize).unwrap();

        // Cooling was due 2000ms into this frame
        let report = s.advance(ms(4000));
        assert_eq!(report.finished, vec![TimedAction::Cool]);
        assert!(s.is_finished());
        let toast = success_toast(&s).unwrap();
        assert_eq!(toast.text, COMPLETION_MESSAGE);
        assert!(!toast.fading);

        s.advance(ms(999));
        assert!(!success_toast(&s).unwrap().fading);
        s.advance(ms(1));
        assert!(success_toast(&s).unwrap().fading);
        s.advance(ms(500));
        assert!(success_toast(&s).is_none());
    }

    #[test]
    fn test_frame_spanning_whole_toast_lifetime() {
        let mut s = session();
        to_cool(&mut s);
        s.handle(&UserAction::Crystallize).unwrap();

        // Due at 2000ms, gone by 5500ms: a 6000ms frame covers all of it
        s.advance(ms(6000));
        assert!(s.is_finished());
        assert!(success_toast(&s).is_none());
        assert!(matches!(s.beaker(), BeakerDisplay::Crystals(_)));
    }

    #[test]
    fn test_filter_before_reaction_rejected() {
        let mut s = session();
        add_all(&mut s);
        assert_eq!(
            s.handle(&UserAction::Filter),
            Err(ActionError::ReactionIncomplete)
        );
        assert_eq!(
            s.handle(&UserAction::Crystallize),
            Err(ActionError::FiltrationIncomplete)
        );
        assert!(s.particles().is_empty());
        assert_eq!(s.step(), SynthesisStep::Stir);
    }

    #[test]
    fn test_inspect_updates_info_panel() {
        let mut s = session();
        assert_eq!(s.view().info_panel.title, "Chemical Information");
        s.handle(&UserAction::Inspect {
            name: "Acetic Anhydride".to_string(),
        })
        .unwrap();
        let info = s.view().info_panel;
        assert_eq!(info.formula, Some("C₄H₆O₃"));
    }

    #[test]
    fn test_draw_commands_follow_beaker() {
        let mut s = session();
        assert_eq!(s.draw_commands().len(), 1);
        add_all(&mut s);
        assert_eq!(s.draw_commands().len(), 1 + 6);
    }

    #[test]
    fn test_render_narrates_changes() {
        let mut s = session();
        let mut presenter = TextPresenter::new();
        s.render(&mut presenter);
        s.handle(&UserAction::AddReagent {
            reagent: Reagent::SalicylicAcid,
        })
        .unwrap();
        s.render(&mut presenter);

        let lines = presenter.take_lines();
        assert!(lines[0].starts_with("[step 0/7]"));
        assert!(lines.iter().any(|l| l.starts_with("[step 1/7]")));
        assert_eq!(presenter.frames(), 2);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut s = session();
        add_all(&mut s);
        s.handle(&UserAction::ClickBeaker).unwrap();
        s.handle(&UserAction::Filter).unwrap_err();
        s.reset();

        assert_eq!(s.step(), SynthesisStep::AddSalicylic);
        assert!(s.feedback().is_empty());
        assert_eq!(s.beaker(), &BeakerDisplay::default());
        assert!(s.is_idle());

        run_for(&mut s, 5000);
        assert_eq!(s.step(), SynthesisStep::AddSalicylic);
    }
}
