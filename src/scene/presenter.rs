//! Presentation seam between the session and a display surface.

use std::collections::HashSet;

use super::{DrawCommand, FeedbackKind, SceneView};
use crate::schema::SynthesisStep;

/// Receives one rendered frame at a time.
pub trait Presenter {
    fn present(&mut self, view: &SceneView, commands: &[DrawCommand]);
}

/// Presenter that narrates state changes as text lines.
///
/// Only changes are reported: a new step, a new feedback message, a new info
/// panel entry, or the particle effect draining.
#[derive(Debug, Default)]
pub struct TextPresenter {
    last_step: Option<SynthesisStep>,
    last_info: Option<String>,
    seen_feedback: HashSet<u64>,
    had_particles: bool,
    frames: u64,
    peak_particles: usize,
    lines: Vec<String>,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Largest particle count seen in any frame.
    pub fn peak_particles(&self) -> usize {
        self.peak_particles
    }

    /// Drain the lines produced since the last call.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl Presenter for TextPresenter {
    fn present(&mut self, view: &SceneView, _commands: &[DrawCommand]) {
        self.frames += 1;
        self.peak_particles = self.peak_particles.max(view.particle_count);

        if self.last_step != Some(view.step) {
            self.last_step = Some(view.step);
            self.lines.push(format!(
                "[step {}/{}] {}",
                view.step_index,
                SynthesisStep::Done.index(),
                view.step.instruction()
            ));
        }

        for msg in &view.feedback {
            if self.seen_feedback.insert(msg.id) {
                let marker = match msg.kind {
                    FeedbackKind::Error => "!",
                    FeedbackKind::Success => "*",
                };
                self.lines.push(format!("  {marker} {}", msg.text));
            }
        }

        let info = view.info_panel.to_string();
        if self.last_info.as_deref() != Some(info.as_str()) {
            for line in info.lines() {
                self.lines.push(format!("  | {line}"));
            }
            self.last_info = Some(info);
        }

        let has_particles = view.particle_count > 0;
        if self.had_particles && !has_particles {
            self.lines.push("  (particle effect finished)".to_string());
        }
        self.had_particles = has_particles;
    }
}
