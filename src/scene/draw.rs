//! Canvas drawing commands.
//!
//! The crate never touches a drawing surface. It describes each frame as a
//! list of [`DrawCommand`]s that the host replays onto a 2D canvas context.

use serde::Serialize;

use super::BeakerDisplay;
use crate::compute::{CrystalSpeck, Particle, ParticleShape};
use crate::schema::{CanvasConfig, Chemical, Color, Rect};

/// Font used for formula labels.
pub const FORMULA_FONT: &str = "14px Arial";
/// Vertical offset between stacked reagent layers.
pub const LAYER_STEP: f32 = 20.0;

/// One 2D canvas operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    /// Clear the whole surface.
    Clear { width: f32, height: f32 },
    FillRect { rect: Rect, color: Color },
    FillText {
        text: &'static str,
        x: f32,
        y: f32,
        font: &'static str,
        color: Color,
    },
    /// Filled circle centered at (x, y).
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Color,
    },
    /// Filled square centered at (x, y), rotated by `rotation` radians.
    Square {
        x: f32,
        y: f32,
        size: f32,
        rotation: f32,
        color: Color,
    },
}

fn chemical_layer(chemical: Chemical, rect: Rect, out: &mut Vec<DrawCommand>) {
    let props = chemical.properties();
    out.push(DrawCommand::FillRect {
        rect,
        color: props.color,
    });
    out.push(DrawCommand::FillText {
        text: props.formula,
        x: rect.x + 5.0,
        y: rect.y + 20.0,
        font: FORMULA_FONT,
        color: Color::LABEL,
    });
}

/// Beaker contents, bottom layer first.
pub fn beaker_commands(display: &BeakerDisplay, canvas: &CanvasConfig) -> Vec<DrawCommand> {
    let full = canvas.beaker_rect();
    let mut out = Vec::new();

    match display {
        BeakerDisplay::Reagents(reagents) => {
            for (i, reagent) in reagents.iter().enumerate() {
                let offset = i as f32 * LAYER_STEP;
                let rect = Rect::new(full.x, full.y + offset, full.width, full.height - offset);
                chemical_layer(reagent.chemical(), rect, &mut out);
            }
        }
        BeakerDisplay::Aspirin => chemical_layer(Chemical::Aspirin, full, &mut out),
        BeakerDisplay::Crystals(specks) => {
            chemical_layer(Chemical::Aspirin, full, &mut out);
            out.extend(crystal_commands(specks));
        }
    }
    out
}

/// Static crystal specks.
pub fn crystal_commands(specks: &[CrystalSpeck]) -> impl Iterator<Item = DrawCommand> + '_ {
    specks.iter().map(|s| DrawCommand::Square {
        x: s.x,
        y: s.y,
        size: s.size,
        rotation: s.rotation,
        color: Color::rgba(255, 255, 255, s.alpha),
    })
}

/// One command per live particle.
pub fn particle_commands(particles: &[Particle]) -> impl Iterator<Item = DrawCommand> + '_ {
    particles.iter().map(|p| match p.shape() {
        ParticleShape::Circle => DrawCommand::Circle {
            x: p.x,
            y: p.y,
            radius: p.size / 2.0,
            color: p.color,
        },
        ParticleShape::Square => DrawCommand::Square {
            x: p.x,
            y: p.y,
            size: p.size,
            rotation: p.angle,
            color: p.color,
        },
    })
}

/// Full frame: clear, beaker contents, then particles on top.
pub fn frame_commands(
    canvas: &CanvasConfig,
    beaker: &BeakerDisplay,
    particles: &[Particle],
) -> Vec<DrawCommand> {
    let mut out = vec![DrawCommand::Clear {
        width: canvas.width,
        height: canvas.height,
    }];
    out.extend(beaker_commands(beaker, canvas));
    out.extend(particle_commands(particles));
    out
}
