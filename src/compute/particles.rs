//! Particle effect engine for heat, filter and crystal effects.
//!
//! Particles are purely cosmetic. Each one loses one unit of life per frame,
//! so a batch always drains in at most `ceil(max initial life)` frames and the
//! host can stop scheduling frames as soon as [`ParticleSystem::step`] returns
//! `false`.

use std::f32::consts::{PI, TAU};

use log::debug;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{CanvasConfig, Color, Rect};

/// Horizontal drift per frame, scaled by `cos(angle)`.
pub const HORIZONTAL_DRIFT: f32 = 0.5;

/// The three visual effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Rising orange embers above the water bath.
    Heat,
    /// Pale droplets falling through the funnel area.
    Filter,
    /// Slowly spinning white crystals inside the beaker.
    Crystal,
}

/// How a particle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleShape {
    Circle,
    Square,
}

/// A short-lived cosmetic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Color,
    /// Upward speed in pixels per frame.
    pub speed: f32,
    /// Remaining frames.
    pub life: f32,
    /// Orientation in radians; also steers the horizontal drift.
    pub angle: f32,
    pub rotation_speed: f32,
}

impl Particle {
    /// Moving particles are round, stationary crystals are square.
    pub fn shape(&self) -> ParticleShape {
        if self.speed > 0.0 {
            ParticleShape::Circle
        } else {
            ParticleShape::Square
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Integrate one frame.
    #[inline]
    pub fn update(&mut self) {
        self.x += self.angle.cos() * HORIZONTAL_DRIFT;
        self.y -= self.speed;
        self.angle += self.rotation_speed;
        self.life -= 1.0;
    }
}

/// A static crystal drawn over the finished product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrystalSpeck {
    /// Center position.
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation: f32,
    pub alpha: f32,
}

/// Pool of live particles on a canvas of known size.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl ParticleSystem {
    /// Create an empty system. `seed` makes emissions reproducible.
    pub fn new(canvas: CanvasConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            particles: Vec::new(),
            width: canvas.width,
            height: canvas.height,
            rng,
        }
    }

    /// Update canvas size for subsequent emissions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn `count` particles of the given effect.
    pub fn emit(&mut self, kind: EffectKind, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.spawn(kind);
            self.particles.push(particle);
        }
        debug!("Emitted {count} {kind:?} particles ({} live)", self.len());
    }

    fn sample(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    fn spawn(&mut self, kind: EffectKind) -> Particle {
        let cx = self.width / 2.0;
        let h = self.height;

        match kind {
            EffectKind::Heat => Particle {
                x: cx + (self.sample() - 0.5) * 120.0,
                y: h - 180.0 + self.sample() * 30.0,
                size: self.sample() * 4.0 + 2.0,
                color: Color::hsla(
                    self.sample() * 20.0 + 20.0,
                    1.0,
                    0.5,
                    self.sample() * 0.7 + 0.3,
                ),
                speed: self.sample() * 3.0 + 1.0,
                life: self.sample() * 100.0 + 50.0,
                angle: self.sample() * TAU,
                rotation_speed: 0.0,
            },
            EffectKind::Filter => Particle {
                x: cx + (self.sample() - 0.5) * 200.0,
                y: h - 250.0,
                size: self.sample() * 5.0 + 2.0,
                color: Color::rgba(200, 200, 255, self.sample() * 0.7 + 0.3),
                speed: self.sample() * 4.0 + 1.0,
                life: self.sample() * 80.0 + 40.0,
                angle: self.sample() * TAU,
                rotation_speed: 0.0,
            },
            EffectKind::Crystal => Particle {
                x: cx + (self.sample() - 0.5) * 100.0,
                y: h - 130.0 + self.sample() * 100.0,
                size: self.sample() * 6.0 + 3.0,
                color: Color::rgba(255, 255, 255, self.sample() * 0.8 + 0.2),
                speed: 0.0,
                life: self.sample() * 150.0 + 80.0,
                angle: self.sample() * TAU,
                rotation_speed: (self.sample() - 0.5) * 0.1,
            },
        }
    }

    /// Scatter static crystal specks uniformly over `area`.
    pub fn scatter_specks(&mut self, area: Rect, count: usize) -> Vec<CrystalSpeck> {
        (0..count)
            .map(|_| CrystalSpeck {
                size: 2.0 + self.sample() * 5.0,
                x: area.x + self.sample() * area.width,
                y: area.y + self.sample() * area.height,
                rotation: self.sample() * PI,
                alpha: self.sample() * 0.5 + 0.5,
            })
            .collect()
    }

    /// Advance every particle one frame and drop the expired ones.
    ///
    /// Returns whether any particles remain, i.e. whether the host should
    /// schedule another frame.
    pub fn step(&mut self) -> bool {
        if self.particles.is_empty() {
            return false;
        }
        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(Particle::is_alive);
        !self.particles.is_empty()
    }

    /// Upper bound on frames until the system is empty.
    pub fn frames_until_empty(&self) -> u64 {
        self.particles
            .iter()
            .map(|p| p.life.ceil() as u64)
            .max()
            .unwrap_or(0)
    }

    /// Flat `[x, y, size, angle]` per particle for GPU/canvas upload.
    pub fn to_buffer(&self) -> Vec<f32> {
        self.particles
            .iter()
            .flat_map(|p| [p.x, p.y, p.size, p.angle])
            .collect()
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> ParticleSystem {
        ParticleSystem::new(
            CanvasConfig {
                width: 600.0,
                height: 400.0,
            },
            Some(42),
        )
    }

    #[test]
    fn test_emit_count() {
        let mut ps = system();
        ps.emit(EffectKind::Heat, 200);
        ps.emit(EffectKind::Filter, 150);
        assert_eq!(ps.len(), 350);
    }

    #[test]
    fn test_heat_ranges() {
        let mut ps = system();
        ps.emit(EffectKind::Heat, 500);
        for p in ps.particles() {
            assert!((240.0..=360.0).contains(&p.x), "x = {}", p.x);
            assert!((220.0..=250.0).contains(&p.y), "y = {}", p.y);
            assert!((2.0..=6.0).contains(&p.size));
            assert!((1.0..=4.0).contains(&p.speed));
            assert!((50.0..=150.0).contains(&p.life));
            assert!((0.3..=1.0).contains(&p.color.a));
            // Orange band: red saturated, no blue
            assert_eq!(p.color.r, 255);
            assert_eq!(p.color.b, 0);
            assert_eq!(p.rotation_speed, 0.0);
            assert_eq!(p.shape(), ParticleShape::Circle);
        }
    }

    #[test]
    fn test_filter_ranges() {
        let mut ps = system();
        ps.emit(EffectKind::Filter, 500);
        for p in ps.particles() {
            assert!((200.0..=400.0).contains(&p.x));
            assert_eq!(p.y, 150.0);
            assert!((40.0..=120.0).contains(&p.life));
            assert!((1.0..=5.0).contains(&p.speed));
            assert_eq!((p.color.r, p.color.g, p.color.b), (200, 200, 255));
        }
    }

    #[test]
    fn test_crystal_spins_in_place() {
        let mut ps = system();
        ps.emit(EffectKind::Crystal, 100);
        let before: Vec<(f32, f32)> = ps.particles().iter().map(|p| (p.y, p.angle)).collect();
        for p in ps.particles() {
            assert_eq!(p.speed, 0.0);
            assert_eq!(p.shape(), ParticleShape::Square);
            assert!(p.rotation_speed.abs() <= 0.05);
            assert!(p.life >= 80.0);
        }

        ps.step();
        for (p, (y, angle)) in ps.particles().iter().zip(before) {
            assert_eq!(p.y, y);
            assert!((p.angle - (angle + p.rotation_speed)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_update_integrates_one_frame() {
        let mut p = Particle {
            x: 10.0,
            y: 100.0,
            size: 3.0,
            color: Color::rgba(255, 255, 255, 1.0),
            speed: 2.0,
            life: 5.0,
            angle: 0.0,
            rotation_speed: 0.1,
        };
        p.update();
        assert!((p.x - 10.5).abs() < 1e-6);
        assert_eq!(p.y, 98.0);
        assert!((p.angle - 0.1).abs() < 1e-6);
        assert_eq!(p.life, 4.0);
    }

    #[test]
    fn test_drains_within_bound() {
        let mut ps = system();
        ps.emit(EffectKind::Heat, 50);
        ps.emit(EffectKind::Crystal, 50);
        let bound = ps.frames_until_empty();
        assert!(bound <= 230);

        let mut frames = 0;
        while ps.step() {
            frames += 1;
            assert!(frames <= bound);
        }
        assert!(ps.is_empty());
        assert!(!ps.step());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = system();
        let mut b = system();
        a.emit(EffectKind::Filter, 10);
        b.emit(EffectKind::Filter, 10);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_specks_inside_area() {
        let mut ps = system();
        let area = Rect::new(252.0, 270.0, 96.0, 100.0);
        let specks = ps.scatter_specks(area, 50);
        assert_eq!(specks.len(), 50);
        for s in &specks {
            assert!(area.contains(s.x, s.y));
            assert!((2.0..=7.0).contains(&s.size));
            assert!((0.0..PI).contains(&s.rotation));
            assert!((0.5..=1.0).contains(&s.alpha));
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_buffer_layout() {
        let mut ps = system();
        ps.emit(EffectKind::Heat, 3);
        let buf = ps.to_buffer();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf[4], ps.particles()[1].x);
        assert_eq!(buf[7], ps.particles()[1].angle);
    }
}
