//! Configuration types for the synthesis lab.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on particles emitted by a single effect.
pub const MAX_EMIT_COUNT: usize = 10_000;

/// Top-level lab configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Canvas surface dimensions.
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Durations of timed actions and transient UI elements.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Particle counts per effect.
    #[serde(default)]
    pub effects: EffectConfig,
    /// Random seed for particle effects (None = entropy).
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
        }
    }
}

/// Durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub stir_ms: u64,
    pub heat_ms: u64,
    pub filter_ms: u64,
    pub cool_ms: u64,
    /// Flying flask animation from flask to beaker.
    pub transfer_ms: u64,
    /// How long a feedback message stays fully visible.
    pub feedback_ms: u64,
    /// Fade-out after `feedback_ms` before removal.
    pub feedback_fade_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            stir_ms: 3000,
            heat_ms: 3000,
            filter_ms: 1500,
            cool_ms: 2000,
            transfer_ms: 1000,
            feedback_ms: 3000,
            feedback_fade_ms: 500,
        }
    }
}

impl TimingConfig {
    #[inline]
    pub fn stir(&self) -> Duration {
        Duration::from_millis(self.stir_ms)
    }

    #[inline]
    pub fn heat(&self) -> Duration {
        Duration::from_millis(self.heat_ms)
    }

    #[inline]
    pub fn filter(&self) -> Duration {
        Duration::from_millis(self.filter_ms)
    }

    #[inline]
    pub fn cool(&self) -> Duration {
        Duration::from_millis(self.cool_ms)
    }

    #[inline]
    pub fn transfer(&self) -> Duration {
        Duration::from_millis(self.transfer_ms)
    }

    #[inline]
    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    #[inline]
    pub fn feedback_fade(&self) -> Duration {
        Duration::from_millis(self.feedback_fade_ms)
    }
}

/// Particle counts emitted by each effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectConfig {
    pub heat_particles: usize,
    pub filter_particles: usize,
    pub crystal_particles: usize,
    /// Static crystal specks drawn in the beaker once cooling finishes.
    pub crystal_specks: usize,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            heat_particles: 200,
            filter_particles: 150,
            crystal_particles: 300,
            crystal_specks: 50,
        }
    }
}

impl SynthesisConfig {
    /// Parse configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let config: SynthesisConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasConfig { width, height } = self.canvas;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidCanvas { width, height });
        }

        let t = &self.timing;
        for (action, ms) in [
            ("stir", t.stir_ms),
            ("heat", t.heat_ms),
            ("filter", t.filter_ms),
            ("cool", t.cool_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroDuration(action));
            }
        }
        if t.feedback_ms == 0 {
            return Err(ConfigError::ZeroDuration("feedback"));
        }

        let e = &self.effects;
        for (effect, count) in [
            ("heat", e.heat_particles),
            ("filter", e.filter_particles),
            ("crystal", e.crystal_particles),
            ("crystal specks", e.crystal_specks),
        ] {
            if count > MAX_EMIT_COUNT {
                return Err(ConfigError::TooManyParticles { effect, count });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Canvas dimensions must be positive and finite (got {width}x{height})")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("Duration of {0} must be non-zero")]
    ZeroDuration(&'static str),
    #[error("Effect {effect} requests {count} particles (max {max})", max = MAX_EMIT_COUNT)]
    TooManyParticles { effect: &'static str, count: usize },
}

/// Errors raised while reading a configuration or script file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),
}
