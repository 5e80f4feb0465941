//! Compute module - Step gating, timers, particles and the session driver.

mod controller;
mod particles;
mod session;
mod timer;

pub use controller::*;
pub use particles::*;
pub use session::*;
pub use timer::*;
