//! Schema module - Configuration, reference data and step types for the lab.

mod chemical;
mod color;
mod config;
mod geometry;
mod script;
mod step;

pub use chemical::*;
pub use color::*;
pub use config::*;
pub use geometry::*;
pub use script::*;
pub use step::*;
