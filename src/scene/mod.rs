//! Scene module - Presentation state, canvas commands and presenters.

mod draw;
mod presenter;
mod view;

pub use draw::*;
pub use presenter::*;
pub use view::*;
