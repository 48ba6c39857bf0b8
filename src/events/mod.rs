//! Event handling for Pairwatch.
//!
//! Terminal input is read from crossterm's async event stream and mapped to
//! [`Action`](crate::state::Action)s depending on the session phase and
//! input mode.

mod handler;
mod input;

pub use handler::{EventHandler, HandlerSnapshot};
pub use input::InputEvent;
