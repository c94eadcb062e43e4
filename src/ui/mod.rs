//! Terminal front end for the console.
//!
//! - **renderer**: crossterm-backed `DisplaySurface`
//! - **keymapper**: Keyboard events to console actions

pub mod keymapper;
pub mod renderer;

pub use keymapper::{KeyAction, KeyInterpreter, Modifiers};
pub use renderer::TerminalSurface;
