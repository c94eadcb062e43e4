//! Console session core.
//!
//! This module contains everything that decides what the console does,
//! independent of how it is drawn:
//!
//! - **session**: the console state machine (prompt, transcript, submit)
//! - **history**: command history and its browse cursor
//! - **control**: the Ctrl-key dispatch table
//! - **surface**: the display surface trait and an in-memory surface
//! - **metrics**: glyph cell size and row/column geometry
//! - **alert**: the bell revert timer
//!
//! # Architecture
//!
//! ```text
//! key event ──> KeyInterpreter ──> Console ──> DisplaySurface
//!                                     │
//!                                     └──> InputHandler (submit, suggest)
//! ```

pub mod alert;
pub mod control;
pub mod history;
pub mod metrics;
pub mod session;
pub mod surface;

pub use alert::AlertTimer;
pub use control::{ControlAction, ControlChar};
pub use history::{BrowseCursor, CommandHistory, Direction};
pub use metrics::{Geometry, GlyphCell};
pub use session::{Console, ConsoleError, InputHandler, KeyOutcome};
pub use surface::{DisplaySurface, MemorySurface, OutputLine};
