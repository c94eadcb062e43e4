//! textconsole - a line-oriented console widget
//!
//! The crate models an in-place console: a scrolling transcript of committed
//! lines, a single editable prompt line below it, and a command history the
//! user can browse. Hosts feed key events in and receive submitted lines
//! through an [`InputHandler`].
//!
//! # Architecture
//!
//! ```text
//! Console<S: DisplaySurface>
//! ├── CommandHistory (entries + browse cursor)
//! ├── AlertTimer (bell revert deadline)
//! ├── Geometry (glyph cell, rows/cols)
//! └── S (renders transcript, prompt and input field)
//! ```
//!
//! Rendering is delegated to a [`DisplaySurface`]. [`MemorySurface`] keeps
//! everything in memory; [`ui::TerminalSurface`] draws with crossterm.

pub mod config;
pub mod core;
pub mod ui;

pub use crate::config::{ConsoleConfig, ScrollAnchor};
pub use crate::core::{
    AlertTimer, BrowseCursor, CommandHistory, Console, ConsoleError, ControlAction, ControlChar,
    Direction, DisplaySurface, Geometry, GlyphCell, InputHandler, KeyOutcome, MemorySurface,
};
