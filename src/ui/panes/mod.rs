//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility.
//!
//! # Pane Modules
//!
//! - [`source`]: The script with operator highlighting and the stop position
//! - [`tape`]: Cell values around the pointer
//! - [`terminal`]: Text written by the script
//! - [`functions`]: The function table
//! - [`status`]: Status bar with exit flags, counters and keybindings
//! - `utils`: Shared border and scrolling helpers
//!
//! Each pane module exports a `render_*` function plus the scroll state it
//! needs; all of them are stateless apart from that scroll state.

mod utils;

pub mod functions;
pub mod source;
pub mod status;
pub mod tape;
pub mod terminal;

// Re-export render functions for convenience
pub use functions::render_functions_pane;
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use tape::{render_tape_pane, TapeScrollState};
pub use terminal::render_terminal_pane;
