//! Terminal User Interface module.
//!
//! Hosts a [`Navigator`](crate::nav::Navigator) in the terminal:
//! - Main event loop (`run`)
//! - Input handling for browse, search and notice modes
//! - Flattening of the view tree into styled lines
//! - Fetch-completion event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling and fetch spawning
//! - `events` - Fetch completion processing
//! - `render` - Screen layout and overlays
//! - `content` - View tree to terminal lines
//! - `help` - Key binding overlay
//! - `status` - Status bar widget

mod content;
mod events;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use content::plain_text;
pub use loop_runner::{run, Action};
