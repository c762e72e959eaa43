//! Terminal platform layer
//!
//! Owns everything that touches the real terminal:
//! - Raw mode and the alternate screen
//! - Keyboard and resize events, decoded into [`Command`](crate::sim::Command)s

pub mod input;
pub mod terminal;

pub use input::{InputEvent, decode_event, decode_key, spawn_input_thread};
pub use terminal::TerminalGuard;
