//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform key events into [`KeyEvent`]s.

pub mod platform;
mod types;

pub use types::{Key, KeyEvent, KeyState};
