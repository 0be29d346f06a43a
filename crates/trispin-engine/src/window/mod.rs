//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop, creates the GL window once the platform is
//! ready and drives the render loop from redraw requests.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
