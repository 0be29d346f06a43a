//! trispin engine crate.
//!
//! Owns the window/GL runtime, the shader program builder and the render loop
//! that spins a single triangle.

pub mod config;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod shader;
pub mod time;
pub mod window;
