//! GL device + window surface management.
//!
//! This module is responsible for:
//! - the [`GraphicsApi`] capability surface the shader builder and render loop call into
//! - the `glow`-backed implementation of that surface
//! - creating the window, the GLES context and the presentable surface

mod api;
mod context;
mod error;
mod glow_api;

#[cfg(test)]
pub(crate) mod recording;

pub use api::{GraphicsApi, Viewport};
pub use context::{GlContext, Present};
pub use error::DeviceError;
pub use glow_api::GlowApi;
