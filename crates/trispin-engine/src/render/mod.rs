//! Rendering: the static mesh, the rotation uniform and the per-frame loop.

mod mesh;
mod render_loop;
mod rotation;

pub use mesh::{Mesh, Vertex, POSITION_COMPONENTS};
pub use render_loop::{
    LoopControl, LoopState, RenderLoop, CLEAR_COLOR, POSITION_ATTRIB, ROTATION_UNIFORM,
};
pub use rotation::rotation_matrix;
