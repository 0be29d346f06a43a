use bytemuck::{Pod, Zeroable};

/// Floats per vertex position (x, y, z, w).
pub const POSITION_COMPONENTS: i32 = 4;

/// Homogeneous vertex position, tightly packed.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self {
            position: [x, y, z, w],
        }
    }
}

/// Immutable vertex list uploaded once into a GPU buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// The demo triangle, centered on the origin.
    pub fn triangle() -> Self {
        Self::new(vec![
            Vertex::new(-0.5, -0.5, 0.0, 1.0),
            Vertex::new(0.5, -0.5, 0.0, 1.0),
            Vertex::new(0.0, 0.5, 0.0, 1.0),
        ])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
