use std::fmt;

use crate::shader::ShaderStage;

use super::error::DeviceError;

/// Drawable rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The subset of the GL API the shader builder and render loop depend on.
///
/// Calls are synchronous and assume the context is current on the calling
/// thread. Status queries never fail; allocation may.
pub trait GraphicsApi {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    // Shaders and programs.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, DeviceError>;
    /// Sets the source of `shader` and compiles it.
    fn compile_shader(&self, shader: Self::Shader, source: &str);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, DeviceError>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn use_program(&self, program: Option<Self::Program>);
    fn delete_program(&self, program: Self::Program);

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    /// Uploads a 4x4 matrix given as 16 floats in upload order.
    fn uniform_matrix4(
        &self,
        location: Option<&Self::UniformLocation>,
        transpose: bool,
        value: &[f32; 16],
    );

    // Buffers and vertex layout.
    fn create_buffer(&self) -> Result<Self::Buffer, DeviceError>;
    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>);
    /// Uploads `data` to the bound array buffer with static-draw usage.
    fn upload_array_buffer(&self, data: &[u8]);
    /// Describes float attribute `index` in the bound array buffer and enables it.
    fn vertex_attrib_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn delete_buffer(&self, buffer: Self::Buffer);

    // Frame state and drawing.
    fn clear_color(&self, rgba: [f32; 4]);
    fn viewport(&self, viewport: Viewport);
    fn clear_color_buffer(&self);
    fn draw_triangles(&self, first: i32, count: i32);

    fn version(&self) -> String;
    fn renderer(&self) -> String;
}
