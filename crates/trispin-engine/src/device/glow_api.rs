use glow::HasContext;

use crate::shader::ShaderStage;

use super::api::{GraphicsApi, Viewport};
use super::error::DeviceError;

/// [`GraphicsApi`] backed by a `glow` context.
///
/// Every method issues raw GL calls; the context this was loaded from must be
/// current on the calling thread for the lifetime of the value.
pub struct GlowApi {
    gl: glow::Context,
}

impl GlowApi {
    /// Wraps a loaded `glow` context.
    ///
    /// # Safety
    ///
    /// `gl` must have been loaded from a context that is current on this thread
    /// and stays current while the returned value is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }
}

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

// SAFETY (all blocks below): `GlowApi::new` requires a current context, and
// every handle passed in was produced by this same context.
impl GraphicsApi for GlowApi {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, DeviceError> {
        unsafe { self.gl.create_shader(gl_stage(stage)) }
            .map_err(|e| DeviceError::new("shader", e))
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { self.gl.delete_shader(shader) }
    }

    fn create_program(&self) -> Result<Self::Program, DeviceError> {
        unsafe { self.gl.create_program() }.map_err(|e| DeviceError::new("program", e))
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { self.gl.attach_shader(program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { self.gl.link_program(program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { self.gl.use_program(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn uniform_matrix4(
        &self,
        location: Option<&Self::UniformLocation>,
        transpose: bool,
        value: &[f32; 16],
    ) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(location, transpose, value.as_slice())
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, DeviceError> {
        unsafe { self.gl.create_buffer() }.map_err(|e| DeviceError::new("buffer", e))
    }

    fn bind_array_buffer(&self, buffer: Option<Self::Buffer>) {
        unsafe { self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer) }
    }

    fn upload_array_buffer(&self, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
        }
    }

    fn vertex_attrib_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                index,
                components,
                glow::FLOAT,
                normalized,
                stride,
                offset,
            );
            self.gl.enable_vertex_attrib_array(index);
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { self.gl.delete_buffer(buffer) }
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn viewport(&self, viewport: Viewport) {
        let width = i32::try_from(viewport.width).unwrap_or(i32::MAX);
        let height = i32::try_from(viewport.height).unwrap_or(i32::MAX);
        unsafe { self.gl.viewport(0, 0, width, height) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.gl.clear(glow::COLOR_BUFFER_BIT) }
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(glow::TRIANGLES, first, count) }
    }

    fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::VERSION) }
    }

    fn renderer(&self) -> String {
        unsafe { self.gl.get_parameter_string(glow::RENDERER) }
    }
}
