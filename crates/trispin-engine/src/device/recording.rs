//! Recording [`GraphicsApi`] used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;

use crate::shader::ShaderStage;

use super::api::{GraphicsApi, Viewport};
use super::error::DeviceError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage, u32),
    CompileShader(u32, String),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    UniformMatrix4 {
        location: Option<u32>,
        transpose: bool,
        value: [f32; 16],
    },
    CreateBuffer(u32),
    BindArrayBuffer(Option<u32>),
    UploadArrayBuffer(Vec<u8>),
    VertexAttrib {
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    DeleteBuffer(u32),
    ClearColor([f32; 4]),
    Viewport(Viewport),
    Clear,
    DrawTriangles { first: i32, count: i32 },
}

/// Fake GL that hands out increasing integer handles and records every call.
///
/// Compilation fails for any source containing `SYNTAX ERROR`; linking fails
/// when `fail_link` is set.
#[derive(Default)]
pub struct RecordingApi {
    pub calls: RefCell<Vec<Call>>,
    pub fail_link: bool,
    /// Info log returned for failed stages and programs.
    pub error_log: String,
    next_handle: Cell<u32>,
    failed_shaders: RefCell<BTreeSet<u32>>,
    pub live_shaders: RefCell<BTreeSet<u32>>,
    pub live_buffers: RefCell<BTreeSet<u32>>,
    pub live_programs: RefCell<BTreeSet<u32>>,
}

pub const POSITION_ATTRIB: u32 = 0;
pub const ROTATION_UNIFORM: u32 = 7;

impl RecordingApi {
    pub fn new() -> Self {
        Self {
            error_log: "0:1(1): error: syntax error, unexpected IDENTIFIER".to_string(),
            ..Default::default()
        }
    }

    pub fn failing_link() -> Self {
        Self {
            fail_link: true,
            ..Self::new()
        }
    }

    fn handle(&self) -> u32 {
        let h = self.next_handle.get() + 1;
        self.next_handle.set(h);
        h
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn uniform_uploads(&self) -> Vec<[f32; 16]> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::UniformMatrix4 { value, .. } => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl GraphicsApi for RecordingApi {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, DeviceError> {
        let h = self.handle();
        self.live_shaders.borrow_mut().insert(h);
        self.record(Call::CreateShader(stage, h));
        Ok(h)
    }

    fn compile_shader(&self, shader: u32, source: &str) {
        if source.contains("SYNTAX ERROR") {
            self.failed_shaders.borrow_mut().insert(shader);
        }
        self.record(Call::CompileShader(shader, source.to_string()));
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        !self.failed_shaders.borrow().contains(&shader)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            self.error_log.clone()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.live_shaders.borrow_mut().remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, DeviceError> {
        let h = self.handle();
        self.live_programs.borrow_mut().insert(h);
        self.record(Call::CreateProgram(h));
        Ok(h)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, _program: u32) -> bool {
        // A program with a failed stage never links.
        !self.fail_link && self.failed_shaders.borrow().is_empty()
    }

    fn program_info_log(&self, program: u32) -> String {
        if self.program_link_status(program) {
            String::new()
        } else {
            self.error_log.clone()
        }
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: u32) {
        self.live_programs.borrow_mut().remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        (name == "position" && self.program_link_status(program)).then_some(POSITION_ATTRIB)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        (name == "rotation_mat" && self.program_link_status(program)).then_some(ROTATION_UNIFORM)
    }

    fn uniform_matrix4(&self, location: Option<&u32>, transpose: bool, value: &[f32; 16]) {
        self.record(Call::UniformMatrix4 {
            location: location.copied(),
            transpose,
            value: *value,
        });
    }

    fn create_buffer(&self) -> Result<u32, DeviceError> {
        let h = self.handle();
        self.live_buffers.borrow_mut().insert(h);
        self.record(Call::CreateBuffer(h));
        Ok(h)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.record(Call::BindArrayBuffer(buffer));
    }

    fn upload_array_buffer(&self, data: &[u8]) {
        self.record(Call::UploadArrayBuffer(data.to_vec()));
    }

    fn vertex_attrib_f32(
        &self,
        index: u32,
        components: i32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        self.record(Call::VertexAttrib {
            index,
            components,
            normalized,
            stride,
            offset,
        });
    }

    fn delete_buffer(&self, buffer: u32) {
        self.live_buffers.borrow_mut().remove(&buffer);
        self.record(Call::DeleteBuffer(buffer));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn viewport(&self, viewport: Viewport) {
        self.record(Call::Viewport(viewport));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn draw_triangles(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangles { first, count });
    }

    fn version(&self) -> String {
        "OpenGL ES 2.0 (recording)".to_string()
    }

    fn renderer(&self) -> String {
        "recording".to_string()
    }
}
