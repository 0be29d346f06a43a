use anyhow::Result;

use crate::device::{DeviceError, GraphicsApi, Present, Viewport};
use crate::input::{Key, KeyEvent};
use crate::time::TimeSource;

use super::mesh::{Mesh, POSITION_COMPONENTS};
use super::rotation::rotation_matrix;

/// Vertex attribute fed from the mesh buffer.
pub const POSITION_ATTRIB: &str = "position";

/// Uniform receiving the rotation matrix.
pub const ROTATION_UNIFORM: &str = "rotation_mat";

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// Terminal.
    Closed,
}

/// Control directive returned by [`RenderLoop::tick`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Owns the program and vertex buffer and draws one rotated frame per tick.
///
/// Both GPU objects are created in [`RenderLoop::new`] and released by the
/// first tick that observes [`LoopState::Closed`]; nothing is allocated in between.
pub struct RenderLoop<G: GraphicsApi> {
    gl: G,
    program: G::Program,
    buffer: Option<G::Buffer>,
    rotation: Option<G::UniformLocation>,
    vertex_count: i32,
    state: LoopState,
}

impl<G: GraphicsApi> RenderLoop<G> {
    /// Uploads `mesh`, wires the `position` attribute of `program` to it and
    /// sets the fixed frame state (clear color, viewport).
    pub fn new(
        gl: G,
        program: G::Program,
        mesh: &Mesh,
        viewport: Viewport,
    ) -> Result<Self, DeviceError> {
        let vertex_count = draw_count(mesh.vertex_count())?;

        gl.clear_color(CLEAR_COLOR);
        gl.viewport(viewport);

        let buffer = gl.create_buffer()?;
        gl.bind_array_buffer(Some(buffer));
        gl.upload_array_buffer(mesh.as_bytes());

        match gl.attrib_location(program, POSITION_ATTRIB) {
            Some(index) => gl.vertex_attrib_f32(index, POSITION_COMPONENTS, false, 0, 0),
            None => log::warn!("program has no active `{POSITION_ATTRIB}` attribute"),
        }
        gl.bind_array_buffer(None);

        let rotation = gl.uniform_location(program, ROTATION_UNIFORM);
        if rotation.is_none() {
            log::warn!("program has no active `{ROTATION_UNIFORM}` uniform");
        }

        Ok(Self {
            gl,
            program,
            buffer: Some(buffer),
            rotation,
            vertex_count,
            state: LoopState::Running,
        })
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Key handler registered with the windowing runtime.
    ///
    /// Releasing Escape requests close.
    pub fn on_key_event(&mut self, event: KeyEvent) {
        if event.is_release_of(Key::Escape) {
            self.request_close();
        }
    }

    /// Moves the loop to [`LoopState::Closed`]. Idempotent.
    pub fn request_close(&mut self) {
        if self.state == LoopState::Running {
            log::info!("close requested");
            self.state = LoopState::Closed;
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.gl.viewport(viewport);
    }

    /// Runs one iteration.
    ///
    /// While running: clear, bind the program, upload the rotation for the
    /// current elapsed time, draw the mesh and present. Once closed: release
    /// the GPU objects and return [`LoopControl::Exit`] without drawing.
    pub fn tick(
        &mut self,
        time: &impl TimeSource,
        target: &mut impl Present,
    ) -> Result<LoopControl> {
        if self.state == LoopState::Closed {
            self.release();
            return Ok(LoopControl::Exit);
        }

        self.gl.clear_color_buffer();
        self.gl.use_program(Some(self.program));

        let angle = time.elapsed_secs() as f32;
        let rotation = rotation_matrix(angle).to_cols_array();
        self.gl.uniform_matrix4(self.rotation.as_ref(), false, &rotation);

        self.gl.draw_triangles(0, self.vertex_count);

        target.present()?;
        Ok(LoopControl::Continue)
    }

    fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.gl.use_program(None);
            self.gl.delete_buffer(buffer);
            self.gl.delete_program(self.program);
            log::debug!("render loop resources released");
        }
    }
}

fn draw_count(vertices: usize) -> Result<i32, DeviceError> {
    i32::try_from(vertices).map_err(|_| DeviceError::DrawCountOverflow { count: vertices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::recording::{self, Call, RecordingApi};
    use crate::input::KeyState;
    use crate::shader::{ShaderPair, ShaderProgramBuilder};
    use crate::time::FixedClock;

    #[derive(Default)]
    struct CountingTarget {
        presented: usize,
    }

    impl Present for CountingTarget {
        fn present(&mut self) -> Result<()> {
            self.presented += 1;
            Ok(())
        }
    }

    fn running_loop() -> RenderLoop<RecordingApi> {
        let gl = RecordingApi::new();
        let program = ShaderProgramBuilder::new(&gl)
            .build_pair(ShaderPair::from_text("void main() {}", "void main() {}"))
            .unwrap()
            .into_linked()
            .unwrap();
        RenderLoop::new(gl, program, &Mesh::triangle(), Viewport::new(800, 600)).unwrap()
    }

    fn is_draw(c: &Call) -> bool {
        matches!(c, Call::DrawTriangles { .. })
    }

    #[test]
    fn setup_uploads_mesh_and_layout() {
        let lp = running_loop();
        let gl = lp.gl();

        assert_eq!(gl.live_buffers.borrow().len(), 1);
        let bytes = Mesh::triangle().as_bytes().to_vec();
        assert_eq!(gl.count(|c| *c == Call::UploadArrayBuffer(bytes.clone())), 1);
        assert_eq!(
            gl.count(|c| *c
                == Call::VertexAttrib {
                    index: recording::POSITION_ATTRIB,
                    components: 4,
                    normalized: false,
                    stride: 0,
                    offset: 0,
                }),
            1
        );
        assert_eq!(gl.count(|c| *c == Call::ClearColor(CLEAR_COLOR)), 1);
        assert_eq!(gl.count(|c| *c == Call::Viewport(Viewport::new(800, 600))), 1);
        assert_eq!(gl.calls.borrow().last(), Some(&Call::BindArrayBuffer(None)));
        assert_eq!(lp.state(), LoopState::Running);
    }

    #[test]
    fn one_tick_at_one_second() {
        let mut lp = running_loop();
        let mut target = CountingTarget::default();

        let control = lp.tick(&FixedClock(1.0), &mut target).unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(target.presented, 1);

        let gl = lp.gl();
        let uploads = gl.uniform_uploads();
        assert_eq!(uploads.len(), 1);
        let m = uploads[0];
        assert!((m[0] - 0.5403).abs() < 1e-4, "{}", m[0]);
        assert!((m[1] - 0.8415).abs() < 1e-4, "{}", m[1]);
        assert_eq!(
            gl.count(|c| matches!(
                c,
                Call::UniformMatrix4 {
                    location: Some(recording::ROTATION_UNIFORM),
                    transpose: false,
                    ..
                }
            )),
            1
        );

        assert_eq!(gl.count(is_draw), 1);
        assert_eq!(gl.count(|c| *c == Call::DrawTriangles { first: 0, count: 3 }), 1);
    }

    #[test]
    fn tick_order_is_clear_use_upload_draw() {
        let mut lp = running_loop();
        let setup_len = lp.gl().calls.borrow().len();
        lp.tick(&FixedClock(0.0), &mut CountingTarget::default()).unwrap();

        let calls = lp.gl().calls.borrow();
        let frame = &calls[setup_len..];
        assert_eq!(frame.len(), 4);
        assert_eq!(frame[0], Call::Clear);
        assert!(matches!(frame[1], Call::UseProgram(Some(_))));
        assert!(matches!(frame[2], Call::UniformMatrix4 { .. }));
        assert!(is_draw(&frame[3]));
    }

    #[test]
    fn escape_release_closes_and_next_tick_releases() {
        let mut lp = running_loop();
        let mut target = CountingTarget::default();

        lp.on_key_event(KeyEvent::new(Key::Escape, KeyState::Pressed));
        assert_eq!(lp.state(), LoopState::Running);

        lp.on_key_event(KeyEvent::new(Key::Escape, KeyState::Released));
        assert_eq!(lp.state(), LoopState::Closed);

        let control = lp.tick(&FixedClock(2.0), &mut target).unwrap();
        assert_eq!(control, LoopControl::Exit);
        assert_eq!(target.presented, 0);

        let gl = lp.gl();
        assert_eq!(gl.count(is_draw), 0);
        assert!(gl.live_buffers.borrow().is_empty());
        assert!(gl.live_programs.borrow().is_empty());
    }

    #[test]
    fn other_keys_do_not_close() {
        let mut lp = running_loop();
        for code in [0, 13, 42] {
            lp.on_key_event(KeyEvent::new(Key::Unknown(code), KeyState::Pressed));
            lp.on_key_event(KeyEvent::new(Key::Unknown(code), KeyState::Released));
        }
        assert_eq!(lp.state(), LoopState::Running);
    }

    #[test]
    fn oversized_draw_count_is_an_error() {
        assert_eq!(draw_count(3), Ok(3));
        assert_eq!(draw_count(i32::MAX as usize), Ok(i32::MAX));
        let err = draw_count(i32::MAX as usize + 1).unwrap_err();
        assert_eq!(
            err,
            DeviceError::DrawCountOverflow {
                count: i32::MAX as usize + 1
            }
        );
        assert!(err.to_string().contains("2147483648"));
    }

    #[test]
    fn empty_mesh_sets_up_and_draws_nothing() {
        let gl = RecordingApi::new();
        let program = ShaderProgramBuilder::new(&gl)
            .build_pair(ShaderPair::from_text("void main() {}", "void main() {}"))
            .unwrap()
            .program;
        let mut lp =
            RenderLoop::new(gl, program, &Mesh::new(Vec::new()), Viewport::new(1, 1)).unwrap();
        lp.tick(&FixedClock(0.0), &mut CountingTarget::default()).unwrap();
        assert_eq!(lp.gl().count(|c| *c == Call::DrawTriangles { first: 0, count: 0 }), 1);
    }

    #[test]
    fn release_happens_once() {
        let mut lp = running_loop();
        let mut target = CountingTarget::default();
        lp.request_close();
        lp.request_close();

        assert_eq!(lp.tick(&FixedClock(0.0), &mut target).unwrap(), LoopControl::Exit);
        assert_eq!(lp.tick(&FixedClock(0.0), &mut target).unwrap(), LoopControl::Exit);
        assert_eq!(lp.gl().count(|c| matches!(c, Call::DeleteBuffer(_))), 1);
    }

    #[test]
    fn broken_program_still_draws() {
        let gl = RecordingApi::new();
        let report = ShaderProgramBuilder::new(&gl)
            .build_pair(ShaderPair::from_text("SYNTAX ERROR", "void main() {}"))
            .unwrap();
        assert!(!report.is_ok());

        let mut lp =
            RenderLoop::new(gl, report.program, &Mesh::triangle(), Viewport::new(1, 1)).unwrap();
        lp.tick(&FixedClock(0.5), &mut CountingTarget::default()).unwrap();

        let gl = lp.gl();
        assert_eq!(gl.count(|c| matches!(c, Call::VertexAttrib { .. })), 0);
        assert_eq!(gl.count(|c| matches!(c, Call::UniformMatrix4 { location: None, .. })), 1);
        assert_eq!(gl.count(is_draw), 1);
    }
}
