use std::fmt;
use std::path::Path;

use crate::device::{DeviceError, GraphicsApi};

use super::error::ShaderError;
use super::source::{ShaderPair, ShaderSource, ShaderStage};

/// Size of the info-log buffer, terminator included.
pub const INFO_LOG_LEN: usize = 512;

/// Diagnostic tag for link failures.
pub const PROGRAM_TAG: &str = "PROGRAM";

/// Outcome of a program build.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BuildStatus {
    Ok,
    /// The first stage that failed to compile.
    CompileError(ShaderStage),
    LinkError,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStatus::Ok => f.write_str("ok"),
            BuildStatus::CompileError(stage) => write!(f, "{stage} shader failed to compile"),
            BuildStatus::LinkError => f.write_str("program failed to link"),
        }
    }
}

/// One compile or link log, tagged `VERTEX`, `FRAGMENT` or `PROGRAM`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Diagnostic {
    pub tag: &'static str,
    pub message: String,
}

/// Program handle plus what happened while building it.
///
/// The handle is returned even when compilation or linking failed.
#[derive(Debug)]
pub struct BuildReport<P> {
    pub program: P,
    pub status: BuildStatus,
    pub diagnostics: Vec<Diagnostic>,
}

impl<P> BuildReport<P> {
    pub fn is_ok(&self) -> bool {
        self.status == BuildStatus::Ok
    }

    /// Returns the program only if both stages compiled and the link succeeded.
    pub fn into_linked(self) -> Result<P, ShaderError> {
        match self.status {
            BuildStatus::Ok => Ok(self.program),
            status => Err(ShaderError::Build(status)),
        }
    }
}

/// Truncates a driver info log to what fits an `INFO_LOG_LEN` buffer.
pub fn truncate_info_log(log: &str) -> &str {
    let max = INFO_LOG_LEN - 1;
    match log.char_indices().nth(max) {
        Some((end, _)) => &log[..end],
        None => log,
    }
}

/// Compiles and links a vertex + fragment program.
pub struct ShaderProgramBuilder<'a, G: GraphicsApi> {
    gl: &'a G,
}

impl<'a, G: GraphicsApi> ShaderProgramBuilder<'a, G> {
    pub fn new(gl: &'a G) -> Self {
        Self { gl }
    }

    /// Reads both files and builds the program.
    ///
    /// An unreadable file is an error; a compile or link failure is not.
    pub fn build(
        &self,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<BuildReport<G::Program>, ShaderError> {
        let pair = ShaderPair::load(vertex_path, fragment_path)?;
        Ok(self.build_pair(pair)?)
    }

    /// Builds the program from already loaded sources.
    ///
    /// Both stage objects are deleted after the link attempt, whatever its outcome.
    pub fn build_pair(&self, pair: ShaderPair) -> Result<BuildReport<G::Program>, DeviceError> {
        debug_assert_eq!(pair.vertex.stage, ShaderStage::Vertex);
        debug_assert_eq!(pair.fragment.stage, ShaderStage::Fragment);

        let mut diagnostics = Vec::new();
        let mut status = BuildStatus::Ok;

        let vertex = self.compile(pair.vertex, &mut diagnostics, &mut status)?;
        let fragment = match self.compile(pair.fragment, &mut diagnostics, &mut status) {
            Ok(shader) => shader,
            Err(e) => {
                self.gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let program = match self.gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                self.gl.delete_shader(vertex);
                self.gl.delete_shader(fragment);
                return Err(e);
            }
        };

        self.gl.attach_shader(program, vertex);
        self.gl.attach_shader(program, fragment);
        self.gl.link_program(program);

        if !self.gl.program_link_status(program) {
            let log = self.gl.program_info_log(program);
            report(&mut diagnostics, PROGRAM_TAG, "LINKING_FAILED", &log);
            if status == BuildStatus::Ok {
                status = BuildStatus::LinkError;
            }
        }

        self.gl.delete_shader(vertex);
        self.gl.delete_shader(fragment);

        if status == BuildStatus::Ok {
            log::debug!("shader program {program:?} linked");
        }

        Ok(BuildReport {
            program,
            status,
            diagnostics,
        })
    }

    // `source` is consumed here so its text is released right after compiling.
    fn compile(
        &self,
        source: ShaderSource,
        diagnostics: &mut Vec<Diagnostic>,
        status: &mut BuildStatus,
    ) -> Result<G::Shader, DeviceError> {
        let shader = self.gl.create_shader(source.stage)?;
        self.gl.compile_shader(shader, &source.text);
        drop(source.text);

        if !self.gl.shader_compile_status(shader) {
            let log = self.gl.shader_info_log(shader);
            report(diagnostics, source.stage.tag(), "COMPILATION_FAILED", &log);
            if *status == BuildStatus::Ok {
                *status = BuildStatus::CompileError(source.stage);
            }
        }

        Ok(shader)
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, tag: &'static str, what: &str, log: &str) {
    let message = truncate_info_log(log).trim_end().to_string();
    log::error!("shader {tag} {what}\n{message}");
    diagnostics.push(Diagnostic { tag, message });
}
