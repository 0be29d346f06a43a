//! Shader sources and program building.
//!
//! Sources are read from disk up front; a missing file is an error the caller
//! is expected to treat as fatal. Compile and link failures are not errors:
//! they are logged and recorded in a [`BuildReport`] next to the program handle.

mod builder;
mod error;
mod source;

pub use builder::{
    truncate_info_log, BuildReport, BuildStatus, Diagnostic, ShaderProgramBuilder, INFO_LOG_LEN,
    PROGRAM_TAG,
};
pub use error::{ShaderError, SourceError};
pub use source::{ShaderPair, ShaderSource, ShaderStage};
