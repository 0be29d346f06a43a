use std::io;
use std::path::PathBuf;

use crate::device::DeviceError;

use super::builder::BuildStatus;
use super::source::ShaderStage;

/// A shader source file could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {stage} shader source {}", .path.display())]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Only produced when the caller asks for a usable program.
    #[error("shader program is unusable: {0}")]
    Build(BuildStatus),
}
